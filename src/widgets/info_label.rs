//! Label rendering `category: value` with optional head ellipsis.

use egui::{Response, Ui, Widget};

/// Text shown before any value is set.
const UNSET: &str = "Not set";

/// A label with a fixed category and a changeable value.
///
/// Long values are shortened from the front (`...tail`) so the most specific
/// part, such as a file name at the end of a path, stays visible.
#[derive(Debug, Clone)]
pub struct InfoLabel {
    /// Fixed prefix such as "CSV file"
    category: String,
    /// Raw value, `None` until first set
    value: Option<String>,
    /// Longest value shown in full when ellipsis is on
    max_length: usize,
    /// Whether long values are shortened
    ellipsis: bool,
}

impl InfoLabel {
    /// Create an unset label for `category`
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            value: None,
            max_length: 20,
            ellipsis: true,
        }
    }

    /// Longest value shown without ellipsis
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Enable or disable shortening of long values
    pub fn ellipsis(mut self, ellipsis: bool) -> Self {
        self.ellipsis = ellipsis;
        self
    }

    /// Replace the value part
    pub fn set(&mut self, value: impl Into<String>) {
        self.value = Some(value.into());
    }

    /// Raw value, before ellipsis
    pub fn get(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Fixed category part
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Text as displayed, after ellipsis.
    pub fn text(&self) -> String {
        let value = self.value.as_deref().unwrap_or(UNSET);
        if self.ellipsis {
            format!("{}: {}", self.category, ellipsize(value, self.max_length))
        } else {
            format!("{}: {}", self.category, value)
        }
    }
}

impl Widget for &InfoLabel {
    fn ui(self, ui: &mut Ui) -> Response {
        let response = ui.label(self.text());
        match self.get() {
            Some(full) if self.ellipsis => response.on_hover_text(full),
            _ => response,
        }
    }
}

/// Keep the last `max_length - 3` characters behind `...` when too long.
fn ellipsize(text: &str, max_length: usize) -> String {
    let len = text.chars().count();
    if len <= max_length {
        return text.to_string();
    }

    let keep = max_length.saturating_sub(3);
    let tail: String = text.chars().skip(len - keep).collect();
    format!("...{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unset() {
        let label = InfoLabel::new("CSV file");
        assert_eq!(label.get(), None);
        assert_eq!(label.text(), "CSV file: Not set");
        assert_eq!(label.category(), "CSV file");
    }

    #[test]
    fn short_values_are_shown_in_full() {
        let mut label = InfoLabel::new("Key");
        label.set("F10");
        assert_eq!(label.text(), "Key: F10");
        assert_eq!(label.get(), Some("F10"));
    }

    #[test]
    fn long_values_keep_their_tail() {
        let mut label = InfoLabel::new("File").max_length(10);
        label.set("/home/user/words.csv");
        assert_eq!(label.text(), "File: ...rds.csv");
        assert_eq!(label.get(), Some("/home/user/words.csv"));
    }

    #[test]
    fn ellipsis_counts_characters_not_bytes() {
        assert_eq!(ellipsize("あいうえおかきくけこさ", 10), "...おかきくけこさ");
        assert_eq!(ellipsize("あいうえお", 5), "あいうえお");
    }

    #[test]
    fn ellipsis_can_be_disabled() {
        let mut label = InfoLabel::new("File").max_length(4).ellipsis(false);
        label.set("long-name.csv");
        assert_eq!(label.text(), "File: long-name.csv");
    }

    #[test]
    fn tiny_limits_do_not_underflow() {
        assert_eq!(ellipsize("abcdef", 2), "...");
    }
}
