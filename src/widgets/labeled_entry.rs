//! Single-line text entry with a fixed-width label in front of it.

use egui::{Align, Layout, Response, TextEdit, Ui, vec2};

/// Label plus text field, with an optional per-character filter.
pub struct LabeledEntry {
    /// Label text, shown as `category:`
    category: String,
    /// Width of the label column, in points
    label_width: f32,
    /// Width of the text field, in points
    entry_width: f32,
    /// Current contents
    text: String,
    /// Characters for which this returns `false` are removed as they are typed
    filter: Option<fn(char) -> bool>,
}

impl LabeledEntry {
    /// Create an empty entry labeled `category`
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            label_width: 90.0,
            entry_width: 90.0,
            text: String::new(),
            filter: None,
        }
    }

    /// Set label and field widths, in points
    pub fn widths(mut self, label_width: f32, entry_width: f32) -> Self {
        self.label_width = label_width;
        self.entry_width = entry_width;
        self
    }

    /// Only keep characters accepted by `filter`.
    pub fn filter(mut self, filter: fn(char) -> bool) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Current text
    pub fn get(&self) -> &str {
        &self.text
    }

    /// Draw the entry; the response belongs to the text field.
    pub fn show(&mut self, ui: &mut Ui) -> Response {
        ui.horizontal(|ui| {
            let height = ui.spacing().interact_size.y;
            ui.allocate_ui_with_layout(
                vec2(self.label_width, height),
                Layout::right_to_left(Align::Center),
                |ui| ui.label(format!("{}:", self.category)),
            );

            let response = ui.add(TextEdit::singleline(&mut self.text).desired_width(self.entry_width));
            if response.changed()
                && let Some(filter) = self.filter
            {
                self.text = apply_filter(&self.text, filter);
            }
            response
        })
        .inner
    }
}

/// Keep only the characters `filter` accepts
fn apply_filter(text: &str, filter: fn(char) -> bool) -> String {
    text.chars().filter(|&c| filter(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_drops_rejected_characters() {
        assert_eq!(apply_filter("1a2 b3", |c| c.is_ascii_digit()), "123");
        assert_eq!(apply_filter("", |c| c.is_ascii_digit()), "");
    }

    #[test]
    fn starts_empty() {
        let entry = LabeledEntry::new("Jump to").filter(|c| c.is_ascii_digit());
        assert_eq!(entry.get(), "");
        assert!(entry.filter.is_some());
    }
}
