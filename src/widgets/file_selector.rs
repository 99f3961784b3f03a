//! Button that opens the native file dialog, plus a label showing the choice.

use std::path::{Path, PathBuf};

use egui::Ui;
use tracing::debug;

use super::InfoLabel;

/// File picker for one kind of file.
pub struct FileSelector {
    /// Dialog filters as (name, extensions)
    filters: Vec<(String, Vec<String>)>,
    /// Currently selected file
    path: Option<PathBuf>,
    /// Shows the file kind and the selected path
    label: InfoLabel,
}

impl FileSelector {
    /// Create a picker for files of kind `category`
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            label: InfoLabel::new(category).max_length(40),
            filters: Vec::new(),
            path: None,
        }
    }

    /// Restrict the dialog to `extensions`, shown under `name`.
    pub fn filter(mut self, name: &str, extensions: &[&str]) -> Self {
        self.filters.push((
            name.to_string(),
            extensions.iter().map(|ext| ext.to_string()).collect(),
        ));
        self
    }

    /// Currently selected file, if any
    pub fn get(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Select `path` without opening the dialog; empty paths are ignored.
    pub fn set(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return;
        }
        self.label.set(path.display().to_string());
        self.path = Some(path);
    }

    /// Draw the picker. Returns the path picked during this frame, if any.
    pub fn show(&mut self, ui: &mut Ui) -> Option<PathBuf> {
        let mut picked = None;

        ui.vertical_centered(|ui| {
            if ui.button(format!("Select {}", self.label.category())).clicked() {
                picked = self.pick();
            }
            ui.add(&self.label);
        });

        picked
    }

    /// Open the native dialog and remember the chosen file
    fn pick(&mut self) -> Option<PathBuf> {
        let mut dialog = rfd::FileDialog::new();
        for (name, extensions) in &self.filters {
            dialog = dialog.add_filter(name, extensions.as_slice());
        }
        if let Some(dir) = self.get().and_then(Path::parent) {
            dialog = dialog.set_directory(dir);
        }

        let Some(path) = dialog.pick_file() else {
            debug!("File dialog cancelled");
            return None;
        };
        self.set(path.clone());
        Some(path)
    }
}
