//! Reusable egui controls: a `category: value` label, a labeled text entry,
//! and a file picker built on the native dialog.

mod file_selector;
mod info_label;
mod labeled_entry;

pub use file_selector::FileSelector;
pub use info_label::InfoLabel;
pub use labeled_entry::LabeledEntry;
