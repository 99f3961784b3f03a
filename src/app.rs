//! Application window and event wiring.
//!
//! Owns the typing session, the hotkey registration, and the widgets. Every
//! frame it drains session events into the preview slots and dialogs, and
//! turns button, entry, and checkbox input into session commands or viewport
//! commands.

use std::time::Duration;

use anyhow::{Context, Result};
use egui::{Align2, Color32, RichText, ViewportCommand, WindowLevel};
use tracing::{info, warn};

use crate::config::Config;
use crate::hotkey::{Bindings, HotkeyListener};
use crate::input::TextInjector;
use crate::navigator::Slot;
use crate::session::{SessionCommand, SessionEvent, SessionHandle, Snapshot};
#[cfg(not(target_os = "linux"))]
use crate::tray::TrayManager;
use crate::widgets::{FileSelector, InfoLabel, LabeledEntry};

/// Width of each preview slot, in points.
const SLOT_WIDTH: f32 = 130.0;

/// Severity of a modal message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DialogKind {
    /// Success notice
    Info,
    /// Action could not run
    Warning,
    /// Something failed
    Error,
}

/// Modal message waiting for the user to dismiss it.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Dialog {
    /// Severity, which picks the title and text color
    kind: DialogKind,
    /// Text shown to the user
    message: String,
}

impl Dialog {
    /// Window title for this severity
    fn title(&self) -> &'static str {
        match self.kind {
            DialogKind::Info => "Success",
            DialogKind::Warning => "Warning",
            DialogKind::Error => "Error",
        }
    }
}

/// Holds all runtime components and renders the window.
pub struct App {
    /// Worker owning the fragments and the cursor
    session: SessionHandle,
    /// Global hotkey registration, kept alive for the app's lifetime
    _hotkeys: HotkeyListener,
    /// System tray icon, if the platform provided one
    #[cfg(not(target_os = "linux"))]
    tray: Option<TrayManager>,
    /// CSV file picker
    file_selector: FileSelector,
    /// 1-based position entry for jumps
    jump_entry: LabeledEntry,
    /// Number of loaded fragments
    count_label: InfoLabel,
    /// Whether the window stays above all others
    always_on_top: bool,
    /// Latest state from the session
    snapshot: Snapshot,
    /// Message currently shown, if any
    dialog: Option<Dialog>,
    /// Caption between the previous and current slots
    previous_caption: String,
    /// Caption between the current and next slots
    next_caption: String,
}

impl App {
    /// Initialize all components from the provided configuration.
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config) -> Result<Self> {
        let ctx = cc.egui_ctx.clone();
        let settle_delay = Duration::from_millis(config.typing_delay_ms);
        let session = SessionHandle::spawn(
            move || TextInjector::new(settle_delay),
            move || ctx.request_repaint(),
        )
        .context("Failed to start typing session")?;

        let bindings = Bindings::parse(
            &config.hotkey_modifier,
            &config.next_hotkey,
            &config.previous_hotkey,
        )
        .context("Invalid hotkey configuration")?;
        let next_label = key_label(&config.hotkey_modifier, &config.next_hotkey);
        let previous_label = key_label(&config.hotkey_modifier, &config.previous_hotkey);
        let hotkeys = HotkeyListener::new(
            bindings,
            &format!("next {next_label}, previous {previous_label}"),
        )
        .context("Failed to create hotkey listener")?;
        hotkeys.forward_to(session.sender());

        let mut file_selector = FileSelector::new("CSV file").filter("CSV files", &["csv"]);
        if let Some(path) = &config.initial_file {
            file_selector.set(path);
            session.send(SessionCommand::Load(path.clone()));
        }

        info!(
            "CSV Auto Typer ready. {} types the next fragment, {} the previous one.",
            next_label, previous_label
        );

        Ok(Self {
            session,
            _hotkeys: hotkeys,
            #[cfg(not(target_os = "linux"))]
            tray: TrayManager::new()
                .inspect_err(|e| warn!("System tray unavailable: {:#}", e))
                .ok(),
            file_selector,
            jump_entry: LabeledEntry::new("Jump to")
                .widths(70.0, 60.0)
                .filter(|c| c.is_ascii_digit()),
            count_label: InfoLabel::new("Fragments").ellipsis(false),
            always_on_top: config.always_on_top,
            snapshot: Snapshot::default(),
            dialog: None,
            previous_caption: format!("<--- {previous_label} ---"),
            next_caption: format!("--- {next_label} --->"),
        })
    }

    /// Apply everything the session reported since the last frame.
    fn process_session_events(&mut self, ctx: &egui::Context) {
        for event in self.session.drain() {
            if let Some(dialog) = dialog_for(&event) {
                self.dialog = Some(dialog);
            }

            match event {
                SessionEvent::Loaded { path, snapshot } => {
                    self.file_selector.set(path);
                    self.apply_snapshot(ctx, snapshot);
                }
                SessionEvent::Updated(snapshot) => self.apply_snapshot(ctx, snapshot),
                SessionEvent::LoadFailed { .. }
                | SessionEvent::NothingToType
                | SessionEvent::TypeFailed(_)
                | SessionEvent::Unavailable(_) => {}
            }
        }
    }

    /// Push new state to the slots, the window title, and the tray
    fn apply_snapshot(&mut self, ctx: &egui::Context, snapshot: Snapshot) {
        ctx.send_viewport_cmd(ViewportCommand::Title(snapshot.summary()));

        #[cfg(not(target_os = "linux"))]
        if let Some(tray) = &self.tray
            && let Err(e) = tray.show(&snapshot)
        {
            warn!("Failed to update tray: {:#}", e);
        }

        self.count_label.set(snapshot.total.to_string());
        self.snapshot = snapshot;
    }

    /// File picker and always-on-top toggle
    fn show_settings(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if let Some(path) = self.file_selector.show(ui) {
                self.session.send(SessionCommand::Load(path));
            }

            ui.add_space(20.0);
            if ui
                .checkbox(&mut self.always_on_top, "Always on top")
                .changed()
            {
                info!("Always on top: {}", self.always_on_top);
                ui.ctx()
                    .send_viewport_cmd(ViewportCommand::WindowLevel(window_level(
                        self.always_on_top,
                    )));
            }
        });
    }

    /// Previous, current, and next slots with key captions
    fn show_preview(&self, ui: &mut egui::Ui) {
        let preview = self.snapshot.preview.as_ref();

        egui::Grid::new("preview")
            .num_columns(5)
            .spacing([8.0, 4.0])
            .show(ui, |ui| {
                ui.label("");
                ui.label("");
                ui.vertical_centered(|ui| ui.label("Next to type"));
                ui.end_row();

                show_slot(ui, preview.map(|p| &p.previous));
                ui.label(&self.previous_caption);
                show_slot(ui, preview.map(|p| &p.current));
                ui.label(&self.next_caption);
                show_slot(ui, preview.map(|p| &p.next));
                ui.end_row();
            });
    }

    /// Jump entry, its button, and the fragment count
    fn show_jump(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let response = self.jump_entry.show(ui);
            let submitted =
                response.lost_focus() && ui.input(|input| input.key_pressed(egui::Key::Enter));

            if ui.button("Jump").clicked() || submitted {
                self.session
                    .send(SessionCommand::Jump(self.jump_entry.get().to_string()));
            }

            ui.add_space(20.0);
            ui.add(&self.count_label);
        });
    }

    /// Pending message, until dismissed
    fn show_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = &self.dialog else {
            return;
        };

        let color = match dialog.kind {
            DialogKind::Info => ctx.style().visuals.text_color(),
            DialogKind::Warning => Color32::from_rgb(0xd0, 0x90, 0x20),
            DialogKind::Error => Color32::from_rgb(0xd0, 0x40, 0x40),
        };

        let mut dismissed = false;
        egui::Window::new(dialog.title())
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(RichText::new(&dialog.message).color(color));
                ui.vertical_centered(|ui| {
                    dismissed = ui.button("OK").clicked();
                });
            });

        if dismissed {
            self.dialog = None;
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_session_events(ctx);

        #[cfg(not(target_os = "linux"))]
        if self.tray.as_ref().is_some_and(TrayManager::should_quit) {
            info!("Quit requested");
            ctx.send_viewport_cmd(ViewportCommand::Close);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_settings(ui);
            ui.separator();
            self.show_preview(ui);
            ui.add_space(8.0);
            self.show_jump(ui);
        });

        self.show_dialog(ctx);

        // Tray menu events do not wake the window on their own
        ctx.request_repaint_after(Duration::from_millis(250));
    }
}

/// Window level for the always-on-top toggle.
pub fn window_level(always_on_top: bool) -> WindowLevel {
    if always_on_top {
        WindowLevel::AlwaysOnTop
    } else {
        WindowLevel::Normal
    }
}

/// One framed preview slot with its 1-based position
fn show_slot(ui: &mut egui::Ui, slot: Option<&Slot>) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(SLOT_WIDTH);
        ui.vertical_centered(|ui| {
            match slot {
                Some(slot) => {
                    ui.small(format!("#{}", slot.position));
                    ui.add(egui::Label::new(&slot.text).truncate())
                        .on_hover_text(&slot.text);
                }
                None => {
                    ui.small(" ");
                    ui.label(" ");
                }
            }
        });
    });
}

/// Human-readable name of a binding, e.g. `F10` or `CTRL+F10`.
fn key_label(modifier: &str, key: &str) -> String {
    let modifier = modifier.trim();
    let key = key.trim().to_uppercase();
    if modifier.is_empty() || modifier.eq_ignore_ascii_case("NONE") {
        key
    } else {
        format!("{}+{}", modifier.to_uppercase(), key)
    }
}

/// Message the user must see for `event`, if any.
fn dialog_for(event: &SessionEvent) -> Option<Dialog> {
    let (kind, message) = match event {
        SessionEvent::Loaded { path, snapshot } => (
            DialogKind::Info,
            format!(
                "Loaded {} fragments from {}",
                snapshot.total,
                path.display()
            ),
        ),
        SessionEvent::LoadFailed { path, reason } => (
            DialogKind::Error,
            format!("Failed to load {}: {}", path.display(), reason),
        ),
        SessionEvent::NothingToType => (
            DialogKind::Warning,
            "No fragments loaded. Select a CSV file first.".to_string(),
        ),
        SessionEvent::TypeFailed(reason) => {
            (DialogKind::Error, format!("Failed to type: {reason}"))
        }
        SessionEvent::Unavailable(reason) => (
            DialogKind::Error,
            format!("Keyboard simulation is unavailable: {reason}"),
        ),
        SessionEvent::Updated(_) => return None,
    };

    Some(Dialog { kind, message })
}
