//! System tray icon management

use anyhow::{Context, Result};
use tracing::{debug, info};
use tray_icon::{
    Icon, TrayIcon, TrayIconBuilder,
    menu::{Menu, MenuEvent, MenuItem},
};

use crate::session::Snapshot;

/// System tray manager
pub struct TrayManager {
    /// Tray icon
    tray: TrayIcon,
    /// Quit menu item
    quit_item: MenuItem,
}

impl TrayManager {
    /// Create new tray manager
    pub fn new() -> Result<Self> {
        let quit_item = MenuItem::new("Quit", true, None);
        let menu = Menu::new();
        menu.append(&quit_item).context("Failed to add quit item")?;

        let mut builder = TrayIconBuilder::new()
            .with_tooltip(Snapshot::default().summary())
            .with_menu(Box::new(menu));

        // Optional; the platform default is used when absent
        match Icon::from_path("./assets/icons/keyboard.ico", None) {
            Ok(icon) => builder = builder.with_icon(icon),
            Err(e) => info!("Could not load tray icon: {} (using default)", e),
        }

        let tray = builder.build().context("Failed to create tray icon")?;

        info!("System tray icon created");

        Ok(Self { tray, quit_item })
    }

    /// Show the upcoming fragment in the tooltip
    pub fn show(&self, snapshot: &Snapshot) -> Result<()> {
        self.tray
            .set_tooltip(Some(snapshot.summary()))
            .context("Failed to set tooltip")?;
        debug!("Tray tooltip updated");
        Ok(())
    }

    /// Check if quit was clicked
    pub fn should_quit(&self) -> bool {
        MenuEvent::receiver()
            .try_iter()
            .any(|event| event.id == self.quit_item.id())
    }
}
