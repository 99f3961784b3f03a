//! CSV Auto Typer: types CSV fragments into the focused window on a global hotkey.

#![cfg_attr(windows, windows_subsystem = "windows")]

mod app;
mod config;
mod fragments;
mod hotkey;
mod input;
mod navigator;
mod session;
#[cfg(not(target_os = "linux"))]
mod tray;
mod widgets;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use app::App;
use config::Config;

/// Main entry point: load configuration, set up logging, and run the window.
fn main() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    setup_logging(&config)?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("CSV Auto Typer")
            .with_inner_size([720.0, 220.0])
            .with_resizable(false)
            .with_window_level(app::window_level(config.always_on_top)),
        ..Default::default()
    };

    eframe::run_native(
        "CSV Auto Typer",
        options,
        Box::new(move |cc| Ok(Box::new(App::new(cc, config)?))),
    )
    .map_err(|e| anyhow::anyhow!("Window failed: {e}"))
}

/// Configure tracing based on the log level and output destination in config.
fn setup_logging(config: &Config) -> Result<()> {
    let level = match config.log_level.to_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "warn" => "warn",
        "error" => "error",
        _ => "info",
    };
    // enigo is suppressed to error-only so typed fragments never reach the log
    let filter = EnvFilter::new(format!("{level},enigo=error"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);

    if config.log_to_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("csv-auto-typer.log")
            .context("Failed to open log file")?;
        subscriber.with_writer(file).init();
    } else {
        subscriber.init();
    }

    Ok(())
}
