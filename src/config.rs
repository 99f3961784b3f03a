//! Configuration loading from an optional .env file

use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from .env and the process environment
#[derive(Debug, Clone)]
#[allow(missing_docs)]
pub struct Config {
    pub next_hotkey: String,
    pub previous_hotkey: String,
    pub hotkey_modifier: String,
    pub always_on_top: bool,
    pub typing_delay_ms: u64,
    pub initial_file: Option<PathBuf>,
    pub log_to_file: bool,
    pub log_level: String,
}

impl Config {
    /// Load configuration, falling back to defaults for anything unset
    pub fn load() -> Result<Self> {
        Self::check_env_file(dotenvy::dotenv())?;
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Accept a missing .env (every key has a default); reject a malformed one
    fn check_env_file<T>(result: dotenvy::Result<T>) -> Result<()> {
        match result {
            Ok(_) => Ok(()),
            Err(e) if e.not_found() => Ok(()),
            Err(e) => Err(e)
                .context("Failed to read .env file. See .env.example for the expected format"),
        }
    }

    /// Build configuration from an arbitrary key lookup
    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Self {
            next_hotkey: get("NEXT_HOTKEY", "F10"),
            previous_hotkey: get("PREVIOUS_HOTKEY", "F9"),
            hotkey_modifier: get("HOTKEY_MODIFIER", "NONE"),
            always_on_top: get("ALWAYS_ON_TOP", "true")
                .parse()
                .context("Invalid ALWAYS_ON_TOP (expected true or false)")?,
            typing_delay_ms: get("TYPING_DELAY_MS", "50")
                .parse()
                .context("Invalid TYPING_DELAY_MS")?,
            initial_file: lookup("INITIAL_FILE")
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from),
            log_to_file: get("LOG_TO_FILE", "false")
                .parse()
                .context("Invalid LOG_TO_FILE (expected true or false)")?,
            log_level: get("LOG_LEVEL", "info"),
        })
    }
}
