//! Fragment emission via keyboard simulation

use anyhow::{Context, Result};
use enigo::{Direction, Enigo, Key, Keyboard, Settings};
use std::thread;
use std::time::Duration;

/// Sink for fragments picked by the navigator.
pub trait Emit {
    /// Deliver `text` to its destination.
    fn emit(&mut self, text: &str) -> Result<()>;
}

/// Types fragments into whichever window holds input focus
pub struct TextInjector {
    /// Enigo instance
    enigo: Enigo,
    /// Pause before typing so the hotkey's own key release lands first
    settle_delay: Duration,
}

impl TextInjector {
    /// Create new text injector
    pub fn new(settle_delay: Duration) -> Result<Self> {
        let enigo =
            Enigo::new(&Settings::default()).context("Failed to initialize keyboard simulation")?;

        Ok(Self {
            enigo,
            settle_delay,
        })
    }

    /// Type text into the active window, then press Enter
    pub fn type_and_enter(&mut self, text: &str) -> Result<()> {
        thread::sleep(self.settle_delay);

        if !text.is_empty() {
            // text() is more reliable than per-key events for non-ASCII input
            self.enigo.text(text).context("Failed to type fragment")?;
        }
        self.enigo
            .key(Key::Return, Direction::Click)
            .context("Failed to press Enter")?;

        Ok(())
    }
}

impl Emit for TextInjector {
    fn emit(&mut self, text: &str) -> Result<()> {
        self.type_and_enter(text)
    }
}
