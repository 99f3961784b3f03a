//! Global hotkey handling

use anyhow::{Context, Result};
use crossbeam_channel::Sender;
use global_hotkey::{
    GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState,
    hotkey::{Code, HotKey, Modifiers},
};
use tracing::{debug, info};

use crate::navigator::Direction;
use crate::session::SessionCommand;

/// Keys accepted by name, in addition to letters, digits, and F1-F12.
const NAMED_KEYS: &[(&str, Code)] = &[
    ("SPACE", Code::Space),
    ("TAB", Code::Tab),
    ("ESC", Code::Escape),
    ("ESCAPE", Code::Escape),
    ("INSERT", Code::Insert),
    ("DELETE", Code::Delete),
    ("HOME", Code::Home),
    ("END", Code::End),
    ("PAGEUP", Code::PageUp),
    ("PAGEDOWN", Code::PageDown),
    ("UP", Code::ArrowUp),
    ("DOWN", Code::ArrowDown),
    ("LEFT", Code::ArrowLeft),
    ("RIGHT", Code::ArrowRight),
    ("PAUSE", Code::Pause),
    ("SCROLLLOCK", Code::ScrollLock),
];

/// F1-F12, by number minus one
const FUNCTION_KEYS: [Code; 12] = [
    Code::F1,
    Code::F2,
    Code::F3,
    Code::F4,
    Code::F5,
    Code::F6,
    Code::F7,
    Code::F8,
    Code::F9,
    Code::F10,
    Code::F11,
    Code::F12,
];

/// A-Z, in alphabetical order
const LETTER_KEYS: [Code; 26] = [
    Code::KeyA,
    Code::KeyB,
    Code::KeyC,
    Code::KeyD,
    Code::KeyE,
    Code::KeyF,
    Code::KeyG,
    Code::KeyH,
    Code::KeyI,
    Code::KeyJ,
    Code::KeyK,
    Code::KeyL,
    Code::KeyM,
    Code::KeyN,
    Code::KeyO,
    Code::KeyP,
    Code::KeyQ,
    Code::KeyR,
    Code::KeyS,
    Code::KeyT,
    Code::KeyU,
    Code::KeyV,
    Code::KeyW,
    Code::KeyX,
    Code::KeyY,
    Code::KeyZ,
];

/// 0-9, top row
const DIGIT_KEYS: [Code; 10] = [
    Code::Digit0,
    Code::Digit1,
    Code::Digit2,
    Code::Digit3,
    Code::Digit4,
    Code::Digit5,
    Code::Digit6,
    Code::Digit7,
    Code::Digit8,
    Code::Digit9,
];

/// The next/previous key pair
#[derive(Debug, Clone, Copy)]
pub struct Bindings {
    /// Types the current fragment and moves forward
    pub next: HotKey,
    /// Types the current fragment and moves backward
    pub previous: HotKey,
}

impl Bindings {
    /// Parse both bindings sharing one modifier spec such as `CTRL+SHIFT` or `NONE`
    pub fn parse(modifier: &str, next: &str, previous: &str) -> Result<Self> {
        let modifiers = parse_modifiers(modifier)?;
        let next = HotKey::new(modifiers, parse_key(next)?);
        let previous = HotKey::new(modifiers, parse_key(previous)?);

        if next.id() == previous.id() {
            anyhow::bail!("Next and previous hotkeys must differ");
        }

        Ok(Self { next, previous })
    }

    /// Which way a press of hotkey `id` navigates
    pub fn direction_for(&self, id: u32) -> Option<Direction> {
        if id == self.next.id() {
            Some(Direction::Forward)
        } else if id == self.previous.id() {
            Some(Direction::Backward)
        } else {
            None
        }
    }
}

/// Registered hotkeys; unregistered when dropped with the manager
pub struct HotkeyListener {
    /// Hotkey manager
    _manager: GlobalHotKeyManager,
    /// Active bindings
    pub bindings: Bindings,
}

impl HotkeyListener {
    /// Register both bindings with the OS
    pub fn new(bindings: Bindings, describe: &str) -> Result<Self> {
        let manager = GlobalHotKeyManager::new().context("Failed to create hotkey manager")?;

        manager.register_all(&[bindings.next, bindings.previous]).with_context(|| {
            format!(
                "Failed to register hotkeys {describe}. Another application may own them; \
                set NEXT_HOTKEY / PREVIOUS_HOTKEY in your .env file."
            )
        })?;
        info!("Registered hotkeys: {}", describe);

        Ok(Self {
            _manager: manager,
            bindings,
        })
    }

    /// Send a navigation request to `commands` on every press.
    ///
    /// Runs on the hotkey library's own thread, so presses are forwarded even
    /// while the window is idle or hidden.
    pub fn forward_to(&self, commands: Sender<SessionCommand>) {
        let bindings = self.bindings;
        GlobalHotKeyEvent::set_event_handler(Some(move |event: GlobalHotKeyEvent| {
            if !matches!(event.state, HotKeyState::Pressed) {
                return;
            }
            if let Some(direction) = bindings.direction_for(event.id) {
                debug!("Hotkey pressed: {:?}", direction);
                let _ = commands.send(SessionCommand::navigate(direction));
            }
        }));
    }
}

/// Parse a `+`-separated modifier list; empty or `NONE` means no modifier
fn parse_modifiers(spec: &str) -> Result<Option<Modifiers>> {
    let spec = spec.trim();
    if spec.is_empty() || spec.eq_ignore_ascii_case("NONE") {
        return Ok(None);
    }

    spec.split('+')
        .try_fold(Modifiers::empty(), |acc, part| {
            let modifier = match part.trim().to_uppercase().as_str() {
                "CTRL" | "CONTROL" => Modifiers::CONTROL,
                "ALT" => Modifiers::ALT,
                "SHIFT" => Modifiers::SHIFT,
                "WIN" | "SUPER" | "META" => Modifiers::SUPER,
                _ => anyhow::bail!("Invalid modifier: {}", part),
            };
            Ok(acc | modifier)
        })
        .map(Some)
}

/// Parse a key name to Code
fn parse_key(key: &str) -> Result<Code> {
    let name = key.trim().to_uppercase();

    if let Some(&(_, code)) = NAMED_KEYS.iter().find(|(n, _)| *n == name) {
        return Ok(code);
    }

    let indexed = if let Some(number) = name.strip_prefix('F').filter(|n| !n.is_empty()) {
        number
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| FUNCTION_KEYS.get(i))
    } else {
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(c @ 'A'..='Z'), None) => LETTER_KEYS.get(offset_from(c, 'A')),
            (Some(c @ '0'..='9'), None) => DIGIT_KEYS.get(offset_from(c, '0')),
            _ => None,
        }
    };

    indexed
        .copied()
        .with_context(|| format!("Invalid key: {key}"))
}

/// Distance of `c` from `base` in code points, used to index key tables
fn offset_from(c: char, base: char) -> usize {
    u32::from(c)
        .checked_sub(u32::from(base))
        .and_then(|offset| usize::try_from(offset).ok())
        .unwrap_or(usize::MAX)
}
