//! Cursor over the loaded fragment sequence.
//!
//! The navigator walks a flat list of fragments with wraparound in both
//! directions. Emission is delegated to an [`Emit`] implementation so the
//! cursor logic never touches the OS input layer directly.

use anyhow::Result;

use crate::input::Emit;

/// Direction of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Type the current fragment, then move forward.
    Forward,
    /// Type the current fragment, then move backward.
    Backward,
}

/// One display slot of the preview triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    /// 1-based position of the fragment in the sequence
    pub position: usize,
    /// Fragment text
    pub text: String,
}

/// Previous, current, and next fragments relative to the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    /// Fragment before the cursor (wraps to the last element)
    pub previous: Slot,
    /// Fragment that the next navigation will type
    pub current: Slot,
    /// Fragment after the cursor (wraps to the first element)
    pub next: Slot,
}

/// Ordered fragment sequence plus the cursor walking it.
#[derive(Debug, Default)]
pub struct Navigator {
    /// Loaded fragments, immutable until the next load
    fragments: Vec<String>,
    /// Index of the current fragment; always in range when non-empty
    cursor: usize,
}

impl Navigator {
    /// Create an empty navigator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the sequence and rewind to the first fragment.
    pub fn load(&mut self, fragments: Vec<String>) {
        self.fragments = fragments;
        self.cursor = 0;
    }

    /// Whether nothing is loaded
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Number of loaded fragments
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Index of the fragment the next navigation will type
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the cursor to a 1-based position typed by the user.
    ///
    /// Returns `false` without touching the cursor when `input` is not an
    /// integer. Positions outside the sequence rewind to the first fragment.
    pub fn jump(&mut self, input: &str) -> bool {
        let Ok(target) = input.trim().parse::<i64>() else {
            return false;
        };

        self.cursor = usize::try_from(target)
            .ok()
            .and_then(|position| position.checked_sub(1))
            .filter(|&index| index < self.fragments.len())
            .unwrap_or(0);
        true
    }

    /// Emit the current fragment and move in `direction`.
    ///
    /// Returns the index that was emitted, or `None` for an empty sequence.
    /// On emission failure the cursor stays where it was.
    pub fn step<E>(&mut self, direction: Direction, emitter: &mut E) -> Result<Option<usize>>
    where
        E: Emit + ?Sized,
    {
        match direction {
            Direction::Forward => self.advance(emitter),
            Direction::Backward => self.retreat(emitter),
        }
    }

    /// Emit the current fragment, then move forward with wraparound.
    pub fn advance<E>(&mut self, emitter: &mut E) -> Result<Option<usize>>
    where
        E: Emit + ?Sized,
    {
        let len = self.fragments.len();
        let Some(index) = self.current_index() else {
            return Ok(None);
        };

        self.emit_at(index, emitter)?;
        self.cursor = (index + 1) % len;
        Ok(Some(index))
    }

    /// Emit the current fragment, then move backward with wraparound.
    pub fn retreat<E>(&mut self, emitter: &mut E) -> Result<Option<usize>>
    where
        E: Emit + ?Sized,
    {
        let len = self.fragments.len();
        let Some(index) = self.current_index() else {
            return Ok(None);
        };

        self.emit_at(index, emitter)?;
        self.cursor = index.checked_sub(1).unwrap_or(len - 1);
        Ok(Some(index))
    }

    /// Previous/current/next triple for display, `None` when empty.
    pub fn preview(&self) -> Option<Preview> {
        let len = self.fragments.len();
        let current = self.current_index()?;
        let previous = current.checked_sub(1).unwrap_or(len - 1);
        let next = (current + 1) % len;

        Some(Preview {
            previous: self.slot(previous)?,
            current: self.slot(current)?,
            next: self.slot(next)?,
        })
    }

    /// Cursor normalized into range, `None` when empty.
    fn current_index(&self) -> Option<usize> {
        if self.fragments.is_empty() {
            None
        } else if self.cursor < self.fragments.len() {
            Some(self.cursor)
        } else {
            Some(0)
        }
    }

    /// Hand the fragment at `index` to the emitter
    fn emit_at<E>(&self, index: usize, emitter: &mut E) -> Result<()>
    where
        E: Emit + ?Sized,
    {
        match self.fragments.get(index) {
            Some(text) => emitter.emit(text),
            None => Ok(()),
        }
    }

    /// Display slot for `index`
    fn slot(&self, index: usize) -> Option<Slot> {
        self.fragments.get(index).map(|text| Slot {
            position: index + 1,
            text: text.clone(),
        })
    }
}
