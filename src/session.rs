//! Typing session worker.
//!
//! A single background thread owns the [`Navigator`] and the emitter. Loads,
//! navigation, and jumps all arrive over one channel and are handled strictly
//! in order, so nothing else ever touches the cursor. Navigation requests
//! issued while an emission was still running are dropped.

use std::path::PathBuf;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use anyhow::{Context, Result};
use crossbeam_channel::{Receiver, Sender, unbounded};
use tracing::{debug, error, info, warn};

use crate::fragments;
use crate::input::Emit;
use crate::navigator::{Direction, Navigator, Preview};

/// Requests accepted by the session.
#[derive(Debug)]
pub enum SessionCommand {
    /// Replace the sequence with the contents of a CSV file
    Load(PathBuf),
    /// Type the current fragment and move
    Navigate {
        /// Which way to move after typing
        direction: Direction,
        /// When the key was pressed
        issued_at: Instant,
    },
    /// Move the cursor to a 1-based position typed by the user
    Jump(String),
    /// Stop the worker
    Shutdown,
}

impl SessionCommand {
    /// Navigation request stamped with the current time.
    pub fn navigate(direction: Direction) -> Self {
        Self::Navigate {
            direction,
            issued_at: Instant::now(),
        }
    }
}

/// State pushed to the display after every change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Number of loaded fragments
    pub total: usize,
    /// Preview triple, `None` while nothing is loaded
    pub preview: Option<Preview>,
}

impl Snapshot {
    /// Capture the navigator's current state
    fn of(navigator: &Navigator) -> Self {
        Self {
            total: navigator.len(),
            preview: navigator.preview(),
        }
    }

    /// One-line description for window titles and tooltips.
    pub fn summary(&self) -> String {
        match &self.preview {
            Some(preview) => format!(
                "CSV Auto Typer - next: {} ({}/{})",
                preview.current.text, preview.current.position, self.total
            ),
            None => "CSV Auto Typer - no file loaded".to_string(),
        }
    }
}

/// Notifications sent back to the presentation layer.
#[derive(Debug)]
pub enum SessionEvent {
    /// A file was loaded and the cursor rewound
    Loaded { path: PathBuf, snapshot: Snapshot },
    /// A file could not be read; the previous fragments are kept
    LoadFailed { path: PathBuf, reason: String },
    /// The cursor moved
    Updated(Snapshot),
    /// Navigation was requested with nothing loaded
    NothingToType,
    /// Emission failed; the cursor did not move
    TypeFailed(String),
    /// The emitter could not be created; the session has stopped
    Unavailable(String),
}

/// Handle to a running session.
pub struct SessionHandle {
    /// Command queue into the worker
    commands: Sender<SessionCommand>,
    /// Events coming back from the worker
    events: Receiver<SessionEvent>,
    /// Worker thread
    thread: Option<JoinHandle<()>>,
}

impl SessionHandle {
    /// Spawn the worker.
    ///
    /// The emitter is built on the worker thread itself because OS input
    /// handles are not always `Send`. `wake` runs after every event so the
    /// UI can repaint.
    pub fn spawn<E, F, W>(make_emitter: F, wake: W) -> Result<Self>
    where
        E: Emit + 'static,
        F: FnOnce() -> Result<E> + Send + 'static,
        W: Fn() + Send + 'static,
    {
        let (command_tx, command_rx) = unbounded();
        let (event_tx, event_rx) = unbounded();

        let thread = thread::Builder::new()
            .name("typing-session".to_string())
            .spawn(move || {
                let emitter = match make_emitter() {
                    Ok(emitter) => emitter,
                    Err(e) => {
                        error!("Typing session unavailable: {:#}", e);
                        let _ = event_tx.send(SessionEvent::Unavailable(format!("{e:#}")));
                        wake();
                        return;
                    }
                };
                Worker::new(emitter, event_tx, wake).run(&command_rx);
            })
            .context("Failed to spawn typing session thread")?;

        Ok(Self {
            commands: command_tx,
            events: event_rx,
            thread: Some(thread),
        })
    }

    /// Sender for producers living on other threads, such as hotkey callbacks.
    pub fn sender(&self) -> Sender<SessionCommand> {
        self.commands.clone()
    }

    /// Queue a command, logging if the worker has stopped
    pub fn send(&self, command: SessionCommand) {
        if self.commands.send(command).is_err() {
            warn!("Typing session has stopped; request ignored");
        }
    }

    /// Events received since the last call.
    pub fn drain(&self) -> Vec<SessionEvent> {
        self.events.try_iter().collect()
    }
}

impl Drop for SessionHandle {
    /// Stop the worker and wait for it to finish.
    fn drop(&mut self) {
        let _ = self.commands.send(SessionCommand::Shutdown);
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            error!("Typing session thread panicked");
        }
    }
}

/// State owned by the worker thread.
struct Worker<E, W> {
    /// Fragments and cursor
    navigator: Navigator,
    /// Destination of typed fragments
    emitter: E,
    /// Events back to the presentation layer
    events: Sender<SessionEvent>,
    /// Called after every event
    wake: W,
    /// When the last emission finished; earlier requests arrived while busy
    idle_since: Option<Instant>,
}

impl<E, W> Worker<E, W>
where
    E: Emit,
    W: Fn(),
{
    /// Worker with nothing loaded
    fn new(emitter: E, events: Sender<SessionEvent>, wake: W) -> Self {
        Self {
            navigator: Navigator::new(),
            emitter,
            events,
            wake,
            idle_since: None,
        }
    }

    /// Process commands until shutdown or until every sender is gone
    fn run(mut self, commands: &Receiver<SessionCommand>) {
        info!("Typing session started");

        while let Ok(command) = commands.recv() {
            match command {
                SessionCommand::Load(path) => self.load(path),
                SessionCommand::Navigate {
                    direction,
                    issued_at,
                } => self.navigate(direction, issued_at),
                SessionCommand::Jump(input) => self.jump(&input),
                SessionCommand::Shutdown => break,
            }
        }

        info!("Typing session stopped");
    }

    /// Replace the fragments; on failure keep the old ones
    fn load(&mut self, path: PathBuf) {
        match fragments::load_file(&path) {
            Ok(fragments) => {
                self.navigator.load(fragments);
                let snapshot = Snapshot::of(&self.navigator);
                self.publish(SessionEvent::Loaded { path, snapshot });
            }
            Err(e) => {
                error!("Failed to load {}: {}", path.display(), e);
                self.publish(SessionEvent::LoadFailed {
                    path,
                    reason: e.to_string(),
                });
            }
        }
    }

    /// Type and move, unless the request arrived while still typing
    fn navigate(&mut self, direction: Direction, issued_at: Instant) {
        if self.idle_since.is_some_and(|idle| issued_at < idle) {
            debug!("Dropped {:?} request issued while typing", direction);
            return;
        }

        if self.navigator.is_empty() {
            warn!("Nothing loaded to type");
            self.publish(SessionEvent::NothingToType);
            return;
        }

        let result = self.navigator.step(direction, &mut self.emitter);
        self.idle_since = Some(Instant::now());

        match result {
            Ok(Some(index)) => debug!(
                "Typed fragment {} of {} ({:?})",
                index + 1,
                self.navigator.len(),
                direction
            ),
            Ok(None) => {}
            Err(e) => {
                error!("Failed to type fragment: {:#}", e);
                self.publish(SessionEvent::TypeFailed(format!("{e:#}")));
            }
        }

        self.publish(SessionEvent::Updated(Snapshot::of(&self.navigator)));
    }

    /// Move the cursor; unparseable input is ignored
    fn jump(&mut self, input: &str) {
        if self.navigator.jump(input) {
            debug!("Jumped to cursor {}", self.navigator.cursor());
            self.publish(SessionEvent::Updated(Snapshot::of(&self.navigator)));
        } else {
            debug!("Ignored jump input {:?}", input);
        }
    }

    /// Send an event and wake the UI
    fn publish(&self, event: SessionEvent) {
        if self.events.send(event).is_ok() {
            (self.wake)();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Records fragments, optionally taking a while for each one.
    #[derive(Clone, Default)]
    struct Recorder {
        typed: Arc<Mutex<Vec<String>>>,
        delay: Duration,
    }

    impl Emit for Recorder {
        fn emit(&mut self, text: &str) -> Result<()> {
            thread::sleep(self.delay);
            self.typed.lock().expect("lock").push(text.to_string());
            Ok(())
        }
    }

    fn csv_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write");
        file
    }

    fn spawn(recorder: &Recorder) -> SessionHandle {
        let emitter = recorder.clone();
        SessionHandle::spawn(move || Ok(emitter), || {}).expect("spawn")
    }

    /// Collect events until the worker has processed everything sent so far.
    fn settle(session: SessionHandle) -> Vec<SessionEvent> {
        let events = session.events.clone();
        drop(session);
        events.try_iter().collect()
    }

    fn last_snapshot(events: &[SessionEvent]) -> Option<&Snapshot> {
        events.iter().rev().find_map(|event| match event {
            SessionEvent::Updated(snapshot) | SessionEvent::Loaded { snapshot, .. } => {
                Some(snapshot)
            }
            _ => None,
        })
    }

    #[test]
    fn loads_then_types_in_order() {
        let file = csv_file("A,B\nC\n");
        let recorder = Recorder::default();
        let session = spawn(&recorder);

        session.send(SessionCommand::Load(file.path().to_path_buf()));
        session.send(SessionCommand::navigate(Direction::Forward));
        session.send(SessionCommand::navigate(Direction::Forward));
        let events = settle(session);

        assert!(matches!(events.first(), Some(SessionEvent::Loaded { snapshot, .. }) if snapshot.total == 3));
        assert_eq!(*recorder.typed.lock().expect("lock"), vec!["A", "B"]);
        let preview = last_snapshot(&events)
            .and_then(|s| s.preview.clone())
            .expect("preview");
        assert_eq!(preview.current.text, "C");
        assert_eq!(preview.current.position, 3);
    }

    #[test]
    fn navigation_without_fragments_reports_nothing_to_type() {
        let recorder = Recorder::default();
        let session = spawn(&recorder);

        session.send(SessionCommand::navigate(Direction::Backward));
        let events = settle(session);

        assert!(matches!(events.as_slice(), [SessionEvent::NothingToType]));
        assert!(recorder.typed.lock().expect("lock").is_empty());
    }

    #[test]
    fn requests_issued_while_typing_are_dropped() {
        let file = csv_file("A,B,C\n");
        let recorder = Recorder {
            delay: Duration::from_millis(100),
            ..Recorder::default()
        };
        let session = spawn(&recorder);

        session.send(SessionCommand::Load(file.path().to_path_buf()));
        session.send(SessionCommand::navigate(Direction::Forward));
        session.send(SessionCommand::navigate(Direction::Forward));
        session.send(SessionCommand::navigate(Direction::Backward));
        let events = settle(session);

        assert_eq!(*recorder.typed.lock().expect("lock"), vec!["A"]);
        let snapshot = last_snapshot(&events).expect("snapshot");
        assert_eq!(snapshot.preview.as_ref().map(|p| p.current.position), Some(2));
    }

    #[test]
    fn failed_load_keeps_previous_fragments() {
        let file = csv_file("A,B\n");
        let dir = tempfile::tempdir().expect("tempdir");
        let recorder = Recorder::default();
        let session = spawn(&recorder);

        session.send(SessionCommand::Load(file.path().to_path_buf()));
        session.send(SessionCommand::Load(dir.path().join("missing.csv")));
        session.send(SessionCommand::navigate(Direction::Forward));
        let events = settle(session);

        assert!(
            events
                .iter()
                .any(|e| matches!(e, SessionEvent::LoadFailed { .. }))
        );
        assert_eq!(*recorder.typed.lock().expect("lock"), vec!["A"]);
    }

    #[test]
    fn jump_updates_preview_and_bad_input_is_silent() {
        let file = csv_file("a,b,c,d,e\n");
        let recorder = Recorder::default();
        let session = spawn(&recorder);

        session.send(SessionCommand::Load(file.path().to_path_buf()));
        session.send(SessionCommand::Jump("3".to_string()));
        session.send(SessionCommand::Jump("abc".to_string()));
        let events = settle(session);

        assert_eq!(events.len(), 2, "unparseable jump publishes nothing");
        let preview = last_snapshot(&events)
            .and_then(|s| s.preview.clone())
            .expect("preview");
        assert_eq!(preview.current.text, "c");
    }

    #[test]
    fn summary_names_the_next_fragment() {
        let mut navigator = Navigator::new();
        assert_eq!(
            Snapshot::of(&navigator).summary(),
            "CSV Auto Typer - no file loaded"
        );

        navigator.load(vec!["A".to_string(), "B".to_string(), "C".to_string()]);
        assert!(navigator.jump("2"));
        assert_eq!(
            Snapshot::of(&navigator).summary(),
            "CSV Auto Typer - next: B (2/3)"
        );
    }

    /// Fails the first emission, then records like [`Recorder`].
    struct FlakyOnce {
        failed: bool,
        recorder: Recorder,
    }

    impl Emit for FlakyOnce {
        fn emit(&mut self, text: &str) -> Result<()> {
            if !self.failed {
                self.failed = true;
                anyhow::bail!("boom");
            }
            self.recorder.emit(text)
        }
    }

    fn current_position(event: &SessionEvent) -> Option<usize> {
        match event {
            SessionEvent::Updated(snapshot) => {
                snapshot.preview.as_ref().map(|p| p.current.position)
            }
            _ => None,
        }
    }

    #[test]
    fn failed_emission_refreshes_preview_and_keeps_accepting_requests() {
        let file = csv_file("A,B,C\n");
        let recorder = Recorder::default();
        let emitter = FlakyOnce {
            failed: false,
            recorder: recorder.clone(),
        };
        let session = SessionHandle::spawn(move || Ok(emitter), || {}).expect("spawn");

        session.send(SessionCommand::Load(file.path().to_path_buf()));
        session.send(SessionCommand::navigate(Direction::Forward));

        let mut events = Vec::new();
        while !events.iter().any(|e| matches!(e, SessionEvent::Updated(_))) {
            let event = session
                .events
                .recv_timeout(Duration::from_secs(5))
                .expect("event after failed emission");
            events.push(event);
        }

        session.send(SessionCommand::navigate(Direction::Forward));
        events.extend(settle(session));

        assert!(matches!(events.first(), Some(SessionEvent::Loaded { .. })));
        assert!(matches!(events.get(1), Some(SessionEvent::TypeFailed(reason)) if reason.contains("boom")));
        assert_eq!(events.get(2).and_then(current_position), Some(1));
        assert_eq!(events.get(3).and_then(current_position), Some(2));
        assert_eq!(events.len(), 4);
        assert_eq!(*recorder.typed.lock().expect("lock"), vec!["A"]);
    }

    #[test]
    fn emitter_failure_to_start_is_reported() {
        let session = SessionHandle::spawn(
            || -> Result<Recorder> { anyhow::bail!("no display") },
            || {},
        )
        .expect("spawn");

        let events = settle(session);
        assert!(matches!(events.as_slice(), [SessionEvent::Unavailable(reason)] if reason.contains("no display")));
    }
}
