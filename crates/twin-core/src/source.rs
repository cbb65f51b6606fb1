#![forbid(unsafe_code)]

//! Input sources.
//!
//! The engine never talks to the OS directly: keyboard, mouse, and resize
//! input arrive through an [`EventSource`]. The terminal backend lives in
//! `twin-tty`; [`ScriptedSource`] replays a fixed list for tests.

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use crate::event::RawEvent;

/// A supplier of raw input.
pub trait EventSource {
    /// Take the next available input without blocking.
    fn get_event(&mut self) -> Option<RawEvent>;

    /// Block until input is available or `timeout` elapses.
    ///
    /// `None` waits indefinitely (or until [`wake_up`](Self::wake_up)).
    fn wait_for_events(&mut self, timeout: Option<Duration>);

    /// Interrupt a pending [`wait_for_events`](Self::wait_for_events).
    fn wake_up(&self);

    /// Whether a pointing device is available.
    fn mouse_present(&self) -> bool {
        true
    }

    /// Release the input device (e.g. before running a shell).
    fn suspend(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Reacquire the input device after [`suspend`](Self::suspend).
    fn resume(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: EventSource + ?Sized> EventSource for Box<S> {
    fn get_event(&mut self) -> Option<RawEvent> {
        (**self).get_event()
    }

    fn wait_for_events(&mut self, timeout: Option<Duration>) {
        (**self).wait_for_events(timeout);
    }

    fn wake_up(&self) {
        (**self).wake_up();
    }

    fn mouse_present(&self) -> bool {
        (**self).mouse_present()
    }

    fn suspend(&mut self) -> io::Result<()> {
        (**self).suspend()
    }

    fn resume(&mut self) -> io::Result<()> {
        (**self).resume()
    }
}

/// An event source that replays pre-loaded input.
///
/// Waiting never blocks; each call is recorded so tests can check the
/// timeouts the pump asked for.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    events: VecDeque<RawEvent>,
    waits: Vec<Option<Duration>>,
    mouse: bool,
    suspended: bool,
}

impl ScriptedSource {
    /// An empty source with a mouse attached.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mouse: true,
            ..Self::default()
        }
    }

    /// A source pre-loaded with `events`.
    #[must_use]
    pub fn with_events(events: impl IntoIterator<Item = RawEvent>) -> Self {
        let mut source = Self::new();
        source.events.extend(events);
        source
    }

    /// Report no mouse.
    #[must_use]
    pub fn without_mouse(mut self) -> Self {
        self.mouse = false;
        self
    }

    /// Queue another event.
    pub fn push(&mut self, event: RawEvent) {
        self.events.push_back(event);
    }

    /// Events not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.events.len()
    }

    /// Timeouts passed to [`EventSource::wait_for_events`], oldest first.
    #[must_use]
    pub fn waits(&self) -> &[Option<Duration>] {
        &self.waits
    }

    /// Whether the source is currently suspended.
    #[must_use]
    pub fn is_suspended(&self) -> bool {
        self.suspended
    }
}

impl EventSource for ScriptedSource {
    fn get_event(&mut self) -> Option<RawEvent> {
        if self.suspended {
            return None;
        }
        self.events.pop_front()
    }

    fn wait_for_events(&mut self, timeout: Option<Duration>) {
        self.waits.push(timeout);
    }

    fn wake_up(&self) {}

    fn mouse_present(&self) -> bool {
        self.mouse
    }

    fn suspend(&mut self) -> io::Result<()> {
        self.suspended = true;
        Ok(())
    }

    fn resume(&mut self) -> io::Result<()> {
        self.suspended = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{KeyCode, KeyEvent};

    #[test]
    fn replays_in_order_and_records_waits() {
        let mut source = ScriptedSource::with_events([
            RawEvent::Key(KeyEvent::new(KeyCode::Char('a'))),
            RawEvent::Resize { cols: 10, rows: 4 },
        ]);
        assert_eq!(source.remaining(), 2);
        assert!(matches!(source.get_event(), Some(RawEvent::Key(_))));
        source.wait_for_events(Some(Duration::from_millis(5)));
        assert!(matches!(
            source.get_event(),
            Some(RawEvent::Resize { cols: 10, rows: 4 })
        ));
        assert_eq!(source.get_event(), None);
        assert_eq!(source.waits(), &[Some(Duration::from_millis(5))]);
    }

    #[test]
    fn suspended_source_withholds_input() {
        let mut source =
            ScriptedSource::with_events([RawEvent::Key(KeyEvent::new(KeyCode::Enter))]);
        source.suspend().unwrap();
        assert_eq!(source.get_event(), None);
        source.resume().unwrap();
        assert!(source.get_event().is_some());
    }

    #[test]
    fn boxed_source_forwards() {
        let mut boxed: Box<dyn EventSource> = Box::new(ScriptedSource::new().without_mouse());
        assert!(!boxed.mouse_present());
        assert_eq!(boxed.get_event(), None);
    }
}
