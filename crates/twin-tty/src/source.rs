#![forbid(unsafe_code)]

//! Event source over crossterm.

use std::collections::VecDeque;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crossterm::event as ct;
use twin_core::event::RawEvent;
use twin_core::source::EventSource;

use crate::input::{MouseTracker, map_event};

/// Longest single poll while waiting; bounds how late a wake-up is seen.
const WAKE_SLICE: Duration = Duration::from_millis(25);

/// Interrupts [`CrosstermEventSource::wait_for_events`] from another thread.
#[derive(Debug, Clone, Default)]
pub struct Waker(Arc<AtomicBool>);

impl Waker {
    /// Wake the pump.
    pub fn wake(&self) {
        self.0.store(true, Ordering::Release);
    }

    fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }
}

/// An [`EventSource`] reading the terminal through crossterm.
#[derive(Debug)]
pub struct CrosstermEventSource {
    mouse: bool,
    tracker: MouseTracker,
    pending: VecDeque<RawEvent>,
    waker: Waker,
}

impl CrosstermEventSource {
    /// A source; `mouse` says whether mouse capture is on.
    pub fn new(mouse: bool) -> Self {
        Self {
            mouse,
            tracker: MouseTracker::new(),
            pending: VecDeque::new(),
            waker: Waker::default(),
        }
    }

    /// A handle other threads can use to interrupt a wait.
    pub fn waker(&self) -> Waker {
        self.waker.clone()
    }

    fn read_available(&mut self) -> io::Result<()> {
        while self.pending.is_empty() && ct::poll(Duration::ZERO)? {
            let event = ct::read()?;
            self.pending.extend(map_event(event, &mut self.tracker));
        }
        Ok(())
    }
}

impl EventSource for CrosstermEventSource {
    fn get_event(&mut self) -> Option<RawEvent> {
        if self.pending.is_empty()
            && let Err(err) = self.read_available()
        {
            tracing::warn!(%err, "terminal read failed");
        }
        self.pending.pop_front()
    }

    fn wait_for_events(&mut self, timeout: Option<Duration>) {
        if !self.pending.is_empty() {
            return;
        }
        let deadline = timeout.map(|t| Instant::now() + t);
        loop {
            if self.waker.take() {
                return;
            }
            let slice = match deadline {
                Some(d) => {
                    let left = d.saturating_duration_since(Instant::now());
                    if left.is_zero() {
                        return;
                    }
                    left.min(WAKE_SLICE)
                }
                None => WAKE_SLICE,
            };
            match ct::poll(slice) {
                Ok(true) => return,
                Ok(false) => {}
                Err(err) => {
                    tracing::warn!(%err, "terminal poll failed");
                    return;
                }
            }
        }
    }

    fn wake_up(&self) {
        self.waker.wake();
    }

    fn mouse_present(&self) -> bool {
        self.mouse
    }

    fn suspend(&mut self) -> io::Result<()> {
        if self.mouse {
            crossterm::execute!(io::stdout(), ct::DisableMouseCapture)?;
        }
        self.tracker.reset();
        self.pending.clear();
        Ok(())
    }

    fn resume(&mut self) -> io::Result<()> {
        if self.mouse {
            crossterm::execute!(io::stdout(), ct::EnableMouseCapture)?;
        }
        Ok(())
    }
}
