#![forbid(unsafe_code)]

//! Event queue and mouse gesture recognition.
//!
//! Event sources report the mouse as a stream of device samples: where the
//! pointer is and which buttons are held. Views want gestures. The
//! [`GestureRecognizer`] compares each sample with the previous one and
//! produces at most one [`MouseEvent`] per sample:
//!
//! | Transition | Result |
//! |---|---|
//! | button released, same position | `Up` |
//! | button released, position changed | `Move`, then `Up` on the next poll |
//! | button pressed | `Down` (double/triple flags when repeated in place) |
//! | wheel reported | `Wheel`, after the button transition of the same sample |
//! | position changed | `Move` |
//! | button held past the repeat delay | `Auto` |
//!
//! Gestures that did not fit in their sample's poll come out of
//! [`GestureRecognizer::tick`] in order. Auto-repeats keep their cadence
//! when a poll is slightly late; a poll more than a whole interval late
//! restarts the cadence instead of firing the missed repeats.
//!
//! Time is injected as an [`Instant`] so the state machine is deterministic
//! under test.
//!
//! [`EventQueue`] wraps the recognizer with the keyboard passthrough and a
//! single pending slot for an event the caller's mask did not accept.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::event::{
    Event, EventMask, MouseButtons, MouseEvent, MouseEventKind, MouseFlags, MouseSample, RawEvent,
};
use crate::geometry::Point;
use crate::source::EventSource;

/// Timing of mouse gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseConfig {
    /// Maximum gap between presses that still counts as a multi-click.
    pub double_click: Duration,
    /// Hold time before the first auto-repeat.
    pub repeat_delay: Duration,
    /// Interval between subsequent auto-repeats.
    pub auto_repeat: Duration,
}

impl Default for MouseConfig {
    fn default() -> Self {
        Self {
            double_click: Duration::from_millis(440),
            repeat_delay: Duration::from_millis(440),
            auto_repeat: Duration::from_millis(55),
        }
    }
}

impl MouseConfig {
    /// Set the multi-click window.
    #[must_use]
    pub fn double_click(mut self, delay: Duration) -> Self {
        self.double_click = delay;
        self
    }

    /// Set the initial hold delay.
    #[must_use]
    pub fn repeat_delay(mut self, delay: Duration) -> Self {
        self.repeat_delay = delay;
        self
    }

    /// Set the auto-repeat interval.
    #[must_use]
    pub fn auto_repeat(mut self, interval: Duration) -> Self {
        self.auto_repeat = interval;
        self
    }
}

#[derive(Debug, Clone, Copy)]
struct LastClick {
    position: Point,
    buttons: MouseButtons,
    at: Instant,
    /// 0 = single, 1 = double, 2 = triple.
    level: u8,
}

/// Turns mouse samples into gestures.
#[derive(Debug, Clone)]
pub struct GestureRecognizer {
    config: MouseConfig,
    last: MouseSample,
    last_click: Option<LastClick>,
    next_auto: Option<Instant>,
    deferred: VecDeque<MouseEvent>,
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new(MouseConfig::default())
    }
}

impl GestureRecognizer {
    /// Create a recognizer with the given timing.
    #[must_use]
    pub fn new(config: MouseConfig) -> Self {
        Self {
            config,
            last: MouseSample::default(),
            last_click: None,
            next_auto: None,
            deferred: VecDeque::new(),
        }
    }

    /// Current timing.
    #[must_use]
    pub fn config(&self) -> &MouseConfig {
        &self.config
    }

    /// Replace the timing. Takes effect from the next transition.
    pub fn set_config(&mut self, config: MouseConfig) {
        self.config = config;
    }

    /// The most recent sample.
    #[must_use]
    pub fn last_sample(&self) -> MouseSample {
        self.last
    }

    /// Buttons held according to the most recent sample.
    #[must_use]
    pub fn buttons(&self) -> MouseButtons {
        self.last.buttons
    }

    /// Forget all state (e.g. after the device was suspended).
    pub fn reset(&mut self) {
        self.last = MouseSample::default();
        self.last_click = None;
        self.next_auto = None;
        self.deferred.clear();
    }

    /// Feed a device sample.
    pub fn process(&mut self, sample: MouseSample, now: Instant) -> Option<MouseEvent> {
        let prev = self.last;
        self.last = sample;
        let moved = sample.position != prev.position;
        let released = prev.buttons & !sample.buttons;
        let pressed = sample.buttons & !prev.buttons;
        let mut flags = MouseFlags::empty();
        if moved {
            flags |= MouseFlags::MOVED;
            self.last_click = None;
        }

        let mut wheel = sample.wheel.map(|w| {
            let mut ev = self.gesture(MouseEventKind::Wheel, sample.buttons, flags);
            ev.wheel = Some(w);
            ev
        });
        let event = if !released.is_empty() {
            if sample.buttons.is_empty() {
                self.next_auto = None;
            }
            let up = self.gesture(MouseEventKind::Up, released, MouseFlags::empty());
            if moved {
                self.deferred.push_back(up);
                self.gesture(MouseEventKind::Move, prev.buttons, flags)
            } else {
                up
            }
        } else if !pressed.is_empty() {
            flags |= self.count_click(sample, now);
            self.next_auto = Some(now + self.config.repeat_delay);
            self.gesture(MouseEventKind::Down, sample.buttons, flags)
        } else if let Some(ev) = wheel.take() {
            ev
        } else if moved {
            self.gesture(MouseEventKind::Move, sample.buttons, flags)
        } else {
            return None;
        };
        self.deferred.extend(wheel);
        crate::trace!(kind = ?event.kind, x = event.position.x, y = event.position.y, "mouse gesture");
        Some(event)
    }

    /// Produce time-driven gestures: a deferred gesture, or an auto-repeat
    /// while a button stays held. Yields at most one event per call.
    pub fn tick(&mut self, now: Instant) -> Option<MouseEvent> {
        if let Some(ev) = self.deferred.pop_front() {
            return Some(ev);
        }
        if self.last.buttons.is_empty() {
            return None;
        }
        let due = self.next_auto?;
        if now < due {
            return None;
        }
        let next = due + self.config.auto_repeat;
        self.next_auto = Some(if next > now {
            next
        } else {
            now + self.config.auto_repeat
        });
        Some(self.gesture(MouseEventKind::Auto, self.last.buttons, MouseFlags::empty()))
    }

    /// When the next auto-repeat is due, if a button is held.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        if self.last.buttons.is_empty() {
            None
        } else {
            self.next_auto
        }
    }

    fn count_click(&mut self, sample: MouseSample, now: Instant) -> MouseFlags {
        let level = match self.last_click {
            Some(prev)
                if prev.position == sample.position
                    && prev.buttons == sample.buttons
                    && now.saturating_duration_since(prev.at) <= self.config.double_click =>
            {
                (prev.level + 1).min(2)
            }
            _ => 0,
        };
        self.last_click = Some(LastClick {
            position: sample.position,
            buttons: sample.buttons,
            at: now,
            level,
        });
        match level {
            0 => MouseFlags::empty(),
            1 => MouseFlags::DOUBLE_CLICK,
            _ => MouseFlags::TRIPLE_CLICK,
        }
    }

    fn gesture(&self, kind: MouseEventKind, buttons: MouseButtons, flags: MouseFlags) -> MouseEvent {
        let mut ev = MouseEvent::new(kind, self.last.position, buttons).with_flags(flags);
        ev.modifiers = self.last.modifiers;
        ev
    }
}

/// Merges keyboard input and recognised mouse gestures into [`Event`]s.
#[derive(Debug, Default)]
pub struct EventQueue {
    mouse: GestureRecognizer,
    pending: Option<Event>,
    resized: Option<(u16, u16)>,
}

impl EventQueue {
    /// Create a queue with the given mouse timing.
    #[must_use]
    pub fn new(config: MouseConfig) -> Self {
        Self {
            mouse: GestureRecognizer::new(config),
            pending: None,
            resized: None,
        }
    }

    /// The gesture recognizer.
    #[must_use]
    pub fn mouse(&self) -> &GestureRecognizer {
        &self.mouse
    }

    /// Mutable access to the gesture recognizer.
    pub fn mouse_mut(&mut self) -> &mut GestureRecognizer {
        &mut self.mouse
    }

    /// Park an event for a later poll. Replaces whatever was parked.
    pub fn park(&mut self, event: Event) {
        if let Some(old) = self.pending.replace(event) {
            crate::trace!(dropped = ?old.mask(), "pending slot overwritten");
        }
    }

    /// Whether an event is parked.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the last resize reported by the source.
    pub fn take_resize(&mut self) -> Option<(u16, u16)> {
        self.resized.take()
    }

    /// Fetch the next event whose class is in `mask`.
    ///
    /// Order: a parked event, a deferred or auto-repeat mouse gesture, then
    /// whatever the source has ready. A produced event outside `mask` is
    /// parked and polling goes on. Returns [`Event::Nothing`] when the source
    /// is drained; resizes are recorded for [`take_resize`](Self::take_resize)
    /// and end the poll.
    pub fn poll<S: EventSource + ?Sized>(
        &mut self,
        source: &mut S,
        now: Instant,
        mask: EventMask,
    ) -> Event {
        if let Some(ev) = self.pending.take_if(|ev| mask.intersects(ev.mask())) {
            return ev;
        }
        if let Some(ev) = self.mouse.tick(now) {
            if let Some(ev) = self.accept(Event::Mouse(ev), mask) {
                return ev;
            }
        }
        while let Some(raw) = source.get_event() {
            let ev = match raw {
                RawEvent::Key(key) => Event::Key(key),
                RawEvent::Mouse(sample) => match self.mouse.process(sample, now) {
                    Some(m) => Event::Mouse(m),
                    None => continue,
                },
                RawEvent::Resize { cols, rows } => {
                    self.resized = Some((cols, rows));
                    return Event::Nothing;
                }
            };
            if let Some(ev) = self.accept(ev, mask) {
                return ev;
            }
        }
        Event::Nothing
    }

    fn accept(&mut self, ev: Event, mask: EventMask) -> Option<Event> {
        if mask.intersects(ev.mask()) {
            Some(ev)
        } else {
            self.park(ev);
            None
        }
    }
}
