#![forbid(unsafe_code)]

//! One-shot and periodic timers, expired from the idle pass.

use std::time::{Duration, Instant};

use smallvec::SmallVec;
use twin_core::handle::TimerId;

use crate::ui::Ui;

#[derive(Debug, Clone, Copy)]
struct Timer {
    id: TimerId,
    deadline: Instant,
    period: Option<Duration>,
}

/// Outstanding timers, unordered.
#[derive(Debug, Default)]
pub struct TimerQueue {
    next_id: u64,
    timers: Vec<Timer>,
}

impl TimerQueue {
    /// Arm a timer that fires `timeout` after `now`, then every `period`.
    pub fn set_timer(&mut self, now: Instant, timeout: Duration, period: Option<Duration>) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.timers.push(Timer {
            id,
            deadline: now + timeout,
            period: period.filter(|p| !p.is_zero()),
        });
        id
    }

    /// Disarm a timer. Returns whether it was armed.
    pub fn kill(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    /// Ids of the timers due at `now`, earliest first. One-shot timers are
    /// removed; periodic ones are re-armed one period after `now`.
    pub fn collect_expired(&mut self, now: Instant) -> SmallVec<[TimerId; 4]> {
        let mut due: SmallVec<[(Instant, TimerId); 4]> = self
            .timers
            .iter()
            .filter(|t| t.deadline <= now)
            .map(|t| (t.deadline, t.id))
            .collect();
        due.sort_by_key(|(deadline, _)| *deadline);
        self.timers.retain_mut(|t| {
            if t.deadline > now {
                return true;
            }
            match t.period {
                Some(period) => {
                    t.deadline = now + period;
                    true
                }
                None => false,
            }
        });
        due.into_iter().map(|(_, id)| id).collect()
    }

    /// Earliest deadline.
    #[must_use]
    pub fn next_expiry(&self) -> Option<Instant> {
        self.timers.iter().map(|t| t.deadline).min()
    }

    /// Number of armed timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// Whether no timer is armed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

impl Ui {
    /// Arm a timer. Expiry is announced with a
    /// [`TIMER_EXPIRED`](twin_core::command::TIMER_EXPIRED) broadcast to the
    /// root carrying the id as [`Payload::Int`](twin_core::event::Payload).
    pub fn set_timer(&mut self, timeout: Duration, period: Option<Duration>) -> TimerId {
        let now = self.now();
        let id = self.timers.set_timer(now, timeout, period);
        tracing::trace!(?id, ?timeout, ?period, "timer armed");
        id
    }

    /// Disarm a timer.
    pub fn kill_timer(&mut self, id: TimerId) {
        if self.timers.kill(id) {
            tracing::trace!(?id, "timer killed");
        }
    }
}
