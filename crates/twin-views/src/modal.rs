#![forbid(unsafe_code)]

//! Modal execution and the event pump.
//!
//! [`Ui::exec_view`] runs a nested loop that fetches events and hands them
//! to one view until [`Ui::end_modal`] sets its end state and the view
//! accepts it. Nesting is ordinary recursion: a handler inside the loop may
//! call `exec_view` again.

use twin_core::command::{
    CANCEL, COMMAND_SET_CHANGED, Command, SCREEN_CHANGED, TIMER_EXPIRED,
};
use twin_core::event::{Event, EventMask, Message, MouseEventKind, Payload};
use twin_core::geometry::Rect;
use twin_core::handle::ViewId;

use crate::flags::{Options, StateFlags};
use crate::tree::SelectMode;
use crate::ui::{Ui, clamp_dim};

/// Where a view is in its modal loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalPhase {
    #[default]
    NotRunning,
    Running,
    /// An end state was requested and awaits validation.
    Ended,
}

impl Ui {
    /// Run `view` modally inside `group` and return its end state.
    ///
    /// The view becomes top-select, modal, and current; a detached view is
    /// inserted for the duration. Afterwards the group's previous current
    /// view, the view's options and modal flag, and the command set are
    /// restored.
    pub fn exec_view(&mut self, group: ViewId, view: ViewId) -> Command {
        if !self.contains(view) || !self.is_group(group) {
            return CANCEL;
        }
        let save_options = self.options(view);
        let detached = self.owner(view).is_none();
        let save_current = self.current(group);
        let save_commands = self.commands();
        let save_modal = self.get_state(view, StateFlags::MODAL);

        self.set_options(view, save_options | Options::TOP_SELECT);
        self.set_state(view, StateFlags::MODAL, true);
        self.set_current(group, Some(view), SelectMode::Enter);
        if detached {
            self.insert(group, view);
        }
        tracing::debug!(?view, ?group, depth = self.modal_stack.len() + 1, "modal loop entered");

        let result = self.execute(view);

        if detached && self.contains(view) {
            self.remove(group, view);
        }
        if self.contains(group) {
            let restore = save_current.filter(|c| self.contains(*c));
            self.set_current(group, restore, SelectMode::Leave);
        }
        self.set_state(view, StateFlags::MODAL, save_modal);
        self.set_options(view, save_options);
        self.set_commands(save_commands);
        tracing::debug!(?view, result, "modal loop exited");
        result
    }

    /// Run the modal loop for an already-inserted view.
    pub fn execute(&mut self, view: ViewId) -> Command {
        self.modal_stack.push(view);
        let result = loop {
            self.set_end_state(view, 0, ModalPhase::Running);
            while self.end_state(view) == 0 {
                if !self.contains(view) {
                    break;
                }
                let mut event = self.get_event();
                if event.is_nothing() {
                    continue;
                }
                self.handle_event(view, &mut event);
                if !event.is_nothing() {
                    tracing::trace!(?view, ?event, "event not handled");
                }
            }
            let end = self.end_state(view);
            if !self.contains(view) || self.valid(view, end) {
                break end;
            }
            tracing::trace!(?view, end, "end state refused");
        };
        self.set_end_state(view, 0, ModalPhase::NotRunning);
        if let Some(i) = self.modal_stack.iter().rposition(|v| *v == view) {
            self.modal_stack.remove(i);
        }
        if result == 0 { CANCEL } else { result }
    }

    /// Ask the modal loop that owns `view` to end with `command`.
    ///
    /// The request goes to the nearest running modal view among `view` and
    /// its owners, or else to the innermost running loop.
    pub fn end_modal(&mut self, view: ViewId, command: Command) {
        let mut at = Some(view);
        let mut target = None;
        while let Some(v) = at {
            if self.get_state(v, StateFlags::MODAL) && self.modal_phase(v) != ModalPhase::NotRunning {
                target = Some(v);
                break;
            }
            at = self.owner(v);
        }
        let target = target.or_else(|| self.modal_stack.last().copied());
        match target {
            Some(t) => self.set_end_state(t, command, ModalPhase::Ended),
            None => tracing::trace!(?view, command, "end_modal with no modal loop running"),
        }
    }

    fn set_end_state(&mut self, view: ViewId, command: Command, phase: ModalPhase) {
        if let Some(n) = self.node_mut(view) {
            n.end_state = command;
            n.phase = phase;
        }
    }

    fn end_state(&self, view: ViewId) -> Command {
        self.node(view).map_or(0, |n| n.end_state)
    }

    /// Where the view is in its modal loop.
    #[must_use]
    pub fn modal_phase(&self, view: ViewId) -> ModalPhase {
        self.node(view).map_or(ModalPhase::NotRunning, |n| n.phase)
    }

    /// The innermost running modal view.
    #[must_use]
    pub fn top_view(&self) -> Option<ViewId> {
        self.modal_stack.last().copied()
    }

    /// Next event for the modal loop, or [`Event::Nothing`] after an idle
    /// pass.
    pub fn get_event(&mut self) -> Event {
        if let Some(event) = self.put_back.take() {
            return event;
        }
        let now = self.now();
        let event = self.queue.poll(self.source.as_mut(), now, EventMask::all());
        if let Some((cols, rows)) = self.queue.take_resize() {
            self.handle_resize(cols, rows);
        }
        if event.is_nothing() {
            self.idle();
        }
        event
    }

    /// Make `event` the next one [`get_event`](Self::get_event) returns.
    pub fn put_event(&mut self, event: Event) {
        if let Some(old) = self.put_back.replace(event) {
            tracing::trace!(?old, "put-back event replaced");
        }
    }

    /// Background work while no input is pending: expire timers, announce
    /// command-set changes, flush the screen, and wait for input.
    pub fn idle(&mut self) {
        let root = self.root();
        let now = self.now();
        for id in self.timers.collect_expired(now) {
            let mut event = Event::Broadcast(
                Message::new(TIMER_EXPIRED).with_info(Payload::Int(id.0 as i64)),
            );
            self.handle_event(root, &mut event);
        }
        if self.take_commands_changed() {
            let mut event = Event::broadcast(COMMAND_SET_CHANGED);
            self.handle_event(root, &mut event);
        }
        if let Err(err) = self.driver.flush() {
            tracing::warn!(%err, "screen flush failed");
        }
        if self.put_back.is_some() {
            return;
        }
        let mut timeout = self.config().idle_timeout;
        let deadlines = [self.timers.next_expiry(), self.queue.mouse().next_deadline()];
        for deadline in deadlines.into_iter().flatten() {
            timeout = timeout.min(deadline.saturating_duration_since(now));
        }
        self.source.wait_for_events(Some(timeout));
    }

    /// Apply a new screen size: relayout from the root, announce
    /// [`SCREEN_CHANGED`], and repaint.
    pub fn handle_resize(&mut self, cols: u16, rows: u16) {
        tracing::debug!(cols, rows, "screen resized");
        let root = self.root();
        self.change_bounds(root, Rect::from_size(clamp_dim(cols), clamp_dim(rows)));
        let mut event = Event::broadcast(SCREEN_CHANGED);
        self.handle_event(root, &mut event);
        self.redraw_screen();
    }

    /// Wait for the next mouse event in `mask`, or the release of the
    /// buttons. Returns `false` on release. Other input is parked and
    /// delivered after the drag.
    pub fn mouse_event(&mut self, event: &mut Event, mask: EventMask) -> bool {
        let mask = mask | EventMask::MOUSE_UP;
        loop {
            if let Some(parked) = self.put_back.take_if(|e| mask.intersects(e.mask())) {
                *event = parked;
            } else {
                let now = self.now();
                *event = self.queue.poll(self.source.as_mut(), now, mask);
            }
            match event.mouse() {
                Some(m) => return m.kind != MouseEventKind::Up,
                None if self.queue.mouse().buttons().is_empty() => return false,
                None => self.idle(),
            }
        }
    }
}
