#![forbid(unsafe_code)]

//! State transitions and their side effects.

use twin_core::command::{RECEIVED_FOCUS, RELEASED_FOCUS};
use twin_core::event::{Event, Message, Payload};
use twin_core::handle::ViewId;

use crate::flags::{Options, StateFlags};
use crate::ui::Ui;

impl Ui {
    /// Default state change.
    ///
    /// For an owned view:
    /// - `VISIBLE`: exposure follows the owner, the view (and its shadow) is
    ///   drawn or the area beneath it repainted, and the owner's current
    ///   child is re-chosen if the view is selectable.
    /// - `CURSOR_VIS` / `CURSOR_INS`: the caret is updated.
    /// - `SHADOW`: the area under the view is repainted.
    /// - `FOCUSED`: the caret is updated and the owner receives a
    ///   received/released-focus broadcast.
    ///
    /// For a group, `ACTIVE` and `DRAGGING` propagate to all children,
    /// `FOCUSED` to the current child, and `EXPOSED` to visible children;
    /// losing exposure frees the back-buffer.
    pub fn set_state_default(&mut self, id: ViewId, flags: StateFlags, enable: bool) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        node.state.set(flags, enable);
        let owner = node.owner;

        if let Some(owner) = owner {
            if flags.contains(StateFlags::VISIBLE) {
                // Exposure must be in place before the draw below, even when
                // the view's own override is the caller.
                if self.get_state(owner, StateFlags::EXPOSED) {
                    self.set_state_default(id, StateFlags::EXPOSED, enable);
                }
                if enable {
                    self.draw_show(id);
                } else {
                    self.draw_hide(id);
                }
                if self.options(id).contains(Options::SELECTABLE) {
                    self.reset_current(owner);
                }
            }
            if flags.intersects(StateFlags::CURSOR_VIS | StateFlags::CURSOR_INS) {
                self.draw_cursor(id);
            }
            if flags.contains(StateFlags::SHADOW) {
                self.draw_under_view(id, true);
            }
            if flags.contains(StateFlags::FOCUSED) {
                self.reset_cursor(id);
                let command = if enable { RECEIVED_FOCUS } else { RELEASED_FOCUS };
                let mut event =
                    Event::Broadcast(Message::new(command).with_info(Payload::View(id)));
                self.handle_event(owner, &mut event);
            }
        }

        if !self.is_group(id) {
            return;
        }
        let propagate = flags & (StateFlags::ACTIVE | StateFlags::DRAGGING);
        if !propagate.is_empty() {
            self.lock(id);
            for child in self.children_back_to_front(id) {
                self.set_state(child, propagate, enable);
            }
            self.unlock(id);
        }
        if flags.contains(StateFlags::FOCUSED) {
            if let Some(cur) = self.current(id) {
                self.set_state(cur, StateFlags::FOCUSED, enable);
            }
        }
        if flags.contains(StateFlags::EXPOSED) {
            for child in self.children_back_to_front(id) {
                if self.get_state(child, StateFlags::VISIBLE) {
                    self.set_state(child, StateFlags::EXPOSED, enable);
                }
            }
            if !enable {
                self.free_buffer(id);
            }
        }
    }

    /// Make the view visible.
    pub fn show(&mut self, id: ViewId) {
        if !self.get_state(id, StateFlags::VISIBLE) {
            self.set_state(id, StateFlags::VISIBLE, true);
        }
    }

    /// Hide the view.
    pub fn hide(&mut self, id: ViewId) {
        if self.get_state(id, StateFlags::VISIBLE) {
            self.set_state(id, StateFlags::VISIBLE, false);
        }
    }

    /// Show the caret when the view is focused.
    pub fn show_cursor(&mut self, id: ViewId) {
        self.set_state(id, StateFlags::CURSOR_VIS, true);
    }

    /// Hide the caret.
    pub fn hide_cursor(&mut self, id: ViewId) {
        self.set_state(id, StateFlags::CURSOR_VIS, false);
    }

    /// Use a block caret (insert mode).
    pub fn block_cursor(&mut self, id: ViewId) {
        self.set_state(id, StateFlags::CURSOR_INS, true);
    }

    /// Use the device's default caret.
    pub fn normal_cursor(&mut self, id: ViewId) {
        self.set_state(id, StateFlags::CURSOR_INS, false);
    }

    /// Enable or disable a view; disabled views receive no focused or
    /// positional events.
    pub fn set_disabled(&mut self, id: ViewId, disabled: bool) {
        self.set_state(id, StateFlags::DISABLED, disabled);
    }
}
