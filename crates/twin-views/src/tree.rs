#![forbid(unsafe_code)]

//! Ownership and z-order.
//!
//! The children of a group form a circular singly-linked list through each
//! view's `next` handle. The group's `last` is the frontmost child and
//! `last.next` the backmost, so following `next` walks back to front.
//! Front-to-back order is obtained by collecting the cycle and reversing.
//!
//! Misuse (inserting a view that already has an owner, removing a view from
//! a group it is not in) is ignored.

use smallvec::SmallVec;
use twin_core::command::RELEASED_FOCUS;
use twin_core::geometry::Point;
use twin_core::handle::ViewId;

use crate::flags::{Options, StateFlags};
use crate::ui::Ui;

/// Inline capacity for sibling lists; most groups have fewer children.
pub(crate) type Siblings = SmallVec<[ViewId; 16]>;

/// How [`Ui::set_current`] treats the selected state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectMode {
    /// Deselect the old current view, select the new one.
    Normal,
    /// Leave the old current view selected (entering a modal view).
    Enter,
    /// Do not select the new current view (leaving a modal view).
    Leave,
}

impl Ui {
    /// Children of `group`, backmost first.
    #[must_use]
    pub fn children_back_to_front(&self, group: ViewId) -> Siblings {
        let mut out = Siblings::new();
        let Some(last) = self.last(group) else {
            return out;
        };
        let mut at = self.next(last);
        while let Some(v) = at {
            out.push(v);
            if v == last {
                break;
            }
            at = self.next(v);
        }
        out
    }

    /// Children of `group`, frontmost first.
    #[must_use]
    pub fn children_front_to_back(&self, group: ViewId) -> Siblings {
        let mut out = self.children_back_to_front(group);
        out.reverse();
        out
    }

    /// Siblings strictly in front of `view`, frontmost first.
    pub(crate) fn siblings_in_front(&self, owner: ViewId, view: ViewId) -> Siblings {
        let mut out = self.children_front_to_back(owner);
        match out.iter().position(|v| *v == view) {
            Some(i) => out.truncate(i),
            None => out.clear(),
        }
        out
    }

    /// Position of `view` among its siblings, counting from the front.
    #[must_use]
    pub fn index_of(&self, group: ViewId, view: ViewId) -> Option<usize> {
        self.children_front_to_back(group)
            .iter()
            .position(|v| *v == view)
    }

    /// The child at `index`, counting from the front.
    #[must_use]
    pub fn at(&self, group: ViewId, index: usize) -> Option<ViewId> {
        self.children_front_to_back(group).get(index).copied()
    }

    /// Frontmost child with all of `state` and all of `options` set.
    #[must_use]
    pub fn first_match(&self, group: ViewId, state: StateFlags, options: Options) -> Option<ViewId> {
        self.children_front_to_back(group)
            .into_iter()
            .find(|v| self.state(*v).contains(state) && self.options(*v).contains(options))
    }

    fn predecessor(&self, view: ViewId) -> Option<ViewId> {
        let mut at = view;
        loop {
            let next = self.next(at)?;
            if next == view {
                return Some(at);
            }
            at = next;
            if at == view {
                return None;
            }
        }
    }

    /// Link `view` into `group`'s cycle directly behind `target`, or at the
    /// front when `target` is `None`. No redraws.
    pub(crate) fn insert_view(&mut self, group: ViewId, view: ViewId, target: Option<ViewId>) {
        if let Some(n) = self.node_mut(view) {
            n.owner = Some(group);
        }
        let target = target.filter(|t| self.owner(*t) == Some(group));
        match (target, self.last(group)) {
            (Some(t), Some(_)) => {
                let Some(pred) = self.predecessor(t) else {
                    return;
                };
                self.set_next(pred, Some(view));
                self.set_next(view, Some(t));
            }
            (_, Some(last)) => {
                let bottom = self.next(last);
                self.set_next(view, bottom);
                self.set_next(last, Some(view));
                if let Some(g) = self.group_mut(group) {
                    g.last = Some(view);
                }
            }
            (_, None) => {
                self.set_next(view, Some(view));
                if let Some(g) = self.group_mut(group) {
                    g.last = Some(view);
                }
            }
        }
    }

    /// Unlink `view` from `group`'s cycle. Owner and `next` are left for the
    /// caller. No redraws.
    pub(crate) fn remove_view(&mut self, group: ViewId, view: ViewId) {
        let Some(pred) = self.predecessor(view) else {
            return;
        };
        let last = self.last(group);
        if pred == view {
            if let Some(g) = self.group_mut(group) {
                g.last = None;
            }
        } else {
            let after = self.next(view);
            self.set_next(pred, after);
            if last == Some(view) {
                if let Some(g) = self.group_mut(group) {
                    g.last = Some(pred);
                }
            }
        }
        if let Some(g) = self.group_mut(group) {
            if g.current == Some(view) {
                g.current = None;
            }
        }
    }

    fn set_next(&mut self, view: ViewId, next: Option<ViewId>) {
        if let Some(n) = self.node_mut(view) {
            n.next = next;
        }
    }

    /// Insert `view` in front of every other child.
    pub fn insert(&mut self, group: ViewId, view: ViewId) {
        self.insert_before(group, view, None);
    }

    /// Insert `view` directly behind `target` (`None`: in front of all).
    ///
    /// Centering options are applied, and the view is shown and activated
    /// again if it was visible or active before.
    pub fn insert_before(&mut self, group: ViewId, view: ViewId, target: Option<ViewId>) {
        if view == group || !self.is_group(group) || !self.contains(view) {
            return;
        }
        if self.owner(view).is_some() {
            tracing::trace!(?view, "insert ignored: view already owned");
            return;
        }
        let group_size = self.size(group);
        if let Some(n) = self.node_mut(view) {
            if n.options.contains(Options::CENTER_X) {
                n.origin.x = (group_size.x - n.size.x) / 2;
            }
            if n.options.contains(Options::CENTER_Y) {
                n.origin.y = (group_size.y - n.size.y) / 2;
            }
        }
        let old_state = self.state(view);
        self.hide(view);
        self.insert_view(group, view, target);
        if old_state.contains(StateFlags::VISIBLE) {
            self.show(view);
        }
        if old_state.contains(StateFlags::ACTIVE) {
            self.set_state(view, StateFlags::ACTIVE, true);
        }
    }

    /// Detach `view` from `group`.
    pub fn remove(&mut self, group: ViewId, view: ViewId) {
        if self.owner(view) != Some(group) {
            tracing::trace!(?view, "remove ignored: not a member");
            return;
        }
        let saved = self.state(view);
        self.hide(view);
        self.remove_view(group, view);
        if let Some(n) = self.node_mut(view) {
            n.owner = None;
            n.next = None;
        }
        if saved.contains(StateFlags::VISIBLE) {
            self.show(view);
        }
    }

    /// Remove a view (if owned) and free it together with its subtree.
    pub fn destroy(&mut self, view: ViewId) {
        if view == self.root() {
            return;
        }
        if let Some(owner) = self.owner(view) {
            self.remove(owner, view);
        }
        self.free_subtree(view);
    }

    fn free_subtree(&mut self, view: ViewId) {
        for child in self.children_back_to_front(view) {
            self.free_subtree(child);
        }
        self.modal_stack.retain(|v| *v != view);
        self.release(view);
    }

    /// Move `view` in front of all its siblings.
    pub fn make_first(&mut self, view: ViewId) {
        let Some(owner) = self.owner(view) else {
            return;
        };
        if self.last(owner) == Some(view) {
            return;
        }
        self.reorder(owner, view, None);
    }

    /// Move `view` directly in front of `target`; `None` sends it to the
    /// back.
    pub fn put_in_front_of(&mut self, view: ViewId, target: Option<ViewId>) {
        let Some(owner) = self.owner(view) else {
            return;
        };
        let behind = match target {
            Some(t) if t == view || self.owner(t) != Some(owner) => return,
            Some(t) => {
                // The slot in front of `t` is behind whatever follows it.
                if self.last(owner) == Some(t) {
                    None
                } else {
                    self.next(t)
                }
            }
            None => self.last(owner).and_then(|l| self.next(l)),
        };
        if behind == Some(view) {
            return;
        }
        self.reorder(owner, view, behind);
    }

    fn reorder(&mut self, owner: ViewId, view: ViewId, behind: Option<ViewId>) {
        let was_current = self.current(owner) == Some(view);
        self.remove_view(owner, view);
        self.insert_view(owner, view, behind);
        if was_current {
            if let Some(g) = self.group_mut(owner) {
                g.current = Some(view);
            }
        }
        if self.get_state(view, StateFlags::VISIBLE) {
            let shadow = self.get_state(view, StateFlags::SHADOW);
            self.draw_under_view(view, shadow);
        }
        if self.options(view).contains(Options::SELECTABLE) {
            self.reset_current(owner);
        }
    }

    /// Make `view` the current child of its owner (bringing it to the front
    /// if it is top-select). Non-selectable views are ignored.
    pub fn select(&mut self, view: ViewId) {
        let opts = self.options(view);
        if !opts.contains(Options::SELECTABLE) {
            return;
        }
        if opts.contains(Options::TOP_SELECT) {
            self.make_first(view);
        } else if let Some(owner) = self.owner(view) {
            self.set_current(owner, Some(view), SelectMode::Normal);
        }
    }

    /// Focus `view` and its owners. Fails if the view losing focus refuses
    /// (see [`Options::VALIDATE`]).
    pub fn focus(&mut self, view: ViewId) -> bool {
        if self
            .state(view)
            .intersects(StateFlags::SELECTED | StateFlags::MODAL)
        {
            return true;
        }
        let Some(owner) = self.owner(view) else {
            return true;
        };
        if !self.focus(owner) {
            return false;
        }
        match self.current(owner) {
            Some(cur) if self.options(cur).contains(Options::VALIDATE) => {
                if !self.valid(cur, RELEASED_FOCUS) {
                    return false;
                }
            }
            _ => {}
        }
        self.select(view);
        true
    }

    /// Change the current child of `group`.
    pub fn set_current(&mut self, group: ViewId, view: Option<ViewId>, mode: SelectMode) {
        let old = self.current(group);
        if old == view {
            return;
        }
        self.lock(group);
        let focused = self.get_state(group, StateFlags::FOCUSED);
        if let Some(old) = old {
            if focused {
                self.set_state(old, StateFlags::FOCUSED, false);
            }
            if mode != SelectMode::Enter {
                self.set_state(old, StateFlags::SELECTED, false);
            }
        }
        if let Some(v) = view {
            if mode != SelectMode::Leave {
                self.set_state(v, StateFlags::SELECTED, true);
            }
            if focused {
                self.set_state(v, StateFlags::FOCUSED, true);
            }
        }
        if let Some(g) = self.group_mut(group) {
            g.current = view;
        }
        self.unlock(group);
    }

    /// Focus the frontmost visible, selectable child.
    pub fn reset_current(&mut self, group: ViewId) {
        let candidate = self.first_match(group, StateFlags::VISIBLE, Options::SELECTABLE);
        self.set_current(group, candidate, SelectMode::Normal);
    }

    /// Select the next (`forwards`: the one behind the current) or previous
    /// visible, enabled, selectable child, wrapping around.
    pub fn select_next(&mut self, group: ViewId, forwards: bool) {
        let order = self.children_front_to_back(group);
        if order.is_empty() {
            return;
        }
        let len = order.len();
        let start = self
            .current(group)
            .and_then(|c| order.iter().position(|v| *v == c))
            .unwrap_or(len - 1);
        for step in 1..=len {
            let i = if forwards {
                (start + step) % len
            } else {
                (start + len - step % len) % len
            };
            let v = order[i];
            let st = self.state(v);
            if st.contains(StateFlags::VISIBLE)
                && !st.contains(StateFlags::DISABLED)
                && self.options(v).contains(Options::SELECTABLE)
            {
                if Some(v) != self.current(group) {
                    self.focus(v);
                }
                return;
            }
        }
    }

    /// Move the view's cursor (view-local) and update the caret.
    pub fn set_cursor(&mut self, view: ViewId, x: i16, y: i16) {
        if let Some(n) = self.node_mut(view) {
            n.cursor = Point::new(x, y);
        }
        self.draw_cursor(view);
    }
}
