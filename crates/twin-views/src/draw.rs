#![forbid(unsafe_code)]

//! Redraw orchestration: exposure-checked drawing, group back-buffers,
//! lock/unlock, and repainting the area under a view.

use twin_core::geometry::Rect;
use twin_core::handle::ViewId;
use twin_render::buffer::CellBuffer;
use twin_render::draw_buffer::DrawBuffer;

use crate::flags::{Options, StateFlags};
use crate::ui::Ui;

impl Ui {
    /// Draw the view if any of it can reach the screen (or a buffered
    /// ancestor), then update the caret. A locked group is skipped; its
    /// final [`unlock`](Self::unlock) draws it.
    pub fn draw_view(&mut self, id: ViewId) {
        if self.lock_count(id) > 0 {
            tracing::trace!(?id, "draw deferred: group locked");
            return;
        }
        if self.exposed(id) {
            self.draw(id);
            self.draw_cursor(id);
        }
    }

    /// Default drawing: a plain view fills its extent with blanks in colour
    /// 1; a group draws its children (through its back-buffer when it has
    /// one).
    pub fn draw_default(&mut self, id: ViewId) {
        if self.is_group(id) {
            self.draw_group(id);
            return;
        }
        let size = self.size(id);
        if size.x <= 0 || size.y <= 0 {
            return;
        }
        let mut line = DrawBuffer::new(size.x as usize);
        line.move_char(0, ' ', self.map_color(id, 1), size.x as usize);
        self.write_line(id, 0, 0, size.x, size.y, line.cells());
    }

    fn draw_group(&mut self, id: ViewId) {
        if !self.has_buffer(id) {
            self.get_buffer(id);
            if self.has_buffer(id) {
                // Compose into the fresh buffer without writing through.
                self.adjust_lock(id, 1);
                self.redraw(id);
                self.adjust_lock(id, -1);
            }
        }
        let buffer = self.group_mut(id).and_then(|g| g.buffer.take());
        match buffer {
            Some(buf) => {
                let size = self.size(id);
                self.write_buf(id, 0, 0, size.x, size.y, buf.cells());
                if let Some(g) = self.group_mut(id) {
                    g.buffer.get_or_insert(buf);
                }
            }
            None => {
                let clip = self.clip_rect(id);
                self.set_clip(id, clip);
                self.redraw(id);
                let extent = self.extent(id);
                self.set_clip(id, extent);
            }
        }
    }

    /// Draw every child, back to front.
    pub fn redraw(&mut self, group: ViewId) {
        for child in self.children_back_to_front(group) {
            self.draw_view(child);
        }
    }

    /// The part of the view inside its owner's clip, in local coordinates.
    #[must_use]
    pub fn clip_rect(&self, id: ViewId) -> Rect {
        let bounds = self.bounds(id);
        let clipped = match self.owner(id) {
            Some(owner) => bounds.intersect(&self.clip(owner)),
            None => bounds,
        };
        let origin = self.origin(id);
        clipped.moved(-origin.x, -origin.y)
    }

    pub(crate) fn set_clip(&mut self, group: ViewId, clip: Rect) {
        let extent = self.extent(group);
        if let Some(g) = self.group_mut(group) {
            g.clip = clip.intersect(&extent);
        }
    }

    /// Allocate the back-buffer of a buffered, exposed group. Allocation
    /// failure leaves the group unbuffered.
    pub(crate) fn get_buffer(&mut self, group: ViewId) {
        let Some(node) = self.node(group) else {
            return;
        };
        let wanted = node.state.contains(StateFlags::EXPOSED)
            && node.options.contains(Options::BUFFERED)
            && node.size.x > 0
            && node.size.y > 0;
        if !wanted || self.has_buffer(group) {
            return;
        }
        let (w, h) = (node.size.x as u16, node.size.y as u16);
        match CellBuffer::try_new(w, h) {
            Some(buf) => {
                if let Some(g) = self.group_mut(group) {
                    g.buffer = Some(buf);
                }
            }
            None => tracing::warn!(?group, w, h, "back-buffer allocation failed; drawing unbuffered"),
        }
    }

    /// Drop a group's back-buffer.
    pub(crate) fn free_buffer(&mut self, group: ViewId) {
        if let Some(g) = self.group_mut(group) {
            g.buffer = None;
        }
    }

    fn adjust_lock(&mut self, group: ViewId, delta: i16) {
        if let Some(g) = self.group_mut(group) {
            g.lock = g.lock.saturating_add_signed(delta);
        }
    }

    /// Defer redraws of `group` until the matching [`unlock`](Self::unlock).
    /// Locks nest.
    pub fn lock(&mut self, group: ViewId) {
        self.adjust_lock(group, 1);
    }

    /// Release one lock; the outermost release draws the group once.
    pub fn unlock(&mut self, group: ViewId) {
        let Some(g) = self.group_mut(group) else {
            return;
        };
        if g.lock == 0 {
            return;
        }
        g.lock -= 1;
        if g.lock == 0 {
            self.draw_view(group);
        }
    }

    pub(crate) fn draw_show(&mut self, id: ViewId) {
        self.draw_view(id);
        if self.get_state(id, StateFlags::SHADOW) {
            self.draw_under_view(id, true);
        }
    }

    pub(crate) fn draw_hide(&mut self, id: ViewId) {
        self.draw_cursor(id);
        let shadow = self.get_state(id, StateFlags::SHADOW);
        self.draw_under_view(id, shadow);
    }

    /// Repaint the owner's children over the view's bounds (plus shadow).
    pub fn draw_under_view(&mut self, id: ViewId, shadow: bool) {
        let mut r = self.bounds(id);
        if shadow {
            let s = self.shadow_size();
            r.b += s;
        }
        if let Some(owner) = self.owner(id) {
            self.draw_under_rect(owner, r);
        }
    }

    /// Repaint the children of `group` restricted to `r` (group-local).
    pub fn draw_under_rect(&mut self, group: ViewId, r: Rect) {
        let saved = self.clip(group);
        self.set_clip(group, r.intersect(&saved));
        self.redraw(group);
        let extent = self.extent(group);
        self.set_clip(group, extent);
    }
}
