#![forbid(unsafe_code)]

//! Geometry changes: moving, resizing, following the owner's size, and
//! interactive dragging.

use twin_core::event::{Event, EventMask, MouseEventKind};
use twin_core::geometry::{Point, Rect};
use twin_core::handle::ViewId;

use crate::flags::{DragMode, GrowMode, StateFlags};
use crate::ui::Ui;

impl Ui {
    /// Set the view's bounds without redrawing. A group's clip follows its
    /// new extent, and a back-buffer of the old size is dropped.
    pub fn set_bounds(&mut self, id: ViewId, bounds: Rect) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        let resized = node.size != bounds.size();
        node.origin = bounds.a;
        node.size = bounds.size();
        let extent = node.extent();
        if let Some(g) = node.group.as_mut() {
            g.clip = extent;
            if resized {
                g.buffer = None;
            }
        }
    }

    /// Default bounds change. A plain view is moved and redrawn. A group
    /// whose size changes drops its back-buffer and lays out every child
    /// through [`calc_bounds`](Self::calc_bounds), drawing once at the end.
    pub fn change_bounds_default(&mut self, id: ViewId, bounds: Rect) {
        let old = self.size(id);
        let delta = bounds.size() - old;
        if !self.is_group(id) || delta == Point::ZERO {
            self.set_bounds(id, bounds);
            self.draw_view(id);
            return;
        }
        self.free_buffer(id);
        self.set_bounds(id, bounds);
        self.get_buffer(id);
        self.lock(id);
        for child in self.children_back_to_front(id) {
            let r = self.calc_bounds(child, delta);
            self.change_bounds(child, r);
        }
        self.unlock(id);
    }

    /// New bounds for a view after its owner's size changed by `delta`
    /// (the owner already has its new size), according to the grow mode and
    /// clamped to the view's size limits.
    #[must_use]
    pub fn calc_bounds(&self, id: ViewId, delta: Point) -> Rect {
        let mut r = self.bounds(id);
        let mode = self.grow_mode(id);
        let owner = self.owner(id).map_or(Point::ZERO, |o| self.size(o));
        let rel = mode.contains(GrowMode::REL);
        let grow = |v: &mut i16, s: i16, d: i16| {
            if rel {
                let old = i32::from(s) - i32::from(d);
                if old != 0 {
                    let scaled = (i32::from(*v) * i32::from(s) + old / 2) / old;
                    *v = i16::try_from(scaled).unwrap_or(*v);
                }
            } else {
                *v = v.saturating_add(d);
            }
        };
        if mode.contains(GrowMode::LO_X) {
            grow(&mut r.a.x, owner.x, delta.x);
        }
        if mode.contains(GrowMode::HI_X) {
            grow(&mut r.b.x, owner.x, delta.x);
        }
        if mode.contains(GrowMode::LO_Y) {
            grow(&mut r.a.y, owner.y, delta.y);
        }
        if mode.contains(GrowMode::HI_Y) {
            grow(&mut r.b.y, owner.y, delta.y);
        }
        self.clamp_to_limits(id, r)
    }

    fn clamp_to_limits(&self, id: ViewId, mut r: Rect) -> Rect {
        let (min, max) = self.size_limits(id);
        r.b.x = r.a.x.saturating_add(r.width().clamp(min.x, max.x.max(min.x)));
        r.b.y = r.a.y.saturating_add(r.height().clamp(min.y, max.y.max(min.y)));
        r
    }

    /// Move and resize the view (within its size limits), repainting the
    /// area it uncovers.
    pub fn locate(&mut self, id: ViewId, bounds: Rect) {
        let bounds = self.clamp_to_limits(id, bounds);
        let old = self.bounds(id);
        if bounds == old {
            return;
        }
        self.change_bounds(id, bounds);
        let Some(owner) = self.owner(id) else {
            return;
        };
        if self.get_state(id, StateFlags::VISIBLE) {
            let mut r = old;
            if self.get_state(id, StateFlags::SHADOW) {
                r = r.union(&bounds);
                r.b += self.shadow_size();
            }
            self.draw_under_rect(owner, r);
        }
    }

    /// Resize, keeping the origin.
    pub fn grow_to(&mut self, id: ViewId, width: i16, height: i16) {
        let a = self.origin(id);
        self.locate(id, Rect::new(a.x, a.y, a.x + width, a.y + height));
    }

    /// Move, keeping the size.
    pub fn move_to(&mut self, id: ViewId, x: i16, y: i16) {
        let s = self.size(id);
        self.locate(id, Rect::new(x, y, x + s.x, y + s.y));
    }

    /// Follow the mouse from the mouse-down in `event` until the button is
    /// released, moving or resizing the view inside `limits` (owner
    /// coordinates).
    pub fn drag_view(&mut self, id: ViewId, event: &mut Event, mode: DragMode, limits: Rect) {
        let Some(down) = event.mouse().copied() else {
            return;
        };
        if down.kind != MouseEventKind::Down {
            return;
        }
        self.set_state(id, StateFlags::DRAGGING, true);
        tracing::trace!(?id, ?mode, "drag started");
        let moving = mode.contains(DragMode::MOVE);
        let anchor = if moving {
            self.origin(id) - down.position
        } else {
            self.size(id) - down.position
        };
        let mut position = down.position;
        loop {
            let p = position + anchor;
            if moving {
                let size = self.size(id);
                self.move_grow(id, p, size, limits, mode);
            } else {
                let origin = self.origin(id);
                self.move_grow(id, origin, p, limits, mode);
            }
            if !self.mouse_event(event, EventMask::MOUSE_MOVE) {
                break;
            }
            if let Some(m) = event.mouse() {
                position = m.position;
            }
        }
        self.set_state(id, StateFlags::DRAGGING, false);
        tracing::trace!(?id, "drag finished");
    }

    fn move_grow(&mut self, id: ViewId, p: Point, s: Point, limits: Rect, mode: DragMode) {
        let (min, max) = self.size_limits(id);
        let s = Point::new(s.x.clamp(min.x, max.x.max(min.x)), s.y.clamp(min.y, max.y.max(min.y)));
        let mut p = Point::new(
            p.x.max(limits.a.x - s.x + 1).min(limits.b.x - 1),
            p.y.max(limits.a.y - s.y + 1).min(limits.b.y - 1),
        );
        if mode.contains(DragMode::LIMIT_LO_X) {
            p.x = p.x.max(limits.a.x);
        }
        if mode.contains(DragMode::LIMIT_LO_Y) {
            p.y = p.y.max(limits.a.y);
        }
        if mode.contains(DragMode::LIMIT_HI_X) {
            p.x = p.x.min(limits.b.x - s.x);
        }
        if mode.contains(DragMode::LIMIT_HI_Y) {
            p.y = p.y.min(limits.b.y - s.y);
        }
        self.locate(id, Rect::from_origin_size(p, s));
    }
}
