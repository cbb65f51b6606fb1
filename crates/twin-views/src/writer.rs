#![forbid(unsafe_code)]

//! The compositor.
//!
//! A view draws by writing runs of cells onto one of its rows. The writer
//! carries each run up the ownership chain, one level at a time:
//!
//! 1. clip the run to the view itself;
//! 2. translate into the owner and clip to the owner's clip rectangle;
//! 3. walk the siblings in front of the view, front to back: an opaque
//!    sibling cuts the run (the pieces left and right of it continue past
//!    it), a drop shadow lets the covered piece through with a shadow count;
//! 4. copy each surviving piece into the owner's back-buffer, if any,
//!    recoloured with [`Attr::SHADOW`] when shadowed;
//! 5. continue with the owner, unless it is locked. At the root the piece
//!    goes to the screen driver.
//!
//! The exposure check and the cursor resolver use the same walk with a
//! different [`Mode`], so "can this cell be seen" has a single definition.

use smallvec::SmallVec;
use twin_core::geometry::{Point, Rect};
use twin_core::handle::ViewId;
use twin_render::cell::{Attr, Cell};
use twin_render::draw_buffer::DrawBuffer;

use crate::flags::StateFlags;
use crate::ui::Ui;

/// Recursion state threaded through a walk.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Scratch {
    /// Row, in the coordinates of the current level.
    pub y: i16,
    /// Column of the run's first cell, in the same coordinates.
    pub base: i16,
    /// Number of shadows the run passed under.
    pub shadow: u8,
}

/// What to do with the pieces that survive occlusion.
pub(crate) enum Mode<'c> {
    /// Copy cells into buffers and onto the screen.
    Write(&'c [Cell]),
    /// Stop at the first piece that lands in a back-buffer or the root.
    Probe { hit: bool },
    /// Follow the piece to the root and record where it lands.
    Locate { hit: Option<Point> },
}

impl Mode<'_> {
    fn done(&self) -> bool {
        match self {
            Mode::Write(_) => false,
            Mode::Probe { hit } => *hit,
            Mode::Locate { hit } => hit.is_some(),
        }
    }
}

/// Columns of row `y` covered by the shadow of a view with bounds `r`.
fn shadow_span(r: Rect, y: i16, shadow: Point) -> Option<(i16, i16)> {
    if y >= r.a.y + shadow.y && y < r.b.y {
        Some((r.b.x, r.b.x + shadow.x))
    } else if y >= r.b.y && y < r.b.y + shadow.y {
        Some((r.a.x + shadow.x, r.b.x + shadow.x))
    } else {
        None
    }
}

impl Ui {
    /// Start a walk for columns `x1..x2` of row `y` of `dest`, clipping to
    /// the view's own extent first.
    pub(crate) fn walk_row(&mut self, dest: ViewId, x: i16, y: i16, count: i16, mode: &mut Mode<'_>) {
        let size = self.size(dest);
        if y < 0 || y >= size.y {
            return;
        }
        let x1 = x.max(0);
        let x2 = x.saturating_add(count).min(size.x);
        if x1 >= x2 {
            return;
        }
        let scratch = Scratch {
            y,
            base: x,
            shadow: 0,
        };
        self.walk_up(dest, x1, x2, scratch, mode);
    }

    /// Carry a piece from `dest`'s coordinates into its owner.
    fn walk_up(&mut self, dest: ViewId, x1: i16, x2: i16, s: Scratch, mode: &mut Mode<'_>) {
        if mode.done() {
            return;
        }
        let Some(node) = self.node(dest) else {
            return;
        };
        if !node.state.contains(StateFlags::VISIBLE) {
            return;
        }
        let origin = node.origin;
        let Some(owner) = node.owner else {
            if dest == self.root() {
                let s = Scratch {
                    y: s.y + origin.y,
                    base: s.base + origin.x,
                    shadow: s.shadow,
                };
                self.reach_screen(x1 + origin.x, x2 + origin.x, s, mode);
            }
            return;
        };
        let s = Scratch {
            y: s.y + origin.y,
            base: s.base + origin.x,
            shadow: s.shadow,
        };
        let clip = self.clip(owner);
        if !clip.contains_row(s.y) {
            return;
        }
        let x1 = (x1 + origin.x).max(clip.a.x);
        let x2 = (x2 + origin.x).min(clip.b.x);
        if x1 >= x2 {
            return;
        }
        let front = self.siblings_in_front(owner, dest);
        self.occlude(owner, &front, 0, x1, x2, s, mode);
    }

    /// Cut the piece by the siblings in `front[start..]`.
    #[allow(clippy::too_many_arguments)]
    fn occlude(
        &mut self,
        owner: ViewId,
        front: &[ViewId],
        start: usize,
        mut x1: i16,
        mut x2: i16,
        mut s: Scratch,
        mode: &mut Mode<'_>,
    ) {
        let shadow_size = self.shadow_size();
        for (i, &sibling) in front.iter().enumerate().skip(start) {
            let Some(node) = self.node(sibling) else {
                continue;
            };
            if !node.state.contains(StateFlags::VISIBLE) {
                continue;
            }
            let r = node.bounds();
            let casts_shadow = node.state.contains(StateFlags::SHADOW);

            if r.contains_row(s.y) && x1 < r.b.x && x2 > r.a.x {
                if x1 < r.a.x {
                    self.occlude(owner, front, i + 1, x1, r.a.x, s, mode);
                }
                if x2 <= r.b.x {
                    return;
                }
                x1 = r.b.x;
            }

            if casts_shadow {
                if let Some((sa, sb)) = shadow_span(r, s.y, shadow_size) {
                    if x1 < sb && x2 > sa {
                        if x1 < sa {
                            self.occlude(owner, front, i + 1, x1, sa, s, mode);
                        }
                        if x2 > sb {
                            self.occlude(owner, front, i + 1, sb, x2, s, mode);
                        }
                        x1 = x1.max(sa);
                        x2 = x2.min(sb);
                        s.shadow = s.shadow.saturating_add(1);
                    }
                }
            }
        }
        self.land_piece(owner, x1, x2, s, mode);
    }

    /// A piece survived the siblings of `owner`'s child.
    fn land_piece(&mut self, owner: ViewId, x1: i16, x2: i16, s: Scratch, mode: &mut Mode<'_>) {
        match mode {
            Mode::Write(cells) => {
                let cells: &[Cell] = *cells;
                let run = shade(segment(cells, s.base, x1, x2), s.shadow);
                if let Some(buf) = self.group_mut(owner).and_then(|g| g.buffer.as_mut()) {
                    if let (Ok(x), Ok(y)) = (u16::try_from(x1), u16::try_from(s.y)) {
                        buf.copy_row_from(x, y, &run);
                    }
                }
                if self.lock_count(owner) == 0 {
                    self.walk_up(owner, x1, x2, s, mode);
                }
            }
            Mode::Probe { .. } if self.has_buffer(owner) => *mode = Mode::Probe { hit: true },
            Mode::Probe { .. } | Mode::Locate { .. } => self.walk_up(owner, x1, x2, s, mode),
        }
    }

    /// A piece reached the root at screen row `s.y`.
    fn reach_screen(&mut self, x1: i16, x2: i16, s: Scratch, mode: &mut Mode<'_>) {
        match mode {
            Mode::Write(cells) => {
                let cells: &[Cell] = *cells;
                let (Ok(x), Ok(y)) = (u16::try_from(x1), u16::try_from(s.y)) else {
                    return;
                };
                let run = shade(segment(cells, s.base, x1, x2), s.shadow);
                self.driver.write_buffer(x, y, run.len() as u16, 1, &run);
            }
            Mode::Probe { hit } => *hit = true,
            Mode::Locate { hit } => *hit = Some(Point::new(x1, s.y)),
        }
    }

    // ── Widget primitives ──────────────────────────────────────────────

    /// Write a `w`×`h` block of cells (row stride `w`) at view-local
    /// `(x, y)`.
    pub fn write_buf(&mut self, id: ViewId, x: i16, y: i16, w: i16, h: i16, cells: &[Cell]) {
        if w <= 0 {
            return;
        }
        for (dy, row) in cells.chunks(w as usize).take(h.max(0) as usize).enumerate() {
            let mut mode = Mode::Write(row);
            self.walk_row(id, x, y + dy as i16, row.len() as i16, &mut mode);
        }
    }

    /// Write the same line of cells on `h` consecutive rows.
    pub fn write_line(&mut self, id: ViewId, x: i16, y: i16, w: i16, h: i16, cells: &[Cell]) {
        let row = &cells[..cells.len().min(w.max(0) as usize)];
        for dy in 0..h.max(0) {
            let mut mode = Mode::Write(row);
            self.walk_row(id, x, y + dy, row.len() as i16, &mut mode);
        }
    }

    /// Write `count` copies of `ch` in palette colour `color`.
    pub fn write_char(&mut self, id: ViewId, x: i16, y: i16, ch: char, color: u8, count: i16) {
        if count <= 0 {
            return;
        }
        let cell = Cell::new(ch, self.map_color(id, color));
        let row: SmallVec<[Cell; 128]> = SmallVec::from_elem(cell, count as usize);
        let mut mode = Mode::Write(&row);
        self.walk_row(id, x, y, count, &mut mode);
    }

    /// Write `text` in palette colour `color`.
    pub fn write_str(&mut self, id: ViewId, x: i16, y: i16, text: &str, color: u8) {
        let width = twin_render::draw_buffer::str_width(text);
        if width == 0 {
            return;
        }
        let mut line = DrawBuffer::new(width);
        line.move_str(0, text, self.map_color(id, color));
        let mut mode = Mode::Write(line.cells());
        self.walk_row(id, x, y, width as i16, &mut mode);
    }
}

fn segment(cells: &[Cell], base: i16, x1: i16, x2: i16) -> &[Cell] {
    let from = usize::try_from(x1 - base).unwrap_or(0).min(cells.len());
    let to = usize::try_from(x2 - base).unwrap_or(0).clamp(from, cells.len());
    &cells[from..to]
}

fn shade(run: &[Cell], shadow: u8) -> SmallVec<[Cell; 128]> {
    if shadow == 0 {
        SmallVec::from_slice(run)
    } else {
        run.iter().map(|c| c.with_attr(Attr::SHADOW)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::shadow_span;
    use twin_core::geometry::{Point, Rect};

    #[test]
    fn shadow_covers_right_then_bottom() {
        let r = Rect::new(2, 1, 6, 4);
        let s = Point::new(2, 1);
        assert_eq!(shadow_span(r, 1, s), None);
        assert_eq!(shadow_span(r, 2, s), Some((6, 8)));
        assert_eq!(shadow_span(r, 3, s), Some((6, 8)));
        assert_eq!(shadow_span(r, 4, s), Some((4, 8)));
        assert_eq!(shadow_span(r, 5, s), None);
    }

    #[test]
    fn zero_shadow_is_empty() {
        let r = Rect::new(0, 0, 3, 3);
        let span = shadow_span(r, 1, Point::ZERO);
        assert_eq!(span, Some((3, 3)));
        let span = shadow_span(r, 3, Point::ZERO);
        assert_eq!(span, None);
    }
}
