#![forbid(unsafe_code)]

//! Line builder used by views to assemble output before writing it.
//!
//! The `move_*` helpers follow the console convention that a zero attribute
//! or a NUL character means "leave this part of the cell alone", which lets
//! a view recolour text it already placed (or vice versa).

use unicode_width::UnicodeWidthChar;

use crate::cell::{Attr, Cell};

/// A fixed-width row of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawBuffer {
    cells: Vec<Cell>,
}

impl DrawBuffer {
    /// A blank line of `width` cells.
    #[must_use]
    pub fn new(width: usize) -> Self {
        Self {
            cells: vec![Cell::BLANK; width],
        }
    }

    /// Width in cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the line has zero width.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The assembled cells.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Repeat `ch` in `attr` for `count` cells from `indent`.
    pub fn move_char(&mut self, indent: usize, ch: char, attr: Attr, count: usize) {
        for cell in self.cells.iter_mut().skip(indent).take(count) {
            if attr.0 != 0 {
                cell.attr = attr;
            }
            if ch != '\0' {
                cell.ch = ch;
            }
        }
    }

    /// Place `text` from `indent`. Zero-width characters are dropped.
    /// Returns the number of cells written.
    pub fn move_str(&mut self, indent: usize, text: &str, attr: Attr) -> usize {
        let mut col = indent;
        for ch in visible_chars(text) {
            let Some(cell) = self.cells.get_mut(col) else {
                break;
            };
            cell.ch = ch;
            if attr.0 != 0 {
                cell.attr = attr;
            }
            col += 1;
        }
        col.saturating_sub(indent)
    }

    /// Place `text` from `indent`, toggling between `normal` and `highlight`
    /// at every `~`. Used for hot-key labels such as `"~O~K"`.
    pub fn move_cstr(&mut self, indent: usize, text: &str, normal: Attr, highlight: Attr) -> usize {
        let mut col = indent;
        let mut current = normal;
        for ch in visible_chars(text) {
            if ch == '~' {
                current = if current == normal { highlight } else { normal };
                continue;
            }
            let Some(cell) = self.cells.get_mut(col) else {
                break;
            };
            *cell = Cell::new(ch, current);
            col += 1;
        }
        col.saturating_sub(indent)
    }

    /// Copy whole cells from `indent`.
    pub fn move_cells(&mut self, indent: usize, src: &[Cell]) {
        if let Some(dst) = self.cells.get_mut(indent..) {
            let n = dst.len().min(src.len());
            dst[..n].copy_from_slice(&src[..n]);
        }
    }

    /// Recolour one cell.
    pub fn put_attr(&mut self, indent: usize, attr: Attr) {
        if let Some(cell) = self.cells.get_mut(indent) {
            cell.attr = attr;
        }
    }

    /// Replace the character of one cell.
    pub fn put_char(&mut self, indent: usize, ch: char) {
        if let Some(cell) = self.cells.get_mut(indent) {
            cell.ch = ch;
        }
    }
}

/// Display width of `text` in cells, as [`DrawBuffer::move_str`] lays it out.
#[must_use]
pub fn str_width(text: &str) -> usize {
    visible_chars(text).count()
}

/// Display width of a hot-key label, ignoring the `~` markers.
#[must_use]
pub fn cstr_width(text: &str) -> usize {
    visible_chars(text).filter(|c| *c != '~').count()
}

fn visible_chars(text: &str) -> impl Iterator<Item = char> + '_ {
    text.chars().filter(|c| c.width().is_none_or(|w| w > 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(buf: &DrawBuffer) -> String {
        buf.cells().iter().map(|c| c.ch).collect()
    }

    #[test]
    fn move_char_keeps_parts_on_zero() {
        let mut buf = DrawBuffer::new(6);
        buf.move_char(0, '-', Attr(0x1F), 6);
        buf.move_char(2, '\0', Attr(0x4E), 2);
        buf.move_char(4, '=', Attr(0), 9);
        assert_eq!(text(&buf), "----==");
        assert_eq!(buf.cells()[2].attr, Attr(0x4E));
        assert_eq!(buf.cells()[4].attr, Attr(0x1F));
    }

    #[test]
    fn move_str_clips_and_counts() {
        let mut buf = DrawBuffer::new(5);
        assert_eq!(buf.move_str(3, "hello", Attr(0x70)), 2);
        assert_eq!(text(&buf), "   he");
        assert_eq!(buf.move_str(9, "x", Attr(0x70)), 0);
    }

    #[test]
    fn move_str_drops_combining_marks() {
        let mut buf = DrawBuffer::new(4);
        assert_eq!(buf.move_str(0, "e\u{0301}a", Attr::NORMAL), 2);
        assert_eq!(text(&buf), "ea  ");
        assert_eq!(str_width("e\u{0301}a"), 2);
    }

    #[test]
    fn move_cstr_toggles_highlight() {
        let mut buf = DrawBuffer::new(4);
        let n = buf.move_cstr(0, "~O~K", Attr(0x20), Attr(0x2E));
        assert_eq!(n, 2);
        assert_eq!(text(&buf), "OK  ");
        assert_eq!(buf.cells()[0].attr, Attr(0x2E));
        assert_eq!(buf.cells()[1].attr, Attr(0x20));
        assert_eq!(cstr_width("~O~K"), 2);
    }

    #[test]
    fn put_and_move_cells() {
        let mut buf = DrawBuffer::new(3);
        buf.move_cells(1, &[Cell::from_char('a'), Cell::from_char('b'), Cell::from_char('c')]);
        buf.put_char(0, '>');
        buf.put_attr(0, Attr(0x0E));
        assert_eq!(text(&buf), ">ab");
        assert_eq!(buf.cells()[0].attr, Attr(0x0E));
        buf.move_cells(7, &[Cell::from_char('z')]);
    }
}
