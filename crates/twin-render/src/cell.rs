#![forbid(unsafe_code)]

//! Screen cells.
//!
//! A [`Cell`] is one character position on screen: a `char` plus a colour
//! [`Attr`]. Cells are the only thing copied between a view's draw output,
//! group back-buffers, and the screen driver.

use core::fmt;

/// A colour attribute: foreground in the low nibble, background in the high
/// nibble, using the 16-colour console palette.
///
/// ```
/// use twin_render::cell::Attr;
///
/// let a = Attr::new(0xE, 0x1); // yellow on blue
/// assert_eq!(a.0, 0x1E);
/// assert_eq!(a.fg(), 0xE);
/// assert_eq!(a.bg(), 0x1);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Attr(pub u8);

impl Attr {
    /// Light grey on black.
    pub const NORMAL: Attr = Attr(0x07);

    /// Bright white on red; produced for any palette index that cannot be
    /// resolved.
    pub const ERROR: Attr = Attr(0xCF);

    /// Dark grey on black; replaces the attribute of any cell lying under a
    /// drop shadow.
    pub const SHADOW: Attr = Attr(0x08);

    /// Build from foreground and background colours (each `0..16`).
    #[inline]
    #[must_use]
    pub const fn new(fg: u8, bg: u8) -> Self {
        Attr((fg & 0x0F) | ((bg & 0x0F) << 4))
    }

    /// Foreground colour.
    #[inline]
    #[must_use]
    pub const fn fg(self) -> u8 {
        self.0 & 0x0F
    }

    /// Background colour.
    #[inline]
    #[must_use]
    pub const fn bg(self) -> u8 {
        self.0 >> 4
    }

    /// Replace the foreground colour.
    #[inline]
    #[must_use]
    pub const fn with_fg(self, fg: u8) -> Self {
        Attr::new(fg, self.bg())
    }

    /// Replace the background colour.
    #[inline]
    #[must_use]
    pub const fn with_bg(self, bg: u8) -> Self {
        Attr::new(self.fg(), bg)
    }
}

impl Default for Attr {
    fn default() -> Self {
        Attr::NORMAL
    }
}

impl fmt::Debug for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Attr({:#04x})", self.0)
    }
}

impl From<u8> for Attr {
    fn from(v: u8) -> Self {
        Attr(v)
    }
}

/// One screen cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// The character shown.
    pub ch: char,
    /// Its colour.
    pub attr: Attr,
}

impl Default for Cell {
    fn default() -> Self {
        Self::BLANK
    }
}

impl Cell {
    /// A space in the normal attribute.
    pub const BLANK: Cell = Cell {
        ch: ' ',
        attr: Attr::NORMAL,
    };

    /// Create a cell.
    #[inline]
    #[must_use]
    pub const fn new(ch: char, attr: Attr) -> Self {
        Self { ch, attr }
    }

    /// A cell with the normal attribute.
    #[inline]
    #[must_use]
    pub const fn from_char(ch: char) -> Self {
        Self {
            ch,
            attr: Attr::NORMAL,
        }
    }

    /// Same character, different colour.
    #[inline]
    #[must_use]
    pub const fn with_attr(self, attr: Attr) -> Self {
        Self { ch: self.ch, attr }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attr_nibbles() {
        let a = Attr::new(0x1F, 0x23);
        assert_eq!(a, Attr(0x3F));
        assert_eq!(a.with_fg(2), Attr(0x32));
        assert_eq!(a.with_bg(0), Attr(0x0F));
        assert_eq!(Attr::ERROR.fg(), 0xF);
        assert_eq!(Attr::ERROR.bg(), 0xC);
    }

    #[test]
    fn blank_cell_is_default() {
        assert_eq!(Cell::default(), Cell::new(' ', Attr::NORMAL));
        assert_eq!(
            Cell::from_char('x').with_attr(Attr::SHADOW),
            Cell::new('x', Attr(0x08))
        );
    }
}
