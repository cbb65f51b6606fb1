#![forbid(unsafe_code)]

//! Palettes and colour mapping.
//!
//! Views do not name colours directly. A view's palette is a list of
//! 1-based indices into its owner's palette; the root's palette holds the
//! final attributes. Mapping a colour walks from the view to the root,
//! replacing the index at each level whose palette is non-empty.

use std::borrow::Cow;

use crate::cell::Attr;

/// A list of 1-based indices into the owner's palette.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Palette {
    entries: Cow<'static, [u8]>,
}

impl Palette {
    /// An empty palette: indices pass through unchanged.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            entries: Cow::Borrowed(&[]),
        }
    }

    /// A palette backed by static data.
    #[must_use]
    pub const fn from_static(entries: &'static [u8]) -> Self {
        Self {
            entries: Cow::Borrowed(entries),
        }
    }

    /// A palette backed by owned data.
    #[must_use]
    pub fn new(entries: Vec<u8>) -> Self {
        Self {
            entries: Cow::Owned(entries),
        }
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether this palette passes indices through.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a 1-based index.
    #[must_use]
    pub fn get(&self, index: u8) -> Option<u8> {
        let i = usize::from(index).checked_sub(1)?;
        self.entries.get(i).copied()
    }

    /// Raw entries.
    #[inline]
    pub fn entries(&self) -> &[u8] {
        &self.entries
    }
}

/// Resolve `index` through a chain of palettes, innermost first.
///
/// Index `0`, an index past the end of a non-empty palette, or an entry of
/// `0` yields [`Attr::ERROR`].
///
/// ```
/// use twin_render::palette::{map_color, Palette};
/// use twin_render::cell::Attr;
///
/// let button = Palette::from_static(&[2, 1]);
/// let dialog = Palette::from_static(&[5, 6]);
/// let app = Palette::from_static(&[0x70, 0x7F, 0x1E, 0x2F, 0x30, 0x4F]);
/// assert_eq!(map_color(1, [&button, &dialog, &app]), Attr(0x4F));
/// assert_eq!(map_color(3, [&button, &dialog, &app]), Attr::ERROR);
/// ```
pub fn map_color<'a, I>(index: u8, chain: I) -> Attr
where
    I: IntoIterator<Item = &'a Palette>,
{
    if index == 0 {
        return Attr::ERROR;
    }
    let mut color = index;
    for palette in chain {
        if palette.is_empty() {
            continue;
        }
        match palette.get(color) {
            Some(c) if c != 0 => color = c,
            _ => return Attr::ERROR,
        }
    }
    Attr(color)
}
