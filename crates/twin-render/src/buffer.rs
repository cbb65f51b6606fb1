#![forbid(unsafe_code)]

//! Flat cell storage.
//!
//! A [`CellBuffer`] holds exactly `width * height` cells in row-major order
//! (`index = y * width + x`). It backs both the headless screen and the
//! private back-buffers of buffered groups. Its dimensions never change;
//! a resized group drops its buffer and allocates a new one.

use crate::cell::Cell;

/// A 2D grid of cells.
///
/// ```
/// use twin_render::buffer::CellBuffer;
/// use twin_render::cell::Cell;
///
/// let mut buf = CellBuffer::new(4, 2);
/// buf.set(1, 0, Cell::from_char('A'));
/// assert_eq!(buf.row_text(0), " A  ");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl CellBuffer {
    /// Allocate a blank buffer, returning `None` if memory cannot be
    /// reserved.
    #[must_use]
    pub fn try_new(width: u16, height: u16) -> Option<Self> {
        let len = width as usize * height as usize;
        let mut cells = Vec::new();
        cells.try_reserve_exact(len).ok()?;
        cells.resize(len, Cell::BLANK);
        Some(Self {
            width,
            height,
            cells,
        })
    }

    /// Allocate a blank buffer.
    ///
    /// # Panics
    ///
    /// Aborts like any other `Vec` allocation if memory is exhausted; use
    /// [`try_new`](Self::try_new) where that must be survivable.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; width as usize * height as usize],
        }
    }

    /// Width in cells.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Height in cells.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the buffer has no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    /// The cell at `(x, y)`.
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Mutable access to the cell at `(x, y)`.
    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        self.index(x, y).map(move |i| &mut self.cells[i])
    }

    /// Overwrite the cell at `(x, y)`; out-of-range writes are ignored.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
        }
    }

    /// All cells, row-major.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// One row. Empty if `y` is out of range.
    #[must_use]
    pub fn row(&self, y: u16) -> &[Cell] {
        if y >= self.height {
            return &[];
        }
        let start = y as usize * self.width as usize;
        &self.cells[start..start + self.width as usize]
    }

    /// One row, mutably. Empty if `y` is out of range.
    pub fn row_mut(&mut self, y: u16) -> &mut [Cell] {
        if y >= self.height {
            return &mut [];
        }
        let start = y as usize * self.width as usize;
        let w = self.width as usize;
        &mut self.cells[start..start + w]
    }

    /// Iterate over rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        // `chunks` rejects a zero chunk size.
        self.cells.chunks(self.width.max(1) as usize)
    }

    /// Set every cell.
    pub fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    /// Copy `src` onto row `y` starting at column `x`, clipped to the
    /// buffer. Returns the number of cells copied.
    pub fn copy_row_from(&mut self, x: u16, y: u16, src: &[Cell]) -> usize {
        if x >= self.width || y >= self.height {
            return 0;
        }
        let row = self.row_mut(y);
        let dst = &mut row[x as usize..];
        let n = dst.len().min(src.len());
        dst[..n].copy_from_slice(&src[..n]);
        n
    }

    /// Copy a `w`×`h` block of rows from `src` (row stride `w`) to `(x, y)`.
    pub fn copy_block_from(&mut self, x: u16, y: u16, w: u16, h: u16, src: &[Cell]) {
        if w == 0 {
            return;
        }
        for (dy, line) in src.chunks(w as usize).take(h as usize).enumerate() {
            let Ok(dy) = u16::try_from(dy) else { break };
            self.copy_row_from(x, y.saturating_add(dy), line);
        }
    }

    /// Characters of row `y` as a string (for tests and snapshots).
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        self.row(y).iter().map(|c| c.ch).collect()
    }
}
