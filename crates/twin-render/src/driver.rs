#![forbid(unsafe_code)]

//! Screen output.
//!
//! The compositor hands finished cell runs to a [`ScreenDriver`]. Nothing
//! below this trait knows about views. [`HeadlessDriver`] keeps the screen
//! in memory and records cursor traffic so tests can assert on the exact
//! output of a frame.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use crate::buffer::CellBuffer;
use crate::cell::Cell;

/// Cursor size in percent that means "block".
pub const BLOCK_CURSOR: u16 = 100;

/// Cursor size used by drivers that cannot query the terminal.
pub const DEFAULT_CURSOR_SIZE: u16 = 20;

/// Destination for composed cells.
pub trait ScreenDriver {
    /// Screen size as `(cols, rows)`.
    fn size(&self) -> (u16, u16);

    /// Blank the whole screen.
    fn clear_screen(&mut self);

    /// Write a `w`×`h` block of `cells` (row stride `w`) at `(x, y)`.
    fn write_buffer(&mut self, x: u16, y: u16, w: u16, h: u16, cells: &[Cell]);

    /// Push pending output to the device.
    fn flush(&mut self) -> io::Result<()>;

    /// Move the hardware caret.
    fn set_cursor_position(&mut self, x: u16, y: u16);

    /// Set the caret size in percent of a cell; `0` hides it.
    fn set_cursor_type(&mut self, size: u16);

    /// The caret size the device starts with.
    fn cursor_size(&self) -> u16 {
        DEFAULT_CURSOR_SIZE
    }

    /// Hand the device back (e.g. before running a shell).
    fn suspend(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Reacquire the device after [`suspend`](Self::suspend).
    fn resume(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<D: ScreenDriver + ?Sized> ScreenDriver for Box<D> {
    fn size(&self) -> (u16, u16) {
        (**self).size()
    }

    fn clear_screen(&mut self) {
        (**self).clear_screen();
    }

    fn write_buffer(&mut self, x: u16, y: u16, w: u16, h: u16, cells: &[Cell]) {
        (**self).write_buffer(x, y, w, h, cells);
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }

    fn set_cursor_position(&mut self, x: u16, y: u16) {
        (**self).set_cursor_position(x, y);
    }

    fn set_cursor_type(&mut self, size: u16) {
        (**self).set_cursor_type(size);
    }

    fn cursor_size(&self) -> u16 {
        (**self).cursor_size()
    }

    fn suspend(&mut self) -> io::Result<()> {
        (**self).suspend()
    }

    fn resume(&mut self) -> io::Result<()> {
        (**self).resume()
    }
}

/// One `write_buffer` call as seen by the headless driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteRecord {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

#[derive(Debug)]
struct HeadlessScreen {
    screen: CellBuffer,
    cursor: (u16, u16),
    cursor_type: u16,
    default_cursor: u16,
    writes: Vec<WriteRecord>,
    flushes: usize,
    suspended: bool,
}

/// In-memory screen.
///
/// Clones share the same screen, so a test can hand one clone to the
/// engine and keep another to inspect what was drawn.
#[derive(Debug, Clone)]
pub struct HeadlessDriver {
    inner: Rc<RefCell<HeadlessScreen>>,
}

impl HeadlessDriver {
    /// A blank `cols`×`rows` screen.
    #[must_use]
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            inner: Rc::new(RefCell::new(HeadlessScreen {
                screen: CellBuffer::new(cols, rows),
                cursor: (0, 0),
                cursor_type: 0,
                default_cursor: DEFAULT_CURSOR_SIZE,
                writes: Vec::new(),
                flushes: 0,
                suspended: false,
            })),
        }
    }

    /// Report a different default caret size.
    #[must_use]
    pub fn with_cursor_size(self, size: u16) -> Self {
        self.inner.borrow_mut().default_cursor = size;
        self
    }

    /// Simulate a terminal resize. The screen is blanked.
    pub fn resize(&self, cols: u16, rows: u16) {
        self.inner.borrow_mut().screen = CellBuffer::new(cols, rows);
    }

    /// Copy of the current screen contents.
    #[must_use]
    pub fn snapshot(&self) -> CellBuffer {
        self.inner.borrow().screen.clone()
    }

    /// Characters of row `y`.
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        self.inner.borrow().screen.row_text(y)
    }

    /// The cell at `(x, y)`.
    #[must_use]
    pub fn cell(&self, x: u16, y: u16) -> Option<Cell> {
        self.inner.borrow().screen.get(x, y).copied()
    }

    /// Caret position.
    #[must_use]
    pub fn cursor_position(&self) -> (u16, u16) {
        self.inner.borrow().cursor
    }

    /// Caret size last set; `0` when hidden.
    #[must_use]
    pub fn cursor_type(&self) -> u16 {
        self.inner.borrow().cursor_type
    }

    /// Writes since the last [`take_writes`](Self::take_writes).
    #[must_use]
    pub fn writes(&self) -> Vec<WriteRecord> {
        self.inner.borrow().writes.clone()
    }

    /// Drain the write log.
    pub fn take_writes(&self) -> Vec<WriteRecord> {
        std::mem::take(&mut self.inner.borrow_mut().writes)
    }

    /// Number of flushes.
    #[must_use]
    pub fn flushes(&self) -> usize {
        self.inner.borrow().flushes
    }

    /// Whether the driver is suspended.
    #[must_use]
    pub fn is_suspended(&self) -> bool {
        self.inner.borrow().suspended
    }
}

impl ScreenDriver for HeadlessDriver {
    fn size(&self) -> (u16, u16) {
        let inner = self.inner.borrow();
        (inner.screen.width(), inner.screen.height())
    }

    fn clear_screen(&mut self) {
        self.inner.borrow_mut().screen.fill(Cell::BLANK);
    }

    fn write_buffer(&mut self, x: u16, y: u16, w: u16, h: u16, cells: &[Cell]) {
        #[cfg(feature = "tracing")]
        tracing::trace!(x, y, w, h, "headless write");
        let mut inner = self.inner.borrow_mut();
        inner.writes.push(WriteRecord { x, y, w, h });
        inner.screen.copy_block_from(x, y, w, h, cells);
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.borrow_mut().flushes += 1;
        Ok(())
    }

    fn set_cursor_position(&mut self, x: u16, y: u16) {
        self.inner.borrow_mut().cursor = (x, y);
    }

    fn set_cursor_type(&mut self, size: u16) {
        self.inner.borrow_mut().cursor_type = size;
    }

    fn cursor_size(&self) -> u16 {
        self.inner.borrow().default_cursor
    }

    fn suspend(&mut self) -> io::Result<()> {
        self.inner.borrow_mut().suspended = true;
        Ok(())
    }

    fn resume(&mut self) -> io::Result<()> {
        self.inner.borrow_mut().suspended = false;
        Ok(())
    }
}
