#![forbid(unsafe_code)]

//! Screen driver over crossterm.
//!
//! Cell runs are queued as crossterm commands and reach the terminal on
//! [`flush`](ScreenDriver::flush). Colour changes are emitted only when the
//! attribute differs from the previous cell's. Queueing errors are parked
//! and reported by the next flush, since `write_buffer` itself cannot fail.

use std::io::{self, Stdout, Write};

use crossterm::style::{Color, Colors, Print, SetColors};
use crossterm::{cursor, queue, terminal};
use twin_render::cell::{Attr, Cell};
use twin_render::driver::{BLOCK_CURSOR, DEFAULT_CURSOR_SIZE, ScreenDriver};

/// The 16-colour console palette, by index.
const CONSOLE_COLORS: [Color; 16] = [
    Color::Black,
    Color::DarkBlue,
    Color::DarkGreen,
    Color::DarkCyan,
    Color::DarkRed,
    Color::DarkMagenta,
    Color::DarkYellow,
    Color::Grey,
    Color::DarkGrey,
    Color::Blue,
    Color::Green,
    Color::Cyan,
    Color::Red,
    Color::Magenta,
    Color::Yellow,
    Color::White,
];

/// Crossterm colours for an attribute as `(foreground, background)`.
pub fn attr_colors(attr: Attr) -> (Color, Color) {
    (
        CONSOLE_COLORS[usize::from(attr.fg() & 0x0F)],
        CONSOLE_COLORS[usize::from(attr.bg() & 0x0F)],
    )
}

/// A [`ScreenDriver`] writing to a terminal through crossterm.
pub struct CrosstermDriver<W: Write = Stdout> {
    out: W,
    size: (u16, u16),
    query_size: bool,
    alternate_screen: bool,
    last_attr: Option<Attr>,
    cursor_size: u16,
    error: Option<io::Error>,
}

impl CrosstermDriver<Stdout> {
    /// A driver on stdout, sized from the terminal. Assumes the alternate
    /// screen is in use (see [`with_alternate_screen`](Self::with_alternate_screen)).
    pub fn stdout() -> io::Result<Self> {
        let size = terminal::size()?;
        let mut driver = Self::with_writer(io::stdout(), size.0, size.1);
        driver.query_size = true;
        driver.alternate_screen = true;
        Ok(driver)
    }
}

impl<W: Write> CrosstermDriver<W> {
    /// A driver on an arbitrary writer with a fixed size.
    pub fn with_writer(out: W, cols: u16, rows: u16) -> Self {
        Self {
            out,
            size: (cols, rows),
            query_size: false,
            alternate_screen: false,
            last_attr: None,
            cursor_size: DEFAULT_CURSOR_SIZE,
            error: None,
        }
    }

    /// Whether suspend/resume should leave and re-enter the alternate
    /// screen.
    #[must_use]
    pub fn with_alternate_screen(mut self, enabled: bool) -> Self {
        self.alternate_screen = enabled;
        self
    }

    /// Record a new screen size (after a resize report).
    pub fn set_size(&mut self, cols: u16, rows: u16) {
        self.size = (cols, rows);
    }

    /// The underlying writer.
    pub fn writer(&self) -> &W {
        &self.out
    }

    fn park(&mut self, result: io::Result<()>) {
        if let Err(err) = result {
            self.error.get_or_insert(err);
        }
    }

    fn queue_run(&mut self, x: u16, y: u16, cells: &[Cell]) -> io::Result<()> {
        queue!(self.out, cursor::MoveTo(x, y))?;
        for cell in cells {
            if self.last_attr != Some(cell.attr) {
                let (fg, bg) = attr_colors(cell.attr);
                queue!(self.out, SetColors(Colors::new(fg, bg)))?;
                self.last_attr = Some(cell.attr);
            }
            queue!(self.out, Print(cell.ch))?;
        }
        Ok(())
    }
}

impl<W: Write> ScreenDriver for CrosstermDriver<W> {
    fn size(&self) -> (u16, u16) {
        if self.query_size {
            terminal::size().unwrap_or(self.size)
        } else {
            self.size
        }
    }

    fn clear_screen(&mut self) {
        self.last_attr = None;
        let result = queue!(
            self.out,
            crossterm::style::ResetColor,
            terminal::Clear(terminal::ClearType::All)
        );
        self.park(result);
    }

    fn write_buffer(&mut self, x: u16, y: u16, w: u16, h: u16, cells: &[Cell]) {
        let stride = usize::from(w);
        if stride == 0 {
            return;
        }
        for (row, run) in cells.chunks(stride).take(usize::from(h)).enumerate() {
            let Ok(dy) = u16::try_from(row) else { break };
            let result = self.queue_run(x, y.saturating_add(dy), run);
            self.park(result);
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.out.flush()
    }

    fn set_cursor_position(&mut self, x: u16, y: u16) {
        let result = queue!(self.out, cursor::MoveTo(x, y));
        self.park(result);
    }

    fn set_cursor_type(&mut self, size: u16) {
        let result = if size == 0 {
            queue!(self.out, cursor::Hide)
        } else if size >= BLOCK_CURSOR {
            queue!(self.out, cursor::SetCursorStyle::SteadyBlock, cursor::Show)
        } else {
            queue!(self.out, cursor::SetCursorStyle::DefaultUserShape, cursor::Show)
        };
        self.park(result);
    }

    fn cursor_size(&self) -> u16 {
        self.cursor_size
    }

    fn suspend(&mut self) -> io::Result<()> {
        queue!(self.out, crossterm::style::ResetColor, cursor::Show)?;
        if self.alternate_screen {
            queue!(self.out, terminal::LeaveAlternateScreen)?;
        }
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        tracing::debug!("screen suspended");
        Ok(())
    }

    fn resume(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        if self.alternate_screen {
            queue!(self.out, terminal::EnterAlternateScreen)?;
        }
        self.last_attr = None;
        queue!(self.out, terminal::Clear(terminal::ClearType::All))?;
        self.out.flush()?;
        tracing::debug!("screen resumed");
        Ok(())
    }
}

impl<W: Write> std::fmt::Debug for CrosstermDriver<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrosstermDriver")
            .field("size", &self.size)
            .field("alternate_screen", &self.alternate_screen)
            .finish_non_exhaustive()
    }
}
