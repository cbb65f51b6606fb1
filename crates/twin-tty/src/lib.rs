#![forbid(unsafe_code)]

//! Crossterm backend for twin.
//!
//! Three pieces, usable separately:
//!
//! - [`TerminalSession`]: RAII guard that enters raw mode (and optionally
//!   the alternate screen, mouse capture, bracketed paste) and restores the
//!   terminal on drop, on panic, and on SIGINT/SIGTERM.
//! - [`CrosstermDriver`]: a [`ScreenDriver`](twin_render::ScreenDriver)
//!   that queues cell runs as crossterm commands and writes them on flush.
//! - [`CrosstermEventSource`]: an [`EventSource`](twin_core::EventSource)
//!   that turns crossterm input into raw key, mouse, and resize samples.
//!
//! # Example
//!
//! ```no_run
//! use twin_tty::{CrosstermDriver, CrosstermEventSource, SessionOptions, TerminalSession};
//!
//! let _session = TerminalSession::new(SessionOptions {
//!     alternate_screen: true,
//!     mouse_capture: true,
//!     ..Default::default()
//! })?;
//! let driver = CrosstermDriver::stdout()?;
//! let source = CrosstermEventSource::new(true);
//! # let _ = (driver, source);
//! # Ok::<(), std::io::Error>(())
//! ```

pub mod driver;
pub mod input;
pub mod session;
pub mod source;

pub use driver::CrosstermDriver;
pub use session::{SessionOptions, TerminalSession};
pub use source::{CrosstermEventSource, Waker};
