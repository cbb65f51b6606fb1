#![forbid(unsafe_code)]

//! twin public facade crate.
//!
//! Re-exports the types an application needs from the internal crates and
//! offers a prelude for day-to-day use.
//!
//! ```no_run
//! use twin::prelude::*;
//!
//! fn main() -> twin::Result<()> {
//!     let mut program = Program::new(ProgramConfig::from_env())?;
//!     let ui = program.ui_mut();
//!     let root = ui.root();
//!     let window = Window::create(ui, Rect::new(2, 1, 40, 12), "Hello", 1);
//!     ui.insert(root, window);
//!     program.run();
//!     Ok(())
//! }
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use twin_core::command::{self, Command, CommandSet};
pub use twin_core::event::{
    Event, EventMask, KeyCode, KeyEvent, Message, Modifiers, MouseButtons, MouseEvent,
    MouseEventKind, Payload, RawEvent,
};
pub use twin_core::geometry::{Point, Rect};
pub use twin_core::handle::{TimerId, ViewId};
pub use twin_core::source::{EventSource, ScriptedSource};

// --- Render re-exports -----------------------------------------------------

pub use twin_render::{Attr, Cell, CellBuffer, DrawBuffer, HeadlessDriver, Palette, ScreenDriver};

// --- View re-exports -------------------------------------------------------

pub use twin_views::widgets::{Background, Button, Frame, Scroller, StaticText, Window};
pub use twin_views::{GrowMode, Options, Plain, StateFlags, Ui, UiConfig, ViewBehavior};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "runtime")]
pub use twin_runtime::{Program, ProgramConfig};
#[cfg(feature = "runtime")]
pub use twin_tty::{SessionOptions, TerminalSession};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for twin apps.
#[derive(Debug)]
pub enum Error {
    /// I/O failure during terminal operations.
    Io(std::io::Error),
    /// Terminal or runtime error with message.
    Terminal(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "terminal I/O failed: {err}"),
            Self::Terminal(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Terminal(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// Standard result type for twin APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Attr, Background, Button, Command, Error, Event, KeyCode, KeyEvent, Modifiers, Options,
        Point, Rect, Result, StateFlags, Ui, ViewBehavior, ViewId, Window,
    };

    #[cfg(feature = "runtime")]
    pub use crate::{Program, ProgramConfig};

    pub use crate::{command, core, render, views};
}

pub use twin_core as core;
pub use twin_render as render;
pub use twin_views as views;

#[cfg(feature = "runtime")]
pub use twin_runtime as runtime;
#[cfg(feature = "runtime")]
pub use twin_tty as tty;
