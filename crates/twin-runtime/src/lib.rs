#![forbid(unsafe_code)]

//! Runtime for twin.
//!
//! Ties the engine ([`twin_views::Ui`]) to the crossterm backend
//! ([`twin_tty`]) and runs the single event pump of a process.
//!
//! - [`Program`]: root behaviour, desktop, and the pump itself
//! - [`ProgramConfig`]: defaults plus `TWIN_*` environment overrides
//! - [`logging`]: `tracing-subscriber` setup that keeps logs off the screen

pub mod config;
pub mod logging;
pub mod program;

pub use config::ProgramConfig;
pub use program::Program;
