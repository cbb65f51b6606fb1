#![forbid(unsafe_code)]

//! Log subscriber setup.
//!
//! The screen is the terminal, so logs never go to stdout. [`init`] writes
//! them to a file when `TWIN_LOG_FILE` is set and to stderr otherwise,
//! filtered by `TWIN_LOG` (standard `EnvFilter` syntax, default `warn`).
//!
//! ```bash
//! TWIN_LOG=twin_views=debug TWIN_LOG_FILE=/tmp/twin.log cargo run
//! ```

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Filter directives.
pub const ENV_FILTER: &str = "TWIN_LOG";
/// Log file path.
pub const ENV_FILE: &str = "TWIN_LOG_FILE";

const DEFAULT_DIRECTIVE: &str = "warn";

/// The filter from `TWIN_LOG`, or `warn`.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(ENV_FILTER).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Install the global subscriber.
///
/// # Errors
///
/// Fails if the log file cannot be created or a global subscriber is
/// already installed.
pub fn init() -> io::Result<()> {
    match std::env::var_os(ENV_FILE) {
        Some(path) => init_with_file(Path::new(&path)),
        None => tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr).with_target(true))
            .with(env_filter())
            .try_init()
            .map_err(io::Error::other),
    }
}

/// Install the global subscriber writing to `path` (truncated).
///
/// # Errors
///
/// As for [`init`].
pub fn init_with_file(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .with(env_filter())
        .try_init()
        .map_err(io::Error::other)
}
