#![forbid(unsafe_code)]

//! Logging shims.
//!
//! With the `tracing` feature the macros are the `tracing` ones. Without it
//! they expand to nothing, so call sites can stay unconditional:
//!
//! ```ignore
//! crate::trace!(clicks = 2, "double click");
//! ```

#[cfg(feature = "tracing")]
pub use tracing::{debug, trace, warn};

#[cfg(not(feature = "tracing"))]
mod disabled {
    /// Expands to nothing.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {{}};
    }

    /// Expands to nothing.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {{}};
    }

    /// Expands to nothing.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {{}};
    }
}
