#![forbid(unsafe_code)]

//! Generational handles for views stored in an arena.

use core::fmt;

/// Handle to a view slot.
///
/// The generation is bumped every time a slot is freed, so a handle kept
/// after its view was destroyed never resolves to a newer occupant.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId {
    index: u32,
    generation: u32,
}

impl ViewId {
    /// Create a handle from raw parts.
    #[inline]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Arena slot index.
    #[inline]
    pub const fn index(self) -> usize {
        self.index as usize
    }

    /// Slot generation at the time the handle was issued.
    #[inline]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ViewId({}v{})", self.index, self.generation)
    }
}

/// Handle to a timer registered with the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);
