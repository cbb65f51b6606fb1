#![forbid(unsafe_code)]

//! View state, option, and grow-mode bits.

use bitflags::bitflags;

bitflags! {
    /// Runtime state of a view. Changed through
    /// [`Ui::set_state`](crate::Ui::set_state), which applies the side
    /// effects (redraws, focus broadcasts, propagation to children).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StateFlags: u16 {
        const VISIBLE     = 0x0001;
        const CURSOR_VIS  = 0x0002;
        const CURSOR_INS  = 0x0004;
        const SHADOW      = 0x0008;
        const ACTIVE      = 0x0010;
        const SELECTED    = 0x0020;
        const FOCUSED     = 0x0040;
        const DRAGGING    = 0x0080;
        const DISABLED    = 0x0100;
        const MODAL       = 0x0200;
        const DEFAULT     = 0x0400;
        const EXPOSED     = 0x0800;
    }
}

impl Default for StateFlags {
    fn default() -> Self {
        StateFlags::VISIBLE
    }
}

bitflags! {
    /// Static behaviour options of a view.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Options: u16 {
        /// Can receive focus.
        const SELECTABLE   = 0x0001;
        /// Selecting brings the view to the front.
        const TOP_SELECT   = 0x0002;
        /// The click that focuses the view is also delivered to it.
        const FIRST_CLICK  = 0x0004;
        const FRAMED       = 0x0008;
        /// Sees focused events before the current child.
        const PRE_PROCESS  = 0x0010;
        /// Sees focused events after the current child.
        const POST_PROCESS = 0x0020;
        /// Groups only: compose children into a private back-buffer.
        const BUFFERED     = 0x0040;
        const TILEABLE     = 0x0080;
        /// Center horizontally in the owner on insertion.
        const CENTER_X     = 0x0100;
        /// Center vertically in the owner on insertion.
        const CENTER_Y     = 0x0200;
        /// Ask [`valid`](crate::ViewBehavior::valid) before focus leaves.
        const VALIDATE     = 0x0400;

        const CENTERED = Self::CENTER_X.bits() | Self::CENTER_Y.bits();
    }
}

bitflags! {
    /// How a view follows its owner's size changes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct GrowMode: u8 {
        /// Left edge keeps its distance to the owner's right edge.
        const LO_X = 0x01;
        /// Top edge keeps its distance to the owner's bottom edge.
        const LO_Y = 0x02;
        /// Right edge keeps its distance to the owner's right edge.
        const HI_X = 0x04;
        /// Bottom edge keeps its distance to the owner's bottom edge.
        const HI_Y = 0x08;
        /// Scale proportionally instead.
        const REL  = 0x10;

        const ALL = Self::LO_X.bits() | Self::LO_Y.bits() | Self::HI_X.bits() | Self::HI_Y.bits();
    }
}

bitflags! {
    /// What [`Ui::drag_view`](crate::Ui::drag_view) changes, and which
    /// edges of the limit rectangle the view may not cross.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DragMode: u8 {
        const MOVE       = 0x01;
        const GROW       = 0x02;
        const LIMIT_LO_X = 0x10;
        const LIMIT_LO_Y = 0x20;
        const LIMIT_HI_X = 0x40;
        const LIMIT_HI_Y = 0x80;

        const LIMIT_ALL = Self::LIMIT_LO_X.bits()
            | Self::LIMIT_LO_Y.bits()
            | Self::LIMIT_HI_X.bits()
            | Self::LIMIT_HI_Y.bits();
    }
}
