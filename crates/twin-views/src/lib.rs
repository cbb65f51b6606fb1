#![forbid(unsafe_code)]

//! Views for twin: the view arena and its ownership tree, the compositor
//! that decides which cells each view may write, focus-chain event
//! dispatch, modal execution, and a handful of stock widgets.
//!
//! Everything hangs off one context object, [`Ui`], created over a
//! [`ScreenDriver`](twin_render::ScreenDriver) and an
//! [`EventSource`](twin_core::EventSource). Views are addressed by
//! [`ViewId`](twin_core::ViewId) handles; their behaviour is supplied as a
//! [`ViewBehavior`].

pub mod behavior;
mod bounds;
mod cursor;
mod dispatch;
mod draw;
mod exposure;
pub mod flags;
pub mod modal;
mod state;
pub mod timer;
pub mod tree;
pub mod ui;
pub mod widgets;
mod writer;

pub use behavior::ViewBehavior;
pub use flags::{DragMode, GrowMode, Options, StateFlags};
pub use modal::ModalPhase;
pub use timer::TimerQueue;
pub use tree::SelectMode;
pub use ui::{Phase, Plain, Ui, UiConfig};
