#![forbid(unsafe_code)]

//! Core types for twin: geometry, view handles, events, command sets, and
//! the mouse gesture recognizer that turns raw device samples into clicks,
//! drags, and auto-repeat.

pub mod command;
pub mod event;
pub mod event_queue;
pub mod geometry;
pub mod handle;
pub mod logging;
pub mod source;

#[cfg(feature = "tracing")]
pub use logging::{debug, trace, warn};

pub use command::{Command, CommandSet};
pub use event::{
    Event, EventMask, KeyCode, KeyEvent, Message, Modifiers, MouseButtons, MouseEvent,
    MouseEventKind, MouseFlags, MouseSample, Payload, RawEvent, Wheel,
};
pub use event_queue::{EventQueue, GestureRecognizer, MouseConfig};
pub use geometry::{Point, Rect};
pub use handle::{TimerId, ViewId};
pub use source::{EventSource, ScriptedSource};
