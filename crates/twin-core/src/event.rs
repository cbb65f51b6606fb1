#![forbid(unsafe_code)]

//! Canonical event types.
//!
//! Two layers live here:
//!
//! - [`RawEvent`]: what an [`EventSource`](crate::source::EventSource)
//!   delivers. Mouse input is a *sample* of the device state (position,
//!   held buttons, wheel) rather than a gesture.
//! - [`Event`]: what views receive. Mouse samples are turned into gestures
//!   (down, up, move, auto-repeat, wheel, multi-click) by the
//!   [`EventQueue`](crate::event_queue::EventQueue).
//!
//! # Design Notes
//!
//! - Coordinates are 0-indexed screen cells.
//! - Consuming an event replaces it with [`Event::Nothing`]; dispatch stops
//!   as soon as it sees that sentinel.
//! - Message payloads are opaque to the engine.

use core::any::Any;
use core::fmt;
use std::rc::Rc;

use bitflags::bitflags;

use crate::command::Command;
use crate::geometry::Point;
use crate::handle::ViewId;

/// Event delivered to views.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Event {
    /// Consumed or empty event.
    #[default]
    Nothing,

    /// A key press.
    Key(KeyEvent),

    /// A mouse gesture.
    Mouse(MouseEvent),

    /// A command routed along the focus chain.
    Command(Message),

    /// A message delivered to every child of the receiving group.
    Broadcast(Message),
}

impl Event {
    /// Build a command event.
    #[must_use]
    pub fn command(command: Command) -> Self {
        Event::Command(Message::new(command))
    }

    /// Build a broadcast event.
    #[must_use]
    pub fn broadcast(command: Command) -> Self {
        Event::Broadcast(Message::new(command))
    }

    /// The class bit of this event, used against view event masks.
    #[must_use]
    pub fn mask(&self) -> EventMask {
        match self {
            Event::Nothing => EventMask::empty(),
            Event::Key(_) => EventMask::KEY_DOWN,
            Event::Mouse(m) => m.kind.mask(),
            Event::Command(_) => EventMask::COMMAND,
            Event::Broadcast(_) => EventMask::BROADCAST,
        }
    }

    /// Whether the event has been consumed.
    #[inline]
    #[must_use]
    pub fn is_nothing(&self) -> bool {
        matches!(self, Event::Nothing)
    }

    /// Mark the event consumed.
    #[inline]
    pub fn clear(&mut self) {
        *self = Event::Nothing;
    }

    /// The key event, if any.
    #[must_use]
    pub fn key(&self) -> Option<&KeyEvent> {
        match self {
            Event::Key(k) => Some(k),
            _ => None,
        }
    }

    /// The mouse event, if any.
    #[must_use]
    pub fn mouse(&self) -> Option<&MouseEvent> {
        match self {
            Event::Mouse(m) => Some(m),
            _ => None,
        }
    }

    /// The message of a command or broadcast.
    #[must_use]
    pub fn message(&self) -> Option<&Message> {
        match self {
            Event::Command(m) | Event::Broadcast(m) => Some(m),
            _ => None,
        }
    }

    /// Check for a specific command event.
    #[must_use]
    pub fn is_command(&self, command: Command) -> bool {
        matches!(self, Event::Command(m) if m.command == command)
    }

    /// Check for a specific broadcast event.
    #[must_use]
    pub fn is_broadcast(&self, command: Command) -> bool {
        matches!(self, Event::Broadcast(m) if m.command == command)
    }
}

bitflags! {
    /// Event classes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EventMask: u16 {
        const MOUSE_DOWN  = 0x0001;
        const MOUSE_UP    = 0x0002;
        const MOUSE_MOVE  = 0x0004;
        const MOUSE_AUTO  = 0x0008;
        const MOUSE_WHEEL = 0x0020;
        const KEY_DOWN    = 0x0010;
        const COMMAND     = 0x0100;
        const BROADCAST   = 0x0200;

        /// Any mouse gesture.
        const MOUSE = Self::MOUSE_DOWN.bits()
            | Self::MOUSE_UP.bits()
            | Self::MOUSE_MOVE.bits()
            | Self::MOUSE_AUTO.bits()
            | Self::MOUSE_WHEEL.bits();
        /// Keyboard input.
        const KEYBOARD = Self::KEY_DOWN.bits();
        /// Commands and broadcasts.
        const MESSAGE = Self::COMMAND.bits() | Self::BROADCAST.bits();
        /// Events that follow the focus chain.
        const FOCUSED = Self::KEYBOARD.bits() | Self::COMMAND.bits();
        /// Events routed by screen position.
        const POSITIONAL = Self::MOUSE.bits();
    }
}

impl Default for EventMask {
    fn default() -> Self {
        EventMask::MOUSE_DOWN | EventMask::KEY_DOWN | EventMask::COMMAND
    }
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// The key code that was pressed.
    pub code: KeyCode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a new key event with no modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
        }
    }

    /// Attach modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Check if this is a specific character key.
    #[must_use]
    pub fn is_char(&self, c: char) -> bool {
        matches!(self.code, KeyCode::Char(ch) if ch == c)
    }

    /// Check if Ctrl modifier is held.
    #[must_use]
    pub const fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    /// Check if Alt modifier is held.
    #[must_use]
    pub const fn alt(&self) -> bool {
        self.modifiers.contains(Modifiers::ALT)
    }

    /// Check if Shift modifier is held.
    #[must_use]
    pub const fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }
}

/// Key codes for keyboard events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A regular character key.
    Char(char),
    Enter,
    Escape,
    Backspace,
    Tab,
    /// Shift+Tab.
    BackTab,
    Delete,
    Insert,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
    /// Function key (F1-F24).
    F(u8),
    /// Null character (Ctrl+Space or Ctrl+@).
    Null,
}

bitflags! {
    /// Modifier keys that can be held during an event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

bitflags! {
    /// Mouse buttons held in a sample or gesture.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MouseButtons: u8 {
        const LEFT   = 0b001;
        const RIGHT  = 0b010;
        const MIDDLE = 0b100;
    }
}

bitflags! {
    /// Gesture qualifiers attached to a mouse event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MouseFlags: u8 {
        /// Second press in a rapid sequence at the same spot.
        const DOUBLE_CLICK = 0b001;
        /// Third (or later) press in a rapid sequence.
        const TRIPLE_CLICK = 0b010;
        /// The position changed since the previous sample.
        const MOVED        = 0b100;
    }
}

/// Wheel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wheel {
    Up,
    Down,
    Left,
    Right,
}

/// Kind of mouse gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseEventKind {
    /// A button went down.
    Down,
    /// A button was released.
    Up,
    /// The pointer moved.
    Move,
    /// Synthetic repeat while a button stays held.
    Auto,
    /// Wheel rotation.
    Wheel,
}

impl MouseEventKind {
    /// The mask bit for this kind.
    #[must_use]
    pub const fn mask(self) -> EventMask {
        match self {
            MouseEventKind::Down => EventMask::MOUSE_DOWN,
            MouseEventKind::Up => EventMask::MOUSE_UP,
            MouseEventKind::Move => EventMask::MOUSE_MOVE,
            MouseEventKind::Auto => EventMask::MOUSE_AUTO,
            MouseEventKind::Wheel => EventMask::MOUSE_WHEEL,
        }
    }
}

/// A mouse gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    /// Gesture kind.
    pub kind: MouseEventKind,

    /// Screen position.
    pub position: Point,

    /// Buttons involved: held buttons for down/move/auto, released buttons
    /// for up.
    pub buttons: MouseButtons,

    /// Wheel direction for [`MouseEventKind::Wheel`].
    pub wheel: Option<Wheel>,

    /// Multi-click and movement qualifiers.
    pub flags: MouseFlags,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,
}

impl MouseEvent {
    /// Create a new mouse event.
    #[must_use]
    pub const fn new(kind: MouseEventKind, position: Point, buttons: MouseButtons) -> Self {
        Self {
            kind,
            position,
            buttons,
            wheel: None,
            flags: MouseFlags::empty(),
            modifiers: Modifiers::NONE,
        }
    }

    /// Attach gesture flags.
    #[must_use]
    pub const fn with_flags(mut self, flags: MouseFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Whether this is the second press of a rapid sequence.
    #[must_use]
    pub const fn is_double_click(&self) -> bool {
        self.flags.contains(MouseFlags::DOUBLE_CLICK)
    }

    /// Whether this is the third press of a rapid sequence.
    #[must_use]
    pub const fn is_triple_click(&self) -> bool {
        self.flags.contains(MouseFlags::TRIPLE_CLICK)
    }
}

/// Command or broadcast payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// Command code.
    pub command: Command,
    /// Opaque payload.
    pub info: Payload,
}

impl Message {
    /// A message with no payload.
    #[must_use]
    pub fn new(command: Command) -> Self {
        Self {
            command,
            info: Payload::None,
        }
    }

    /// Attach a payload.
    #[must_use]
    pub fn with_info(mut self, info: Payload) -> Self {
        self.info = info;
        self
    }
}

/// Opaque data carried by a message.
#[derive(Clone, Default)]
pub enum Payload {
    #[default]
    None,
    /// A view handle (the sender, typically).
    View(ViewId),
    /// An integer (timer ids, indices).
    Int(i64),
    /// Anything else.
    Any(Rc<dyn Any>),
}

impl Payload {
    /// The view handle, if the payload is one.
    #[must_use]
    pub fn view(&self) -> Option<ViewId> {
        match self {
            Payload::View(id) => Some(*id),
            _ => None,
        }
    }

    /// The integer, if the payload is one.
    #[must_use]
    pub fn int(&self) -> Option<i64> {
        match self {
            Payload::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Downcast an opaque payload.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Payload::Any(v) => v.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::None => f.write_str("None"),
            Payload::View(id) => f.debug_tuple("View").field(id).finish(),
            Payload::Int(v) => f.debug_tuple("Int").field(v).finish(),
            Payload::Any(_) => f.write_str("Any(..)"),
        }
    }
}

impl PartialEq for Payload {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Payload::None, Payload::None) => true,
            (Payload::View(a), Payload::View(b)) => a == b,
            (Payload::Int(a), Payload::Int(b)) => a == b,
            (Payload::Any(a), Payload::Any(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// A raw device sample of the mouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MouseSample {
    /// Pointer position.
    pub position: Point,
    /// Buttons currently held.
    pub buttons: MouseButtons,
    /// Wheel movement reported with this sample.
    pub wheel: Option<Wheel>,
    /// Modifier keys held.
    pub modifiers: Modifiers,
}

impl MouseSample {
    /// Create a sample with no wheel movement.
    #[must_use]
    pub const fn new(position: Point, buttons: MouseButtons) -> Self {
        Self {
            position,
            buttons,
            wheel: None,
            modifiers: Modifiers::NONE,
        }
    }

    /// Attach wheel movement.
    #[must_use]
    pub const fn with_wheel(mut self, wheel: Wheel) -> Self {
        self.wheel = Some(wheel);
        self
    }
}

/// Input as produced by an event source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawEvent {
    /// A key press.
    Key(KeyEvent),
    /// A mouse sample.
    Mouse(MouseSample),
    /// The screen was resized.
    Resize {
        /// New width in columns.
        cols: u16,
        /// New height in rows.
        rows: u16,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command;

    #[test]
    fn key_event_modifiers() {
        let event = KeyEvent::new(KeyCode::Char('c')).with_modifiers(Modifiers::CTRL);
        assert!(event.ctrl());
        assert!(!event.alt());
        assert!(!event.shift());
        assert!(event.is_char('c'));
    }

    #[test]
    fn clear_turns_event_into_nothing() {
        let mut event = Event::Key(KeyEvent::new(KeyCode::Enter));
        assert!(!event.is_nothing());
        event.clear();
        assert!(event.is_nothing());
        assert_eq!(event.mask(), EventMask::empty());
    }

    #[test]
    fn masks_classify_events() {
        let down = Event::Mouse(MouseEvent::new(
            MouseEventKind::Down,
            Point::ZERO,
            MouseButtons::LEFT,
        ));
        assert_eq!(down.mask(), EventMask::MOUSE_DOWN);
        assert!(EventMask::POSITIONAL.contains(down.mask()));
        assert!(EventMask::FOCUSED.contains(Event::command(command::OK).mask()));
        assert!(!EventMask::FOCUSED.contains(Event::broadcast(command::OK).mask()));
    }

    #[test]
    fn default_mask_matches_plain_views() {
        let mask = EventMask::default();
        assert!(mask.contains(EventMask::MOUSE_DOWN));
        assert!(mask.contains(EventMask::KEY_DOWN));
        assert!(mask.contains(EventMask::COMMAND));
        assert!(!mask.contains(EventMask::BROADCAST));
    }

    #[test]
    fn command_predicates() {
        let event = Event::command(command::CLOSE);
        assert!(event.is_command(command::CLOSE));
        assert!(!event.is_broadcast(command::CLOSE));
        assert_eq!(event.message().map(|m| m.command), Some(command::CLOSE));
    }

    #[test]
    fn payload_equality_and_downcast() {
        let shared: Rc<dyn Any> = Rc::new(42u32);
        let a = Payload::Any(shared.clone());
        let b = Payload::Any(shared);
        assert_eq!(a, b);
        assert_eq!(a.downcast_ref::<u32>(), Some(&42));
        assert_ne!(Payload::Int(1), Payload::Int(2));
        assert_eq!(Payload::Int(7).int(), Some(7));
        assert_eq!(Payload::None.view(), None);
    }
}
