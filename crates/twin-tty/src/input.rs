#![forbid(unsafe_code)]

//! Crossterm input to raw samples.
//!
//! Keys map one-to-one. Crossterm reports mouse *transitions*
//! (down/up/drag) while the gesture recogniser wants *samples* (position
//! plus the buttons currently held), so [`MouseTracker`] keeps the held set
//! between reports.

use crossterm::event as ct;
use twin_core::event::{KeyCode, KeyEvent, Modifiers, MouseButtons, MouseSample, RawEvent, Wheel};
use twin_core::geometry::Point;

/// Convert one crossterm event.
///
/// Returns an empty vector for input with no raw counterpart (key
/// releases, focus changes, unsupported keys). A bracketed paste expands
/// into one key per character.
pub fn map_event(event: ct::Event, mouse: &mut MouseTracker) -> Vec<RawEvent> {
    match event {
        ct::Event::Key(key) => map_key_event(key).map(RawEvent::Key).into_iter().collect(),
        ct::Event::Mouse(m) => mouse.sample(m).map(RawEvent::Mouse).into_iter().collect(),
        ct::Event::Resize(cols, rows) => vec![RawEvent::Resize { cols, rows }],
        ct::Event::Paste(text) => paste_keys(&text).map(RawEvent::Key).collect(),
        ct::Event::FocusGained | ct::Event::FocusLost => Vec::new(),
    }
}

/// Convert a key event; releases and unsupported codes yield `None`.
pub fn map_key_event(event: ct::KeyEvent) -> Option<KeyEvent> {
    if event.kind == ct::KeyEventKind::Release {
        return None;
    }
    let code = map_key_code(event.code)?;
    Some(KeyEvent::new(code).with_modifiers(map_modifiers(event.modifiers)))
}

fn map_key_code(code: ct::KeyCode) -> Option<KeyCode> {
    match code {
        ct::KeyCode::Backspace => Some(KeyCode::Backspace),
        ct::KeyCode::Enter => Some(KeyCode::Enter),
        ct::KeyCode::Left => Some(KeyCode::Left),
        ct::KeyCode::Right => Some(KeyCode::Right),
        ct::KeyCode::Up => Some(KeyCode::Up),
        ct::KeyCode::Down => Some(KeyCode::Down),
        ct::KeyCode::Home => Some(KeyCode::Home),
        ct::KeyCode::End => Some(KeyCode::End),
        ct::KeyCode::PageUp => Some(KeyCode::PageUp),
        ct::KeyCode::PageDown => Some(KeyCode::PageDown),
        ct::KeyCode::Tab => Some(KeyCode::Tab),
        ct::KeyCode::BackTab => Some(KeyCode::BackTab),
        ct::KeyCode::Delete => Some(KeyCode::Delete),
        ct::KeyCode::Insert => Some(KeyCode::Insert),
        ct::KeyCode::F(n) => Some(KeyCode::F(n)),
        ct::KeyCode::Char(c) => Some(KeyCode::Char(c)),
        ct::KeyCode::Null => Some(KeyCode::Null),
        ct::KeyCode::Esc => Some(KeyCode::Escape),
        _ => None,
    }
}

/// Convert a modifier set. Super, hyper, and meta all become
/// [`Modifiers::SUPER`].
pub fn map_modifiers(modifiers: ct::KeyModifiers) -> Modifiers {
    let mut mapped = Modifiers::NONE;
    if modifiers.contains(ct::KeyModifiers::SHIFT) {
        mapped |= Modifiers::SHIFT;
    }
    if modifiers.contains(ct::KeyModifiers::ALT) {
        mapped |= Modifiers::ALT;
    }
    if modifiers.contains(ct::KeyModifiers::CONTROL) {
        mapped |= Modifiers::CTRL;
    }
    if modifiers.contains(ct::KeyModifiers::SUPER)
        || modifiers.contains(ct::KeyModifiers::HYPER)
        || modifiers.contains(ct::KeyModifiers::META)
    {
        mapped |= Modifiers::SUPER;
    }
    mapped
}

fn map_button(button: ct::MouseButton) -> MouseButtons {
    match button {
        ct::MouseButton::Left => MouseButtons::LEFT,
        ct::MouseButton::Right => MouseButtons::RIGHT,
        ct::MouseButton::Middle => MouseButtons::MIDDLE,
    }
}

fn paste_keys(text: &str) -> impl Iterator<Item = KeyEvent> + '_ {
    text.chars().filter(|c| *c != '\r').map(|c| match c {
        '\n' => KeyEvent::new(KeyCode::Enter),
        '\t' => KeyEvent::new(KeyCode::Tab),
        c => KeyEvent::new(KeyCode::Char(c)),
    })
}

/// Button state carried between mouse reports.
#[derive(Debug, Clone, Copy, Default)]
pub struct MouseTracker {
    buttons: MouseButtons,
    position: Point,
}

impl MouseTracker {
    /// A tracker with nothing held.
    pub fn new() -> Self {
        Self::default()
    }

    /// Buttons currently held.
    pub fn buttons(&self) -> MouseButtons {
        self.buttons
    }

    /// Forget held buttons (after a suspend, reports may have been lost).
    pub fn reset(&mut self) {
        self.buttons = MouseButtons::empty();
    }

    /// Fold one report into the held set and produce a sample.
    ///
    /// A plain move that neither changes position nor buttons yields `None`.
    pub fn sample(&mut self, event: ct::MouseEvent) -> Option<MouseSample> {
        let position = Point::new(clamp_coord(event.column), clamp_coord(event.row));
        let moved = position != self.position;
        self.position = position;
        let mut wheel = None;
        match event.kind {
            ct::MouseEventKind::Down(b) | ct::MouseEventKind::Drag(b) => {
                self.buttons |= map_button(b);
            }
            ct::MouseEventKind::Up(b) => self.buttons.remove(map_button(b)),
            ct::MouseEventKind::Moved => {
                if !moved {
                    return None;
                }
            }
            ct::MouseEventKind::ScrollUp => wheel = Some(Wheel::Up),
            ct::MouseEventKind::ScrollDown => wheel = Some(Wheel::Down),
            ct::MouseEventKind::ScrollLeft => wheel = Some(Wheel::Left),
            ct::MouseEventKind::ScrollRight => wheel = Some(Wheel::Right),
        }
        let mut sample = MouseSample::new(position, self.buttons);
        sample.modifiers = map_modifiers(event.modifiers);
        if let Some(w) = wheel {
            sample = sample.with_wheel(w);
        }
        Some(sample)
    }
}

fn clamp_coord(v: u16) -> i16 {
    i16::try_from(v).unwrap_or(i16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ct_mouse(kind: ct::MouseEventKind, column: u16, row: u16) -> ct::MouseEvent {
        ct::MouseEvent {
            kind,
            column,
            row,
            modifiers: ct::KeyModifiers::NONE,
        }
    }

    #[test]
    fn escape_and_back_tab_map() {
        let esc = ct::KeyEvent::new(ct::KeyCode::Esc, ct::KeyModifiers::NONE);
        assert_eq!(map_key_event(esc), Some(KeyEvent::new(KeyCode::Escape)));
        let back = ct::KeyEvent::new(ct::KeyCode::BackTab, ct::KeyModifiers::SHIFT);
        let mapped = map_key_event(back).expect("mapped");
        assert_eq!(mapped.code, KeyCode::BackTab);
        assert!(mapped.shift());
    }

    #[test]
    fn key_release_is_dropped() {
        let mut key = ct::KeyEvent::new(ct::KeyCode::Char('a'), ct::KeyModifiers::NONE);
        key.kind = ct::KeyEventKind::Release;
        assert_eq!(map_key_event(key), None);
    }

    #[test]
    fn unsupported_keys_are_dropped() {
        let key = ct::KeyEvent::new(ct::KeyCode::CapsLock, ct::KeyModifiers::NONE);
        assert_eq!(map_key_event(key), None);
    }

    #[test]
    fn modifiers_fold_meta_into_super() {
        let m = map_modifiers(ct::KeyModifiers::CONTROL | ct::KeyModifiers::ALT);
        assert_eq!(m, Modifiers::CTRL | Modifiers::ALT);
        assert_eq!(map_modifiers(ct::KeyModifiers::META), Modifiers::SUPER);
        assert_eq!(map_modifiers(ct::KeyModifiers::HYPER), Modifiers::SUPER);
    }

    #[test]
    fn tracker_holds_buttons_across_drags() {
        let mut t = MouseTracker::new();
        let down = t
            .sample(ct_mouse(ct::MouseEventKind::Down(ct::MouseButton::Left), 3, 4))
            .expect("down");
        assert_eq!(down.position, Point::new(3, 4));
        assert_eq!(down.buttons, MouseButtons::LEFT);

        let drag = t
            .sample(ct_mouse(ct::MouseEventKind::Drag(ct::MouseButton::Left), 5, 4))
            .expect("drag");
        assert_eq!(drag.buttons, MouseButtons::LEFT);

        t.sample(ct_mouse(ct::MouseEventKind::Down(ct::MouseButton::Right), 5, 4));
        assert_eq!(t.buttons(), MouseButtons::LEFT | MouseButtons::RIGHT);

        let up = t
            .sample(ct_mouse(ct::MouseEventKind::Up(ct::MouseButton::Left), 5, 4))
            .expect("up");
        assert_eq!(up.buttons, MouseButtons::RIGHT);
    }

    #[test]
    fn idle_move_to_same_cell_is_dropped() {
        let mut t = MouseTracker::new();
        assert!(t.sample(ct_mouse(ct::MouseEventKind::Moved, 2, 2)).is_some());
        assert!(t.sample(ct_mouse(ct::MouseEventKind::Moved, 2, 2)).is_none());
    }

    #[test]
    fn scroll_becomes_wheel_sample() {
        let mut t = MouseTracker::new();
        let s = t
            .sample(ct_mouse(ct::MouseEventKind::ScrollDown, 1, 1))
            .expect("wheel");
        assert_eq!(s.wheel, Some(Wheel::Down));
        assert!(s.buttons.is_empty());
    }

    #[test]
    fn paste_expands_to_keys() {
        let mut t = MouseTracker::new();
        let events = map_event(ct::Event::Paste("a\r\nb".into()), &mut t);
        assert_eq!(
            events,
            vec![
                RawEvent::Key(KeyEvent::new(KeyCode::Char('a'))),
                RawEvent::Key(KeyEvent::new(KeyCode::Enter)),
                RawEvent::Key(KeyEvent::new(KeyCode::Char('b'))),
            ]
        );
    }

    #[test]
    fn resize_and_focus() {
        let mut t = MouseTracker::new();
        assert_eq!(
            map_event(ct::Event::Resize(100, 40), &mut t),
            vec![RawEvent::Resize { cols: 100, rows: 40 }]
        );
        assert!(map_event(ct::Event::FocusLost, &mut t).is_empty());
    }
}
