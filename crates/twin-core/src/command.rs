#![forbid(unsafe_code)]

//! Command codes and the enabled-command set.
//!
//! Commands are small integers carried by [`Event::Command`] and
//! [`Event::Broadcast`](crate::event::Event::Broadcast). Codes `0..=255` can
//! be disabled through a [`CommandSet`]; anything above is always enabled.
//!
//! [`Event::Command`]: crate::event::Event::Command

use core::fmt;
use core::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign};

/// A command code.
pub type Command = u16;

pub const VALID: Command = 0;
pub const QUIT: Command = 1;
pub const ERROR: Command = 2;
pub const MENU: Command = 3;
pub const CLOSE: Command = 4;
pub const ZOOM: Command = 5;
pub const RESIZE: Command = 6;
pub const NEXT: Command = 7;
pub const PREV: Command = 8;
pub const HELP: Command = 9;

// Dialog end codes.
pub const OK: Command = 10;
pub const CANCEL: Command = 11;
pub const YES: Command = 12;
pub const NO: Command = 13;
pub const DEFAULT: Command = 14;

pub const CUT: Command = 20;
pub const COPY: Command = 21;
pub const PASTE: Command = 22;
pub const UNDO: Command = 23;
pub const CLEAR: Command = 24;
pub const TILE: Command = 25;
pub const CASCADE: Command = 26;

// Broadcasts.
pub const RECEIVED_FOCUS: Command = 50;
pub const RELEASED_FOCUS: Command = 51;
pub const COMMAND_SET_CHANGED: Command = 52;
pub const SCROLLBAR_CHANGED: Command = 53;
pub const SCROLLBAR_CLICKED: Command = 54;
pub const SELECT_WINDOW_NUM: Command = 55;
pub const LIST_ITEM_SELECTED: Command = 56;
pub const SCREEN_CHANGED: Command = 57;
pub const TIMER_EXPIRED: Command = 58;
pub const GRAB_DEFAULT: Command = 61;
pub const RELEASE_DEFAULT: Command = 62;

/// First code free for applications.
pub const USER: Command = 100;

const WORDS: usize = 8;

/// Set of enabled commands.
///
/// Only codes `0..=255` are tracked; [`has`](Self::has) reports every code
/// above that range as enabled and enabling or disabling one is ignored.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CommandSet {
    bits: [u32; WORDS],
}

impl CommandSet {
    /// No command enabled.
    #[must_use]
    pub const fn empty() -> Self {
        Self { bits: [0; WORDS] }
    }

    /// Every command enabled.
    #[must_use]
    pub const fn full() -> Self {
        Self {
            bits: [u32::MAX; WORDS],
        }
    }

    /// The set a fresh application starts with: everything except the
    /// window-management commands, which windows enable when they gain
    /// focus.
    #[must_use]
    pub fn initial() -> Self {
        let mut set = Self::full();
        for cmd in [ZOOM, CLOSE, RESIZE, NEXT, PREV] {
            set.disable_cmd(cmd);
        }
        set
    }

    #[inline]
    const fn locate(cmd: Command) -> Option<(usize, u32)> {
        if cmd > 255 {
            None
        } else {
            Some(((cmd / 32) as usize, 1 << (cmd % 32)))
        }
    }

    /// Whether `cmd` is enabled.
    #[must_use]
    pub const fn has(&self, cmd: Command) -> bool {
        match Self::locate(cmd) {
            Some((word, mask)) => self.bits[word] & mask != 0,
            None => true,
        }
    }

    /// Enable one command.
    pub fn enable_cmd(&mut self, cmd: Command) {
        if let Some((word, mask)) = Self::locate(cmd) {
            self.bits[word] |= mask;
        }
    }

    /// Disable one command.
    pub fn disable_cmd(&mut self, cmd: Command) {
        if let Some((word, mask)) = Self::locate(cmd) {
            self.bits[word] &= !mask;
        }
    }

    /// Enable every command in `other`.
    pub fn enable(&mut self, other: &CommandSet) {
        *self |= *other;
    }

    /// Disable every command in `other`.
    pub fn disable(&mut self, other: &CommandSet) {
        for (dst, src) in self.bits.iter_mut().zip(other.bits) {
            *dst &= !src;
        }
    }

    /// Whether no tracked command is enabled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|w| *w == 0)
    }

    /// Tracked commands that are enabled, in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Command> + '_ {
        (0..=255u16).filter(|cmd| self.has(*cmd))
    }
}

impl FromIterator<Command> for CommandSet {
    fn from_iter<I: IntoIterator<Item = Command>>(iter: I) -> Self {
        let mut set = CommandSet::empty();
        for cmd in iter {
            set.enable_cmd(cmd);
        }
        set
    }
}

impl BitOr for CommandSet {
    type Output = CommandSet;

    fn bitor(mut self, rhs: CommandSet) -> CommandSet {
        self |= rhs;
        self
    }
}

impl BitOrAssign for CommandSet {
    fn bitor_assign(&mut self, rhs: CommandSet) {
        for (dst, src) in self.bits.iter_mut().zip(rhs.bits) {
            *dst |= src;
        }
    }
}

impl BitAnd for CommandSet {
    type Output = CommandSet;

    fn bitand(mut self, rhs: CommandSet) -> CommandSet {
        self &= rhs;
        self
    }
}

impl BitAndAssign for CommandSet {
    fn bitand_assign(&mut self, rhs: CommandSet) {
        for (dst, src) in self.bits.iter_mut().zip(rhs.bits) {
            *dst &= src;
        }
    }
}

impl fmt::Debug for CommandSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_above_range_are_always_enabled() {
        let mut set = CommandSet::empty();
        assert!(set.has(256));
        assert!(set.has(u16::MAX));
        set.disable_cmd(300);
        assert!(set.has(300));
        assert!(set.is_empty());
    }

    #[test]
    fn enable_and_disable_single_commands() {
        let mut set = CommandSet::empty();
        set.enable_cmd(OK);
        set.enable_cmd(255);
        assert!(set.has(OK));
        assert!(set.has(255));
        assert!(!set.has(CANCEL));
        set.disable_cmd(OK);
        assert!(!set.has(OK));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![255]);
    }

    #[test]
    fn set_wise_operations() {
        let window: CommandSet = [CLOSE, ZOOM, NEXT].into_iter().collect();
        let mut set = CommandSet::empty();
        set.enable(&window);
        assert_eq!(set, window);
        set.disable(&[ZOOM].into_iter().collect());
        assert!(set.has(CLOSE));
        assert!(!set.has(ZOOM));

        let other: CommandSet = [CLOSE, OK].into_iter().collect();
        assert_eq!((set & other).iter().collect::<Vec<_>>(), vec![CLOSE]);
        assert_eq!(
            (set | other).iter().collect::<Vec<_>>(),
            vec![CLOSE, NEXT, OK]
        );
    }

    #[test]
    fn initial_set_disables_window_commands() {
        let set = CommandSet::initial();
        for cmd in [ZOOM, CLOSE, RESIZE, NEXT, PREV] {
            assert!(!set.has(cmd), "{cmd} should start disabled");
        }
        assert!(set.has(QUIT));
        assert!(set.has(OK));
    }
}
