#![forbid(unsafe_code)]

//! Stock views built on the public engine surface.
//!
//! Colours resolve through three palette levels: a widget's palette maps
//! into its window's, and the window's into [`APP_PALETTE`] at the root.
//!
//! | App index | Use |
//! |---|---|
//! | 1 | background |
//! | 2, 3, 4 | frame passive, active, icons |
//! | 5 | window interior |
//! | 6 | static text |
//! | 7..=12 | button normal, default, focused, disabled, shortcut, shadow |
//! | 13, 14 | scroller normal, highlighted |

mod background;
mod button;
mod frame;
mod scroller;
mod static_text;
mod window;

pub use background::Background;
pub use button::{Button, ButtonFlags};
pub use frame::Frame;
pub use scroller::Scroller;
pub use static_text::StaticText;
pub use window::{Window, WindowFlags};

use twin_core::event::KeyEvent;

/// Root palette: final attributes.
pub const APP_PALETTE: &[u8] = &[
    0x71, 0x70, 0x7F, 0x7A, 0x70, 0x70, 0x20, 0x2B, 0x2F, 0x78, 0x2E, 0x70, 0x1E, 0x71,
];

/// The character after the first `~` of a hot-key label.
pub(crate) fn hot_key(label: &str) -> Option<char> {
    let mut chars = label.chars().skip_while(|c| *c != '~');
    chars.next()?;
    chars.next().map(|c| c.to_ascii_lowercase())
}

/// Whether `key` is Alt+`hot`, or plain `hot` when `plain` is allowed.
pub(crate) fn matches_hot_key(key: &KeyEvent, hot: Option<char>, plain: bool) -> bool {
    let Some(hot) = hot else {
        return false;
    };
    let twin_core::event::KeyCode::Char(c) = key.code else {
        return false;
    };
    c.to_ascii_lowercase() == hot && (key.alt() || (plain && !key.ctrl()))
}
