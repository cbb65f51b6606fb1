#![forbid(unsafe_code)]

//! Hardware caret placement.

use twin_core::handle::ViewId;
use twin_render::driver::BLOCK_CURSOR;

use crate::flags::StateFlags;
use crate::ui::Ui;
use crate::writer::Mode;

impl Ui {
    /// Place the screen caret for the view, or hide it.
    ///
    /// The caret shows only when the view is visible, focused, and has
    /// `CURSOR_VIS`, and its cursor cell reaches the screen through every
    /// owner's clip without being covered by a sibling.
    pub fn reset_cursor(&mut self, id: ViewId) {
        let wanted = StateFlags::VISIBLE | StateFlags::CURSOR_VIS | StateFlags::FOCUSED;
        let state = self.state(id);
        if state.contains(wanted) {
            let cursor = self.cursor(id);
            let mut mode = Mode::Locate { hit: None };
            self.walk_row(id, cursor.x, cursor.y, 1, &mut mode);
            if let Mode::Locate { hit: Some(p) } = mode {
                if let (Ok(x), Ok(y)) = (u16::try_from(p.x), u16::try_from(p.y)) {
                    let size = if state.contains(StateFlags::CURSOR_INS) {
                        BLOCK_CURSOR
                    } else {
                        self.driver.cursor_size()
                    };
                    self.driver.set_cursor_position(x, y);
                    self.driver.set_cursor_type(size);
                    return;
                }
            }
        }
        self.driver.set_cursor_type(0);
    }

    /// Update the caret if the view holds the focus.
    pub fn draw_cursor(&mut self, id: ViewId) {
        if self.get_state(id, StateFlags::FOCUSED) {
            self.reset_cursor(id);
        }
    }
}
