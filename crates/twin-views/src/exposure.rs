#![forbid(unsafe_code)]

//! Visibility test shared with the writer.

use twin_core::handle::ViewId;

use crate::flags::StateFlags;
use crate::ui::Ui;
use crate::writer::Mode;

impl Ui {
    /// Whether any cell of the view would land on the screen or in a
    /// buffered ancestor if written now.
    ///
    /// Uses the writer's own walk, so a view is exposed exactly when
    /// writing to it could change something.
    #[must_use]
    pub fn exposed(&mut self, id: ViewId) -> bool {
        let Some(node) = self.node(id) else {
            return false;
        };
        if !node.state.contains(StateFlags::EXPOSED) || node.size.x <= 0 || node.size.y <= 0 {
            return false;
        }
        let size = node.size;
        (0..size.y).any(|y| {
            let mut mode = Mode::Probe { hit: false };
            self.walk_row(id, 0, y, size.x, &mut mode);
            matches!(mode, Mode::Probe { hit: true })
        })
    }
}
