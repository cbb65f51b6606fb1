#![forbid(unsafe_code)]

use twin_core::geometry::Rect;
use twin_core::handle::ViewId;
use twin_render::draw_buffer::DrawBuffer;
use twin_render::palette::Palette;

use crate::behavior::ViewBehavior;
use crate::flags::GrowMode;
use crate::ui::Ui;

const PALETTE: &[u8] = &[1];

/// Fills its extent with a pattern character.
#[derive(Debug, Clone, Copy)]
pub struct Background {
    pattern: char,
}

impl Background {
    #[must_use]
    pub fn new(pattern: char) -> Self {
        Self { pattern }
    }

    /// Create a background that follows its owner's size.
    pub fn create(ui: &mut Ui, bounds: Rect, pattern: char) -> ViewId {
        let id = ui.add_view(bounds, Self::new(pattern));
        ui.set_grow_mode(id, GrowMode::HI_X | GrowMode::HI_Y);
        id
    }
}

impl ViewBehavior for Background {
    fn draw(&mut self, ui: &mut Ui, id: ViewId) {
        let size = ui.size(id);
        if size.x <= 0 {
            return;
        }
        let mut line = DrawBuffer::new(size.x as usize);
        line.move_char(0, self.pattern, ui.map_color(id, 1), size.x as usize);
        ui.write_line(id, 0, 0, size.x, size.y, line.cells());
    }

    fn palette(&self) -> Palette {
        Palette::from_static(PALETTE)
    }
}
