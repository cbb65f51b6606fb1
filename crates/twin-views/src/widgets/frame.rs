#![forbid(unsafe_code)]

use twin_core::command::{CLOSE, ZOOM};
use twin_core::event::{Event, Message, MouseEventKind, Payload};
use twin_core::geometry::{Point, Rect};
use twin_core::handle::ViewId;
use twin_render::draw_buffer::{DrawBuffer, str_width};
use twin_render::palette::Palette;

use super::window::WindowFlags;
use crate::behavior::ViewBehavior;
use crate::flags::{DragMode, GrowMode, StateFlags};
use crate::ui::Ui;

const PALETTE: &[u8] = &[1, 2, 3, 13];

const PASSIVE: [char; 6] = ['┌', '─', '┐', '│', '└', '┘'];
const ACTIVE: [char; 6] = ['╔', '═', '╗', '║', '╚', '╝'];

const CLOSE_ICON: &str = "[■]";
const ZOOM_ICON: &str = "[↑]";

/// The border of a window: title, close and zoom icons, and the handles for
/// moving and resizing its owner with the mouse.
///
/// The style follows the owner: double lines while it is active, single
/// lines otherwise, and the icon colour while it is being dragged.
#[derive(Debug, Clone)]
pub struct Frame {
    title: String,
    flags: WindowFlags,
}

impl Frame {
    #[must_use]
    pub fn new(title: impl Into<String>, flags: WindowFlags) -> Self {
        Self {
            title: title.into(),
            flags,
        }
    }

    /// Create a frame covering `bounds` that follows its owner's size.
    pub fn create(ui: &mut Ui, bounds: Rect, title: impl Into<String>, flags: WindowFlags) -> ViewId {
        let id = ui.add_view(bounds, Self::new(title, flags));
        ui.set_grow_mode(id, GrowMode::HI_X | GrowMode::HI_Y);
        id
    }

    fn close_span() -> (i16, i16) {
        (2, 2 + str_width(CLOSE_ICON) as i16)
    }

    fn zoom_span(width: i16) -> (i16, i16) {
        let w = str_width(ZOOM_ICON) as i16;
        (width - 2 - w, width - 2)
    }
}

impl ViewBehavior for Frame {
    fn draw(&mut self, ui: &mut Ui, id: ViewId) {
        let size = ui.size(id);
        if size.x < 2 || size.y < 2 {
            return;
        }
        let width = size.x as usize;
        let owner_state = ui.owner(id).map_or(StateFlags::empty(), |o| ui.state(o));
        let active = owner_state.contains(StateFlags::ACTIVE);
        let (glyphs, color) = if owner_state.contains(StateFlags::DRAGGING) {
            (PASSIVE, ui.map_color(id, 3))
        } else if active {
            (ACTIVE, ui.map_color(id, 2))
        } else {
            (PASSIVE, ui.map_color(id, 1))
        };
        let icons = ui.map_color(id, 3);
        let interior = ui.map_color(id, 4);
        let [tl, h, tr, v, bl, br] = glyphs;

        let mut top = DrawBuffer::new(width);
        top.move_char(0, h, color, width);
        top.put_char(0, tl);
        top.put_char(width - 1, tr);
        if !self.title.is_empty() && width > 4 {
            let title = format!(" {} ", self.title);
            let tw = str_width(&title).min(width - 2);
            top.move_str((width - tw) / 2, &title, color);
            top.put_char(0, tl);
            top.put_char(width - 1, tr);
        }
        if active && width >= 10 {
            if self.flags.contains(WindowFlags::CLOSE) {
                let (x, _) = Self::close_span();
                top.move_str(x as usize, CLOSE_ICON, icons);
            }
            if self.flags.contains(WindowFlags::ZOOM) {
                let (x, _) = Self::zoom_span(size.x);
                top.move_str(x as usize, ZOOM_ICON, icons);
            }
        }
        ui.write_line(id, 0, 0, size.x, 1, top.cells());

        let mut middle = DrawBuffer::new(width);
        middle.move_char(0, ' ', interior, width);
        middle.move_char(0, v, color, 1);
        middle.move_char(width - 1, v, color, 1);
        ui.write_line(id, 0, 1, size.x, size.y - 2, middle.cells());

        let mut bottom = DrawBuffer::new(width);
        bottom.move_char(0, h, color, width);
        bottom.put_char(0, bl);
        bottom.put_char(width - 1, br);
        if active && self.flags.contains(WindowFlags::GROW) {
            bottom.move_str(width - 2, "◢", icons);
            bottom.put_attr(width - 1, color);
        }
        ui.write_line(id, 0, size.y - 1, size.x, 1, bottom.cells());
    }

    fn handle_event(&mut self, ui: &mut Ui, id: ViewId, event: &mut Event) {
        ui.handle_event_default(id, event);
        let Some(mouse) = event.mouse().copied() else {
            return;
        };
        if mouse.kind != MouseEventKind::Down {
            return;
        }
        let Some(window) = ui.owner(id) else {
            return;
        };
        let size = ui.size(id);
        let p = ui.make_local(id, mouse.position);
        let limits = ui
            .owner(window)
            .map_or_else(|| ui.extent(window), |desk| ui.extent(desk));
        let command = |cmd| Event::Command(Message::new(cmd).with_info(Payload::View(window)));

        if p.y == 0 {
            let (cx1, cx2) = Self::close_span();
            let (zx1, zx2) = Self::zoom_span(size.x);
            if self.flags.contains(WindowFlags::CLOSE) && p.x >= cx1 && p.x < cx2 {
                ui.put_event(command(CLOSE));
            } else if self.flags.contains(WindowFlags::ZOOM)
                && ((p.x >= zx1 && p.x < zx2) || mouse.is_double_click())
            {
                ui.put_event(command(ZOOM));
            } else if self.flags.contains(WindowFlags::MOVE) {
                ui.drag_view(window, event, DragMode::MOVE | DragMode::LIMIT_LO_Y, limits);
            }
            ui.clear_event(id, event);
        } else if self.flags.contains(WindowFlags::GROW) && p == Point::new(size.x - 1, size.y - 1) {
            ui.drag_view(window, event, DragMode::GROW, limits);
            ui.clear_event(id, event);
        }
    }

    fn palette(&self) -> Palette {
        Palette::from_static(PALETTE)
    }
}
