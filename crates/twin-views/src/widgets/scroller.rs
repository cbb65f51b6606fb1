#![forbid(unsafe_code)]

use twin_core::command::SCROLLBAR_CHANGED;
use twin_core::event::{Event, EventMask, KeyCode, Message, MouseEventKind, Payload, Wheel};
use twin_core::geometry::{Point, Rect};
use twin_core::handle::ViewId;
use twin_render::draw_buffer::{DrawBuffer, str_width};
use twin_render::palette::Palette;

use crate::behavior::ViewBehavior;
use crate::flags::{GrowMode, Options, StateFlags};
use crate::ui::Ui;

const PALETTE: &[u8] = &[4, 5];

/// Rows moved per wheel notch.
const WHEEL_STEP: i16 = 3;

/// Size of the data record: the delta as two little-endian `i16`s.
pub const SCROLLER_DATA_SIZE: usize = 4;

/// A view onto lines of text larger than itself.
///
/// `delta` is the top-left visible position, kept within
/// `0..=limit - size` on each axis. Arrow keys, Page Up/Down, Home/End and
/// the mouse wheel scroll it; every change is announced to the owner with a
/// [`SCROLLBAR_CHANGED`] broadcast. The data record is the delta.
#[derive(Debug, Clone, Default)]
pub struct Scroller {
    lines: Vec<String>,
    delta: Point,
    limit: Point,
}

impl Scroller {
    #[must_use]
    pub fn new(lines: Vec<String>) -> Self {
        let width = lines.iter().map(|l| str_width(l)).max().unwrap_or(0);
        let limit = Point::new(
            i16::try_from(width).unwrap_or(i16::MAX),
            i16::try_from(lines.len()).unwrap_or(i16::MAX),
        );
        Self {
            lines,
            delta: Point::ZERO,
            limit,
        }
    }

    pub fn create(ui: &mut Ui, bounds: Rect, lines: Vec<String>) -> ViewId {
        let id = ui.add_view(bounds, Self::new(lines));
        ui.set_options(id, Options::SELECTABLE | Options::FIRST_CLICK);
        ui.set_grow_mode(id, GrowMode::HI_X | GrowMode::HI_Y);
        ui.set_event_mask(id, ui.event_mask(id) | EventMask::MOUSE_WHEEL);
        id
    }

    /// Top-left visible position.
    #[must_use]
    pub fn delta(&self) -> Point {
        self.delta
    }

    /// Scrollable extent.
    #[must_use]
    pub fn limit(&self) -> Point {
        self.limit
    }

    fn clamp(&self, p: Point, size: Point) -> Point {
        let max = Point::new((self.limit.x - size.x).max(0), (self.limit.y - size.y).max(0));
        Point::new(p.x.clamp(0, max.x), p.y.clamp(0, max.y))
    }

    /// Scroll to `(x, y)` (clamped). Returns whether the delta changed.
    pub fn scroll_to(&mut self, ui: &mut Ui, id: ViewId, x: i16, y: i16) -> bool {
        let next = self.clamp(Point::new(x, y), ui.size(id));
        if next == self.delta {
            return false;
        }
        self.delta = next;
        if ui.exposed(id) {
            self.draw(ui, id);
        }
        if let Some(owner) = ui.owner(id) {
            ui.message(
                owner,
                Event::Broadcast(Message::new(SCROLLBAR_CHANGED).with_info(Payload::View(id))),
            );
        }
        true
    }

    /// Change the scrollable extent, pulling the delta back inside it.
    pub fn set_limit(&mut self, ui: &mut Ui, id: ViewId, x: i16, y: i16) {
        self.limit = Point::new(x.max(0), y.max(0));
        let d = self.delta;
        if !self.scroll_to(ui, id, d.x, d.y) && ui.exposed(id) {
            self.draw(ui, id);
        }
    }
}

impl ViewBehavior for Scroller {
    fn draw(&mut self, ui: &mut Ui, id: ViewId) {
        let size = ui.size(id);
        if size.x <= 0 || size.y <= 0 {
            return;
        }
        let color = if ui.get_state(id, StateFlags::FOCUSED) {
            ui.map_color(id, 2)
        } else {
            ui.map_color(id, 1)
        };
        let skip = self.delta.x.max(0) as usize;
        for y in 0..size.y {
            let mut line = DrawBuffer::new(size.x as usize);
            line.move_char(0, ' ', color, size.x as usize);
            let index = usize::try_from(self.delta.y + y).unwrap_or(usize::MAX);
            if let Some(text) = self.lines.get(index) {
                let visible: String = text.chars().skip(skip).collect();
                line.move_str(0, &visible, color);
            }
            ui.write_line(id, 0, y, size.x, 1, line.cells());
        }
    }

    fn handle_event(&mut self, ui: &mut Ui, id: ViewId, event: &mut Event) {
        ui.handle_event_default(id, event);
        let size = ui.size(id);
        let d = self.delta;
        let target = match *event {
            Event::Key(key) => match key.code {
                KeyCode::Up => Some(Point::new(d.x, d.y - 1)),
                KeyCode::Down => Some(Point::new(d.x, d.y + 1)),
                KeyCode::Left => Some(Point::new(d.x - 1, d.y)),
                KeyCode::Right => Some(Point::new(d.x + 1, d.y)),
                KeyCode::PageUp => Some(Point::new(d.x, d.y - size.y.max(1))),
                KeyCode::PageDown => Some(Point::new(d.x, d.y + size.y.max(1))),
                KeyCode::Home => Some(Point::ZERO),
                KeyCode::End => Some(Point::new(d.x, self.limit.y)),
                _ => None,
            },
            Event::Mouse(m) if m.kind == MouseEventKind::Wheel => match m.wheel {
                Some(Wheel::Up) => Some(Point::new(d.x, d.y - WHEEL_STEP)),
                Some(Wheel::Down) => Some(Point::new(d.x, d.y + WHEEL_STEP)),
                Some(Wheel::Left) => Some(Point::new(d.x - WHEEL_STEP, d.y)),
                Some(Wheel::Right) => Some(Point::new(d.x + WHEEL_STEP, d.y)),
                None => None,
            },
            _ => None,
        };
        if let Some(p) = target {
            self.scroll_to(ui, id, p.x, p.y);
            ui.clear_event(id, event);
        }
    }

    fn set_state(&mut self, ui: &mut Ui, id: ViewId, flags: StateFlags, enable: bool) {
        ui.set_state_default(id, flags, enable);
        if flags.intersects(StateFlags::FOCUSED | StateFlags::ACTIVE) && ui.exposed(id) {
            self.draw(ui, id);
        }
    }

    fn palette(&self) -> Palette {
        Palette::from_static(PALETTE)
    }

    fn data_size(&self, _ui: &Ui, _id: ViewId) -> usize {
        SCROLLER_DATA_SIZE
    }

    fn get_data(&self, _ui: &Ui, _id: ViewId, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.delta.x.to_le_bytes());
        out.extend_from_slice(&self.delta.y.to_le_bytes());
    }

    fn set_data(&mut self, ui: &mut Ui, id: ViewId, data: &[u8]) -> usize {
        let Some(record) = data.get(..SCROLLER_DATA_SIZE) else {
            return 0;
        };
        let x = i16::from_le_bytes([record[0], record[1]]);
        let y = i16::from_le_bytes([record[2], record[3]]);
        self.scroll_to(ui, id, x, y);
        SCROLLER_DATA_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_follows_content() {
        let s = Scroller::new(vec!["abc".into(), "hello".into()]);
        assert_eq!(s.limit(), Point::new(5, 2));
        assert_eq!(s.delta(), Point::ZERO);
    }

    #[test]
    fn clamp_keeps_view_inside_limit() {
        let s = Scroller::new((0..10).map(|i| format!("line {i}")).collect());
        let size = Point::new(4, 3);
        assert_eq!(s.clamp(Point::new(-2, 50), size), Point::new(0, 7));
        assert_eq!(s.clamp(Point::new(99, 2), size), Point::new(2, 2));
    }
}
