#![forbid(unsafe_code)]

use bitflags::bitflags;
use twin_core::command::{
    CANCEL, CLOSE, CommandSet, DEFAULT, NEXT, NO, OK, PREV, RESIZE, SELECT_WINDOW_NUM,
    YES, ZOOM,
};
use twin_core::event::{Event, KeyCode, Message, Payload};
use twin_core::geometry::{Point, Rect};
use twin_core::handle::ViewId;
use twin_render::palette::Palette;

use super::frame::Frame;
use crate::behavior::ViewBehavior;
use crate::flags::{GrowMode, Options, StateFlags};
use crate::ui::Ui;

const PALETTE: &[u8] = &[2, 3, 4, 13, 14, 6, 7, 8, 9, 10, 11, 12, 5];

/// Smallest size a window can be dragged or zoomed to.
pub const MIN_WINDOW_SIZE: Point = Point::new(16, 6);

bitflags! {
    /// Window capabilities.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct WindowFlags: u8 {
        const MOVE  = 0x01;
        const GROW  = 0x02;
        const CLOSE = 0x04;
        const ZOOM  = 0x08;

        const ALL = Self::MOVE.bits() | Self::GROW.bits() | Self::CLOSE.bits() | Self::ZOOM.bits();
    }
}

/// A framed, selectable group with a drop shadow.
///
/// Selecting a window activates it and enables the window commands
/// (next/previous, plus close, zoom and resize as its flags allow). Tab and
/// Shift+Tab cycle the focus among its children.
///
/// In dialog mode Escape requests [`CANCEL`], Enter broadcasts
/// [`DEFAULT`] to the default button, and [`OK`], [`CANCEL`], [`YES`] and
/// [`NO`] end the modal loop running the dialog.
#[derive(Debug, Clone)]
pub struct Window {
    flags: WindowFlags,
    number: u16,
    dialog: bool,
    zoom_rect: Rect,
}

impl Window {
    /// Create a window with a frame titled `title`. A non-zero `number`
    /// lets [`SELECT_WINDOW_NUM`] broadcasts select it.
    pub fn create(ui: &mut Ui, bounds: Rect, title: &str, number: u16) -> ViewId {
        Self::build(ui, bounds, title, number, WindowFlags::ALL, false)
    }

    /// Create a dialog: movable and closable, meant for
    /// [`exec_view`](Ui::exec_view).
    pub fn dialog(ui: &mut Ui, bounds: Rect, title: &str) -> ViewId {
        Self::build(ui, bounds, title, 0, WindowFlags::MOVE | WindowFlags::CLOSE, true)
    }

    fn build(ui: &mut Ui, bounds: Rect, title: &str, number: u16, flags: WindowFlags, dialog: bool) -> ViewId {
        let window = Self {
            flags,
            number,
            dialog,
            zoom_rect: bounds,
        };
        let id = ui.add_group(bounds, window);
        ui.set_options(id, Options::SELECTABLE | Options::TOP_SELECT);
        if !dialog {
            ui.set_grow_mode(id, GrowMode::ALL | GrowMode::REL);
        }
        ui.set_state(id, StateFlags::SHADOW, true);
        let extent = ui.extent(id);
        let frame = Frame::create(ui, extent, title, flags);
        ui.insert(id, frame);
        id
    }

    fn commands(&self) -> CommandSet {
        let mut set: CommandSet = [NEXT, PREV].into_iter().collect();
        if self.flags.intersects(WindowFlags::GROW | WindowFlags::MOVE) {
            set.enable_cmd(RESIZE);
        }
        if self.flags.contains(WindowFlags::CLOSE) {
            set.enable_cmd(CLOSE);
        }
        if self.flags.contains(WindowFlags::ZOOM) {
            set.enable_cmd(ZOOM);
        }
        set
    }

    fn close(&mut self, ui: &mut Ui, id: ViewId) {
        if ui.get_state(id, StateFlags::MODAL) {
            ui.put_event(Event::command(CANCEL));
        } else if ui.valid(id, CLOSE) {
            tracing::trace!(?id, "window closed");
            ui.destroy(id);
        }
    }

    fn zoom(&mut self, ui: &mut Ui, id: ViewId) {
        let (_, max) = ui.size_limits(id);
        if ui.size(id) != max {
            self.zoom_rect = ui.bounds(id);
            ui.locate(id, Rect::from_origin_size(Point::ZERO, max));
        } else {
            ui.locate(id, self.zoom_rect);
        }
    }

    fn addressed_to(event: &Event, id: ViewId) -> bool {
        event
            .message()
            .is_some_and(|m| matches!(m.info, Payload::None) || m.info.view() == Some(id))
    }
}

impl ViewBehavior for Window {
    fn handle_event(&mut self, ui: &mut Ui, id: ViewId, event: &mut Event) {
        ui.handle_event_default(id, event);
        let addressed = Self::addressed_to(event, id);
        let modal = ui.get_state(id, StateFlags::MODAL);
        match *event {
            Event::Command(Message { command, .. }) => match command {
                CLOSE if addressed && self.flags.contains(WindowFlags::CLOSE) => {
                    ui.clear_event(id, event);
                    self.close(ui, id);
                }
                ZOOM if addressed && self.flags.contains(WindowFlags::ZOOM) => {
                    ui.clear_event(id, event);
                    self.zoom(ui, id);
                }
                OK | CANCEL | YES | NO if self.dialog && modal => {
                    ui.end_modal(id, command);
                    ui.clear_event(id, event);
                }
                _ => {}
            },
            Event::Broadcast(Message {
                command: SELECT_WINDOW_NUM,
                ref info,
            }) => {
                if self.number != 0
                    && info.int() == Some(i64::from(self.number))
                    && ui.options(id).contains(Options::SELECTABLE)
                {
                    ui.select(id);
                    ui.clear_event(id, event);
                }
            }
            Event::Key(key) => match key.code {
                KeyCode::Tab => {
                    ui.select_next(id, true);
                    ui.clear_event(id, event);
                }
                KeyCode::BackTab => {
                    ui.select_next(id, false);
                    ui.clear_event(id, event);
                }
                KeyCode::Escape if self.dialog => {
                    ui.put_event(Event::command(CANCEL));
                    ui.clear_event(id, event);
                }
                KeyCode::Enter if self.dialog => {
                    ui.put_event(Event::broadcast(DEFAULT));
                    ui.clear_event(id, event);
                }
                _ => {}
            },
            _ => {}
        }
    }

    fn set_state(&mut self, ui: &mut Ui, id: ViewId, flags: StateFlags, enable: bool) {
        ui.set_state_default(id, flags, enable);
        if flags.contains(StateFlags::SELECTED) {
            ui.set_state(id, StateFlags::ACTIVE, enable);
            let commands = self.commands();
            if enable {
                ui.enable_commands(&commands);
            } else {
                ui.disable_commands(&commands);
            }
        }
    }

    fn size_limits(&self, ui: &Ui, id: ViewId) -> (Point, Point) {
        let (_, max) = ui.size_limits_default(id);
        (MIN_WINDOW_SIZE, max)
    }

    fn palette(&self) -> Palette {
        Palette::from_static(PALETTE)
    }
}
