#![forbid(unsafe_code)]

use bitflags::bitflags;
use twin_core::command::{COMMAND_SET_CHANGED, Command, DEFAULT, GRAB_DEFAULT, RELEASE_DEFAULT};
use twin_core::event::{Event, EventMask, KeyCode, Message, MouseEventKind, Payload};
use twin_core::geometry::Rect;
use twin_core::handle::ViewId;
use twin_render::draw_buffer::{DrawBuffer, cstr_width};
use twin_render::palette::Palette;

use super::{hot_key, matches_hot_key};
use crate::behavior::ViewBehavior;
use crate::flags::{Options, StateFlags};
use crate::ui::{Phase, Ui};

const PALETTE: &[u8] = &[7, 8, 9, 10, 11, 12];

const NORMAL: u8 = 1;
const DEFAULT_COLOR: u8 = 2;
const FOCUSED: u8 = 3;
const DISABLED: u8 = 4;
const SHORTCUT: u8 = 5;
const SHADOW: u8 = 6;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ButtonFlags: u8 {
        /// Pressed by Enter in a dialog unless another button has the focus.
        const DEFAULT   = 0x01;
        /// Left-align the label.
        const LEFT_JUST = 0x02;
        /// Broadcast the command to the owner instead of queueing it.
        const BROADCAST = 0x04;
    }
}

/// A push button that emits a command.
///
/// Pressed by a click (released over the button), its hot key, Space while
/// focused, or Enter in a dialog when it is the default. The button
/// disables itself while its command is disabled.
#[derive(Debug, Clone)]
pub struct Button {
    title: String,
    command: Command,
    flags: ButtonFlags,
    am_default: bool,
    pressed: bool,
}

impl Button {
    #[must_use]
    pub fn new(title: impl Into<String>, command: Command, flags: ButtonFlags) -> Self {
        Self {
            title: title.into(),
            command,
            flags,
            am_default: flags.contains(ButtonFlags::DEFAULT),
            pressed: false,
        }
    }

    pub fn create(
        ui: &mut Ui,
        bounds: Rect,
        title: impl Into<String>,
        command: Command,
        flags: ButtonFlags,
    ) -> ViewId {
        let id = ui.add_view(bounds, Self::new(title, command, flags));
        ui.set_options(
            id,
            Options::SELECTABLE
                | Options::FIRST_CLICK
                | Options::PRE_PROCESS
                | Options::POST_PROCESS,
        );
        ui.set_event_mask(id, ui.event_mask(id) | EventMask::BROADCAST);
        if !ui.command_enabled(command) {
            ui.set_state(id, StateFlags::DISABLED, true);
        }
        id
    }

    fn press(&mut self, ui: &mut Ui, id: ViewId) {
        tracing::trace!(?id, command = self.command, "button pressed");
        let message = Message::new(self.command).with_info(Payload::View(id));
        if self.flags.contains(ButtonFlags::BROADCAST) {
            if let Some(owner) = ui.owner(id) {
                ui.message(owner, Event::Broadcast(message));
            }
        } else {
            ui.put_event(Event::Command(message));
        }
    }

    fn track(&mut self, ui: &mut Ui, id: ViewId, event: &mut Event) -> bool {
        let size = ui.size(id);
        let hit = Rect::new(0, 0, size.x - 1, size.y.max(2) - 1);
        let mut down = false;
        loop {
            let inside = event
                .mouse()
                .is_some_and(|m| hit.contains(ui.make_local(id, m.position)));
            if inside != down {
                down = inside;
                self.pressed = down;
                self.repaint(ui, id);
            }
            if !ui.mouse_event(event, EventMask::MOUSE_MOVE | EventMask::MOUSE_AUTO) {
                break;
            }
        }
        self.pressed = false;
        self.repaint(ui, id);
        down
    }

    fn repaint(&mut self, ui: &mut Ui, id: ViewId) {
        if ui.exposed(id) {
            self.draw(ui, id);
        }
    }

    fn make_default(&mut self, ui: &mut Ui, id: ViewId, enable: bool) {
        if self.flags.contains(ButtonFlags::DEFAULT) {
            return;
        }
        if let Some(owner) = ui.owner(id) {
            let command = if enable { GRAB_DEFAULT } else { RELEASE_DEFAULT };
            ui.message(
                owner,
                Event::Broadcast(Message::new(command).with_info(Payload::View(id))),
            );
        }
        self.am_default = enable;
        self.repaint(ui, id);
    }
}

impl ViewBehavior for Button {
    fn draw(&mut self, ui: &mut Ui, id: ViewId) {
        let size = ui.size(id);
        if size.x < 2 || size.y < 1 {
            return;
        }
        let state = ui.state(id);
        let face = if state.contains(StateFlags::DISABLED) {
            DISABLED
        } else if state.contains(StateFlags::FOCUSED) {
            FOCUSED
        } else if self.am_default {
            DEFAULT_COLOR
        } else {
            NORMAL
        };
        let face = ui.map_color(id, face);
        let shortcut = if state.contains(StateFlags::DISABLED) {
            face
        } else {
            ui.map_color(id, SHORTCUT)
        };
        let shadow = ui.map_color(id, SHADOW);
        let width = size.x as usize;
        let face_width = width - 1;
        let face_rows = (size.y - 1).max(1);
        let shift = usize::from(self.pressed);
        let label_width = cstr_width(&self.title).min(face_width);
        let label_x = if self.flags.contains(ButtonFlags::LEFT_JUST) {
            1
        } else {
            (face_width - label_width) / 2
        };
        let label_row = (face_rows - 1) / 2;

        for y in 0..face_rows {
            let mut line = DrawBuffer::new(width);
            line.move_char(0, ' ', shadow, width);
            line.move_char(shift, ' ', face, face_width);
            if y == label_row {
                line.move_cstr(label_x + shift, &self.title, face, shortcut);
            }
            if !self.pressed {
                line.move_char(face_width, if y == 0 { '▄' } else { '█' }, shadow, 1);
            }
            ui.write_line(id, 0, y, size.x, 1, line.cells());
        }
        if size.y > 1 {
            let mut line = DrawBuffer::new(width);
            line.move_char(0, ' ', shadow, width);
            if !self.pressed {
                line.move_char(1, '▀', shadow, width - 1);
            }
            ui.write_line(id, 0, size.y - 1, size.x, 1, line.cells());
        }
    }

    fn handle_event(&mut self, ui: &mut Ui, id: ViewId, event: &mut Event) {
        ui.handle_event_default(id, event);
        let disabled = ui.get_state(id, StateFlags::DISABLED);
        match *event {
            Event::Mouse(m) if m.kind == MouseEventKind::Down && !disabled => {
                if self.track(ui, id, event) {
                    self.press(ui, id);
                }
                ui.clear_event(id, event);
            }
            Event::Key(key) if !disabled => {
                let hot = hot_key(&self.title);
                let post = ui.owner(id).is_some_and(|o| ui.phase(o) == Phase::PostProcess);
                let space = key.code == KeyCode::Char(' ')
                    && ui.get_state(id, StateFlags::FOCUSED);
                if matches_hot_key(&key, hot, post) || space {
                    self.press(ui, id);
                    ui.clear_event(id, event);
                }
            }
            Event::Broadcast(Message { command, .. }) => match command {
                DEFAULT if self.am_default && !disabled => {
                    self.press(ui, id);
                    ui.clear_event(id, event);
                }
                GRAB_DEFAULT | RELEASE_DEFAULT if self.flags.contains(ButtonFlags::DEFAULT) => {
                    self.am_default = command == RELEASE_DEFAULT;
                    self.repaint(ui, id);
                }
                COMMAND_SET_CHANGED => {
                    let enabled = ui.command_enabled(self.command);
                    if enabled == disabled {
                        ui.set_state(id, StateFlags::DISABLED, !enabled);
                        self.repaint(ui, id);
                    }
                }
                _ => {}
            },
            _ => {}
        }
    }

    fn set_state(&mut self, ui: &mut Ui, id: ViewId, flags: StateFlags, enable: bool) {
        ui.set_state_default(id, flags, enable);
        if flags.intersects(StateFlags::SELECTED | StateFlags::ACTIVE) {
            self.repaint(ui, id);
        }
        if flags.contains(StateFlags::FOCUSED) {
            self.make_default(ui, id, enable);
        }
    }

    fn palette(&self) -> Palette {
        Palette::from_static(PALETTE)
    }
}
