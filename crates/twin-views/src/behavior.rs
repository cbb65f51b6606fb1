#![forbid(unsafe_code)]

//! The widget-author surface.
//!
//! A view's geometry, flags, and links live in the [`Ui`] arena; what a view
//! *does* lives in a [`ViewBehavior`]. Every method has a default that calls
//! back into the engine, so an implementation only overrides what it
//! changes and delegates the rest:
//!
//! ```ignore
//! impl ViewBehavior for Counter {
//!     fn handle_event(&mut self, ui: &mut Ui, id: ViewId, event: &mut Event) {
//!         ui.handle_event_default(id, event);
//!         if event.is_command(INCREMENT) {
//!             self.value += 1;
//!             ui.clear_event(id, event);
//!             ui.draw_view(id);
//!         }
//!     }
//! }
//! ```
//!
//! While a method runs, the behaviour is detached from its node. Calls the
//! engine makes on the same view during that time use the defaults, except
//! drawing, which is deferred until the method returns. A behaviour that
//! needs to repaint immediately calls its own `draw`.

use twin_core::command::Command;
use twin_core::event::Event;
use twin_core::geometry::{Point, Rect};
use twin_core::handle::ViewId;
use twin_render::palette::Palette;

use crate::flags::StateFlags;
use crate::ui::Ui;

/// Overridable view behaviour.
pub trait ViewBehavior {
    /// Paint the view through the writer primitives.
    fn draw(&mut self, ui: &mut Ui, id: ViewId) {
        ui.draw_default(id);
    }

    /// React to an event; consume it with [`Ui::clear_event`].
    fn handle_event(&mut self, ui: &mut Ui, id: ViewId, event: &mut Event) {
        ui.handle_event_default(id, event);
    }

    /// Colour indices into the owner's palette. Read once, when the
    /// behaviour is attached.
    fn palette(&self) -> Palette {
        Palette::empty()
    }

    /// Minimum and maximum size.
    fn size_limits(&self, ui: &Ui, id: ViewId) -> (Point, Point) {
        ui.size_limits_default(id)
    }

    /// Whether the view agrees to `command` (e.g. closing with unsaved
    /// input).
    fn valid(&mut self, ui: &mut Ui, id: ViewId, command: Command) -> bool {
        ui.valid_default(id, command)
    }

    /// Apply state bits and their side effects.
    fn set_state(&mut self, ui: &mut Ui, id: ViewId, flags: StateFlags, enable: bool) {
        ui.set_state_default(id, flags, enable);
    }

    /// Move or resize the view.
    fn change_bounds(&mut self, ui: &mut Ui, id: ViewId, bounds: Rect) {
        ui.change_bounds_default(id, bounds);
    }

    /// Size of the record exchanged through `get_data`/`set_data`.
    fn data_size(&self, ui: &Ui, id: ViewId) -> usize {
        ui.data_size_default(id)
    }

    /// Append the view's data record to `out`.
    fn get_data(&self, ui: &Ui, id: ViewId, out: &mut Vec<u8>) {
        ui.get_data_default(id, out);
    }

    /// Load the view's data record from the front of `data`; returns the
    /// number of bytes consumed.
    fn set_data(&mut self, ui: &mut Ui, id: ViewId, data: &[u8]) -> usize {
        ui.set_data_default(id, data)
    }
}
