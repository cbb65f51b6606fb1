#![forbid(unsafe_code)]

//! Render layer for twin: cells and colour attributes, cell buffers, the
//! line builder widgets draw with, palettes, and the screen driver trait.

pub mod buffer;
pub mod cell;
pub mod draw_buffer;
pub mod driver;
pub mod palette;

pub use buffer::CellBuffer;
pub use cell::{Attr, Cell};
pub use draw_buffer::DrawBuffer;
pub use driver::{HeadlessDriver, ScreenDriver};
pub use palette::{Palette, map_color};
