#![forbid(unsafe_code)]

use twin_core::geometry::Rect;
use twin_core::handle::ViewId;
use twin_render::draw_buffer::{DrawBuffer, str_width};
use twin_render::palette::Palette;

use crate::behavior::ViewBehavior;
use crate::ui::Ui;

const PALETTE: &[u8] = &[6];

/// Marks a paragraph to be centered.
pub const CENTER_MARK: char = '\u{3}';

/// Read-only text, word-wrapped to the view's width. A paragraph that
/// starts with [`CENTER_MARK`] is centered.
#[derive(Debug, Clone)]
pub struct StaticText {
    text: String,
}

impl StaticText {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn create(ui: &mut Ui, bounds: Rect, text: impl Into<String>) -> ViewId {
        ui.add_view(bounds, Self::new(text))
    }

    /// The text laid out into at most `width`-cell lines, each with its
    /// starting column.
    #[must_use]
    pub fn layout(&self, width: usize) -> Vec<(usize, String)> {
        let mut out = Vec::new();
        if width == 0 {
            return out;
        }
        for paragraph in self.text.split('\n') {
            let (center, paragraph) = match paragraph.strip_prefix(CENTER_MARK) {
                Some(rest) => (true, rest),
                None => (false, paragraph),
            };
            for line in wrap(paragraph, width) {
                let indent = if center {
                    (width - str_width(&line).min(width)) / 2
                } else {
                    0
                };
                out.push((indent, line));
            }
        }
        out
    }
}

fn wrap(paragraph: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_width = 0;
    for word in paragraph.split(' ') {
        let mut word = word;
        loop {
            let w = str_width(word);
            let gap = usize::from(line_width > 0);
            if line_width + gap + w <= width {
                if gap == 1 {
                    line.push(' ');
                }
                line.push_str(word);
                line_width += gap + w;
                break;
            }
            if line_width > 0 {
                lines.push(std::mem::take(&mut line));
                line_width = 0;
                continue;
            }
            // A word longer than the line is hard-broken.
            let cut = word
                .char_indices()
                .nth(width)
                .map_or(word.len(), |(i, _)| i);
            lines.push(word[..cut].to_owned());
            word = &word[cut..];
            if word.is_empty() {
                break;
            }
        }
    }
    if line_width > 0 || lines.is_empty() {
        lines.push(line);
    }
    lines
}

impl ViewBehavior for StaticText {
    fn draw(&mut self, ui: &mut Ui, id: ViewId) {
        let size = ui.size(id);
        if size.x <= 0 || size.y <= 0 {
            return;
        }
        let color = ui.map_color(id, 1);
        let lines = self.layout(size.x as usize);
        for y in 0..size.y {
            let mut buf = DrawBuffer::new(size.x as usize);
            buf.move_char(0, ' ', color, size.x as usize);
            if let Some((indent, text)) = lines.get(y as usize) {
                buf.move_str(*indent, text, color);
            }
            ui.write_line(id, 0, y, size.x, 1, buf.cells());
        }
    }

    fn palette(&self) -> Palette {
        Palette::from_static(PALETTE)
    }
}
