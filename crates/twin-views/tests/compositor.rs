//! Compositor scenarios: occlusion by siblings, back-buffers, drop
//! shadows, caret placement, and redraw coalescing under locks.

use std::cell::Cell as Counter;
use std::rc::Rc;

use proptest::prelude::*;
use twin_core::geometry::Rect;
use twin_core::handle::ViewId;
use twin_core::source::ScriptedSource;
use twin_render::cell::Attr;
use twin_render::driver::{BLOCK_CURSOR, DEFAULT_CURSOR_SIZE, HeadlessDriver};
use twin_views::widgets::Background;
use twin_views::{Options, Plain, StateFlags, Ui, ViewBehavior};

fn engine(cols: u16, rows: u16) -> (Ui, HeadlessDriver) {
    let screen = HeadlessDriver::new(cols, rows);
    let ui = Ui::new(screen.clone(), ScriptedSource::new());
    (ui, screen)
}

/// A buffered 12×2 group holding a 10×1 view with a `#` strip over
/// columns `cover`.
fn buffered_pair(ui: &mut Ui, cover: Rect) -> (ViewId, ViewId) {
    let group = ui.add_group(Rect::new(0, 0, 12, 2), Plain);
    ui.set_options(group, Options::BUFFERED);
    let view = ui.add_view(Rect::new(0, 0, 10, 1), Plain);
    let strip = ui.add_view(cover, Background::new('#'));
    ui.insert(group, view);
    ui.insert(group, strip);
    let root = ui.root();
    ui.insert(root, group);
    (group, view)
}

#[test]
fn occluded_middle_leaves_buffer_untouched() {
    let (mut ui, screen) = engine(20, 4);
    let (group, view) = buffered_pair(&mut ui, Rect::new(3, 0, 7, 1));
    assert!(ui.has_buffer(group));
    assert_eq!(ui.buffer(group).map(|b| b.row_text(0)).as_deref(), Some("   ####     "));
    screen.take_writes();

    ui.write_str(view, 0, 0, "HELLOWORLD", 1);

    assert_eq!(ui.buffer(group).map(|b| b.row_text(0)).as_deref(), Some("HEL####RLD  "));
    let writes = screen.take_writes();
    let spans: Vec<(u16, u16)> = writes.iter().map(|w| (w.x, w.w)).collect();
    assert_eq!(spans, vec![(0, 3), (7, 3)]);
    assert!(screen.row_text(0).starts_with("HEL####RLD"));
}

#[test]
fn fully_covered_view_writes_nothing() {
    let (mut ui, screen) = engine(20, 4);
    let (group, view) = buffered_pair(&mut ui, Rect::new(0, 0, 10, 1));
    let before = ui.buffer(group).cloned();
    screen.take_writes();

    ui.write_str(view, 0, 0, "HELLOWORLD", 1);

    assert!(screen.take_writes().is_empty());
    assert_eq!(ui.buffer(group).cloned(), before);
    assert!(!ui.exposed(view));
}

#[test]
fn partially_covered_view_keeps_the_visible_tail() {
    let (mut ui, screen) = engine(20, 4);
    let (group, view) = buffered_pair(&mut ui, Rect::new(0, 0, 5, 1));
    screen.take_writes();

    ui.write_str(view, 0, 0, "ABCDEFGHIJ", 1);

    assert_eq!(ui.buffer(group).map(|b| b.row_text(0)).as_deref(), Some("#####FGHIJ  "));
    let writes = screen.take_writes();
    assert_eq!(writes.len(), 1);
    assert_eq!((writes[0].x, writes[0].w), (5, 5));
}

#[test]
fn writes_clip_to_the_view() {
    let (mut ui, screen) = engine(20, 4);
    let root = ui.root();
    let view = ui.add_view(Rect::new(2, 1, 6, 2), Plain);
    ui.insert(root, view);
    screen.take_writes();

    ui.write_str(view, -2, 0, "abcdefgh", 1);

    assert_eq!(&screen.row_text(1)[..8], "  cdef  ");
    screen.take_writes();
    ui.write_str(view, 0, 1, "zzz", 1);
    assert!(screen.take_writes().is_empty(), "row outside the view");
}

#[test]
fn shadow_recolours_without_hiding() {
    let (mut ui, screen) = engine(20, 6);
    let root = ui.root();
    let back = ui.add_view(Rect::new(0, 0, 10, 3), Plain);
    let front = ui.add_view(Rect::new(0, 0, 4, 2), Background::new('#'));
    ui.set_state(front, StateFlags::SHADOW, true);
    ui.insert(root, back);
    ui.insert(root, front);
    let normal = ui.map_color(back, 1);

    ui.write_str(back, 0, 1, "HELLOWORLD", 1);
    ui.write_str(back, 0, 2, "HELLOWORLD", 1);

    // Right edge of the shadow: columns 4..6 of row 1.
    assert_eq!(&screen.row_text(1)[..10], "####OWORLD");
    for x in 4..6 {
        assert_eq!(screen.cell(x, 1).map(|c| c.attr), Some(Attr::SHADOW));
    }
    assert_eq!(screen.cell(6, 1).map(|c| c.attr), Some(normal));

    // Bottom edge: columns 2..6 of row 2.
    assert_eq!(&screen.row_text(2)[..10], "HELLOWORLD");
    assert_eq!(screen.cell(1, 2).map(|c| c.attr), Some(normal));
    for x in 2..6 {
        assert_eq!(screen.cell(x, 2).map(|c| c.attr), Some(Attr::SHADOW));
    }
    assert_eq!(screen.cell(6, 2).map(|c| c.attr), Some(normal));
}

#[test]
fn group_buffer_is_copied_on_redraw() {
    let (mut ui, screen) = engine(20, 4);
    let (group, view) = buffered_pair(&mut ui, Rect::new(3, 0, 7, 1));
    ui.write_str(view, 0, 0, "HELLOWORLD", 1);
    screen.take_writes();

    ui.draw_view(group);

    let writes = screen.take_writes();
    assert_eq!(writes.len(), 2, "one write per group row");
    assert!(writes.iter().all(|w| w.w == 12));
    assert!(screen.row_text(0).starts_with("HEL####RLD"));
}

#[test]
fn resizing_a_group_rebuilds_its_buffer() {
    let (mut ui, _screen) = engine(20, 4);
    let (group, _) = buffered_pair(&mut ui, Rect::new(3, 0, 7, 1));
    assert_eq!(ui.buffer(group).map(|b| b.len()), Some(24));

    ui.set_bounds(group, Rect::new(2, 0, 14, 2));
    assert!(ui.has_buffer(group), "a move keeps the buffer");

    ui.set_bounds(group, Rect::new(0, 0, 16, 3));
    assert!(!ui.has_buffer(group));

    ui.draw_view(group);
    let buf = ui.buffer(group).expect("rebuilt on draw");
    assert_eq!(buf.len(), 48);
    assert_eq!(buf.row_text(0), "   ####         ");
}

#[test]
fn caret_follows_the_focused_view() {
    let (mut ui, screen) = engine(20, 10);
    let root = ui.root();
    let view = ui.add_view(Rect::new(5, 3, 15, 6), Plain);
    ui.set_options(view, Options::SELECTABLE);
    ui.insert(root, view);
    assert!(ui.get_state(view, StateFlags::FOCUSED));

    ui.set_cursor(view, 2, 1);
    ui.show_cursor(view);
    assert_eq!(screen.cursor_position(), (7, 4));
    assert_eq!(screen.cursor_type(), DEFAULT_CURSOR_SIZE);

    ui.block_cursor(view);
    assert_eq!(screen.cursor_type(), BLOCK_CURSOR);

    ui.hide_cursor(view);
    assert_eq!(screen.cursor_type(), 0);
}

#[test]
fn covered_caret_is_hidden() {
    let (mut ui, screen) = engine(20, 10);
    let root = ui.root();
    let view = ui.add_view(Rect::new(5, 3, 15, 6), Plain);
    ui.set_options(view, Options::SELECTABLE);
    ui.insert(root, view);
    ui.show_cursor(view);
    assert_ne!(screen.cursor_type(), 0);

    let cover = ui.add_view(Rect::new(0, 0, 20, 5), Background::new('.'));
    ui.insert(root, cover);
    ui.reset_cursor(view);
    assert_eq!(screen.cursor_type(), 0);

    ui.set_cursor(view, 0, 2);
    assert_eq!(screen.cursor_position(), (5, 5));
    assert_ne!(screen.cursor_type(), 0);
}

struct CountingGroup(Rc<Counter<usize>>);

impl ViewBehavior for CountingGroup {
    fn draw(&mut self, ui: &mut Ui, id: ViewId) {
        self.0.set(self.0.get() + 1);
        ui.draw_default(id);
    }
}

#[test]
fn nested_locks_draw_once() {
    let (mut ui, screen) = engine(40, 12);
    let root = ui.root();
    let draws = Rc::new(Counter::new(0));
    let group = ui.add_group(Rect::new(0, 0, 30, 10), CountingGroup(Rc::clone(&draws)));
    ui.insert(root, group);
    assert_eq!(draws.get(), 1);
    draws.set(0);

    for _ in 0..3 {
        ui.lock(group);
    }
    let mut children = Vec::new();
    for i in 0..3 {
        let child = ui.add_view(Rect::new(i * 5, 1, i * 5 + 4, 3), Plain);
        ui.set_options(child, Options::SELECTABLE);
        ui.insert(group, child);
        children.push(child);
    }
    ui.select_next(group, true);
    ui.set_state(children[0], StateFlags::DISABLED, true);

    screen.take_writes();
    ui.write_str(children[2], 0, 0, "held", 1);
    assert!(screen.take_writes().is_empty(), "a locked group must hold its children's output");

    ui.unlock(group);
    ui.unlock(group);
    assert_eq!(draws.get(), 0);
    ui.unlock(group);
    assert_eq!(draws.get(), 1);
    assert!(!screen.take_writes().is_empty());
    assert_eq!(ui.lock_count(group), 0);
}

proptest! {
    #[test]
    fn exposure_agrees_with_the_writer(
        x in 0i16..12,
        cover_x in -3i16..12,
        cover_w in 0i16..6,
        hidden in any::<bool>(),
    ) {
        let (mut ui, screen) = engine(12, 2);
        let root = ui.root();
        let view = ui.add_view(Rect::new(x, 0, x + 1, 1), Plain);
        let cover = ui.add_view(Rect::new(cover_x, 0, cover_x + cover_w, 1), Background::new('#'));
        ui.insert(root, view);
        ui.insert(root, cover);
        if hidden {
            ui.hide(cover);
        }
        screen.take_writes();

        let exposed = ui.exposed(view);
        ui.write_str(view, 0, 0, "x", 1);
        let wrote = !screen.take_writes().is_empty();

        prop_assert_eq!(exposed, wrote);
        let covered = !hidden && cover_w > 0 && (cover_x..cover_x + cover_w).contains(&x);
        prop_assert_eq!(exposed, !covered);
    }
}
