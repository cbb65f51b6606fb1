//! Modal loop scenarios driven by scripted input: dialogs ending through
//! keys and clicks, nested loops, timers, resizes, and mouse drags.

use std::cell::{Cell as Slot, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use twin_core::command::{
    CANCEL, CLOSE, COMMAND_SET_CHANGED, Command, NEXT, OK, SCREEN_CHANGED, SCROLLBAR_CHANGED,
    TIMER_EXPIRED, USER, ZOOM,
};
use twin_core::event::{
    Event, EventMask, KeyCode, KeyEvent, Modifiers, MouseButtons, MouseEvent, MouseEventKind,
    MouseSample, RawEvent, Wheel,
};
use twin_core::geometry::{Point, Rect};
use twin_core::handle::ViewId;
use twin_core::source::ScriptedSource;
use twin_render::driver::HeadlessDriver;
use twin_views::widgets::{Background, Button, ButtonFlags, Scroller, Window};
use twin_views::{ModalPhase, Options, Plain, StateFlags, Ui, ViewBehavior};

fn engine(events: Vec<RawEvent>) -> (Ui, HeadlessDriver) {
    let screen = HeadlessDriver::new(80, 25);
    let mut ui = Ui::new(screen.clone(), ScriptedSource::with_events(events));
    let t0 = Instant::now();
    ui.set_clock(move || t0);
    (ui, screen)
}

fn key(code: KeyCode) -> RawEvent {
    RawEvent::Key(KeyEvent::new(code))
}

fn mouse(x: i16, y: i16, buttons: MouseButtons) -> RawEvent {
    RawEvent::Mouse(MouseSample::new(Point::new(x, y), buttons))
}

/// A selectable view standing in for whatever had the focus before a
/// dialog opened.
fn editor(ui: &mut Ui) -> ViewId {
    let root = ui.root();
    let view = ui.add_view(Rect::new(0, 0, 80, 25), Plain);
    ui.set_options(view, Options::SELECTABLE);
    ui.insert(root, view);
    view
}

/// A 30×10 dialog at (10, 5) with a default OK button at dialog-local
/// (5, 3)..(15, 5) and a Cancel button beside it. OK is in front and
/// current.
fn ok_cancel_dialog(ui: &mut Ui) -> ViewId {
    let dialog = Window::dialog(ui, Rect::new(10, 5, 40, 15), "Confirm");
    let cancel = Button::create(ui, Rect::new(16, 3, 28, 5), "Cancel", CANCEL, ButtonFlags::empty());
    let ok = Button::create(ui, Rect::new(5, 3, 15, 5), "~O~K", OK, ButtonFlags::DEFAULT);
    ui.insert(dialog, cancel);
    ui.insert(dialog, ok);
    assert_eq!(ui.current(dialog), Some(ok));
    dialog
}

/// Ends the modal loop it runs in when `key` is typed.
struct EndsOn {
    key: char,
    code: Command,
}

impl ViewBehavior for EndsOn {
    fn handle_event(&mut self, ui: &mut Ui, id: ViewId, event: &mut Event) {
        ui.handle_event_default(id, event);
        if event.key().is_some_and(|k| k.is_char(self.key)) {
            ui.end_modal(id, self.code);
            ui.clear_event(id, event);
        }
    }
}

#[test]
fn exec_view_returns_the_end_state() {
    let (mut ui, _) = engine(vec![key(KeyCode::Char('a')), key(KeyCode::Char('q'))]);
    let root = ui.root();
    let view = ui.add_view(Rect::new(5, 5, 20, 10), EndsOn { key: 'q', code: USER + 7 });

    assert_eq!(ui.exec_view(root, view), USER + 7);
    assert_eq!(ui.owner(view), None);
    assert!(!ui.get_state(view, StateFlags::MODAL));
    assert_eq!(ui.modal_phase(view), ModalPhase::NotRunning);
    assert_eq!(ui.top_view(), None);
}

#[test]
fn enter_presses_the_default_button() {
    let (mut ui, _) = engine(vec![key(KeyCode::Enter)]);
    let root = ui.root();
    let before = editor(&mut ui);
    let commands = ui.commands();
    let dialog = ok_cancel_dialog(&mut ui);

    assert_eq!(ui.exec_view(root, dialog), OK);
    assert_eq!(ui.current(root), Some(before));
    assert!(ui.get_state(before, StateFlags::FOCUSED));
    assert_eq!(ui.owner(dialog), None);
    assert!(ui.commands() == commands);
    assert_eq!(ui.options(dialog), Options::SELECTABLE | Options::TOP_SELECT);
}

#[test]
fn escape_cancels_a_dialog() {
    let (mut ui, _) = engine(vec![key(KeyCode::Escape)]);
    let root = ui.root();
    editor(&mut ui);
    let dialog = ok_cancel_dialog(&mut ui);
    assert_eq!(ui.exec_view(root, dialog), CANCEL);
}

#[test]
fn hot_key_presses_its_button() {
    let alt_o = RawEvent::Key(KeyEvent::new(KeyCode::Char('o')).with_modifiers(Modifiers::ALT));
    let (mut ui, _) = engine(vec![alt_o]);
    let root = ui.root();
    let dialog = ok_cancel_dialog(&mut ui);
    assert_eq!(ui.exec_view(root, dialog), OK);
}

#[test]
fn clicking_a_button_ends_the_dialog() {
    // OK sits at screen (15, 8)..(25, 10).
    let (mut ui, _) = engine(vec![
        mouse(17, 8, MouseButtons::LEFT),
        mouse(17, 8, MouseButtons::empty()),
    ]);
    let root = ui.root();
    editor(&mut ui);
    let dialog = ok_cancel_dialog(&mut ui);
    assert_eq!(ui.exec_view(root, dialog), OK);
}

#[test]
fn releasing_outside_a_button_does_not_press_it() {
    let (mut ui, _) = engine(vec![
        mouse(17, 8, MouseButtons::LEFT),
        mouse(17, 12, MouseButtons::LEFT),
        mouse(17, 12, MouseButtons::empty()),
        key(KeyCode::Escape),
    ]);
    let root = ui.root();
    let dialog = ok_cancel_dialog(&mut ui);
    assert_eq!(ui.exec_view(root, dialog), CANCEL);
}

/// Runs `inner` modally on `n`, ends its own loop on `x`.
struct Nester {
    inner_result: Rc<Slot<Command>>,
    depth_seen: Rc<Slot<usize>>,
}

impl ViewBehavior for Nester {
    fn handle_event(&mut self, ui: &mut Ui, id: ViewId, event: &mut Event) {
        ui.handle_event_default(id, event);
        let Some(k) = event.key().copied() else {
            return;
        };
        if k.is_char('n') {
            ui.clear_event(id, event);
            let root = ui.root();
            let inner = ui.add_view(Rect::new(0, 0, 4, 4), Probe {
                depth_seen: Rc::clone(&self.depth_seen),
            });
            let result = ui.exec_view(root, inner);
            self.inner_result.set(result);
            ui.destroy(inner);
        } else if k.is_char('x') {
            ui.end_modal(id, USER + 1);
            ui.clear_event(id, event);
        }
    }
}

/// Records which loop it runs in, ends on `q`.
struct Probe {
    depth_seen: Rc<Slot<usize>>,
}

impl ViewBehavior for Probe {
    fn handle_event(&mut self, ui: &mut Ui, id: ViewId, event: &mut Event) {
        if event.key().is_some_and(|k| k.is_char('q')) {
            if ui.top_view() == Some(id) {
                self.depth_seen.set(self.depth_seen.get() + 1);
            }
            ui.end_modal(id, USER + 2);
            ui.clear_event(id, event);
        }
    }
}

#[test]
fn nested_loops_end_innermost_first() {
    let (mut ui, _) = engine(vec![
        key(KeyCode::Char('n')),
        key(KeyCode::Char('q')),
        key(KeyCode::Char('x')),
    ]);
    let root = ui.root();
    let inner_result = Rc::new(Slot::new(0));
    let depth_seen = Rc::new(Slot::new(0));
    let outer = ui.add_view(Rect::new(0, 0, 10, 10), Nester {
        inner_result: Rc::clone(&inner_result),
        depth_seen: Rc::clone(&depth_seen),
    });

    assert_eq!(ui.exec_view(root, outer), USER + 1);
    assert_eq!(inner_result.get(), USER + 2);
    assert_eq!(depth_seen.get(), 1);
    assert_eq!(ui.top_view(), None);
}

/// Collects the broadcasts it sees.
struct Listener(Rc<RefCell<Vec<Event>>>);

impl ViewBehavior for Listener {
    fn handle_event(&mut self, ui: &mut Ui, id: ViewId, event: &mut Event) {
        ui.handle_event_default(id, event);
        if matches!(event, Event::Broadcast(_)) {
            self.0.borrow_mut().push(event.clone());
        }
    }
}

fn count(seen: &Rc<RefCell<Vec<Event>>>, command: Command) -> usize {
    seen.borrow().iter().filter(|e| e.is_broadcast(command)).count()
}

fn listener(ui: &mut Ui) -> Rc<RefCell<Vec<Event>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let root = ui.root();
    let view = ui.add_view(Rect::new(0, 0, 1, 1), Listener(Rc::clone(&seen)));
    ui.set_event_mask(view, EventMask::BROADCAST);
    ui.insert(root, view);
    seen
}

#[test]
fn idle_fires_due_timers() {
    let screen = HeadlessDriver::new(40, 10);
    let mut ui = Ui::new(screen, ScriptedSource::new());
    let t0 = Instant::now();
    let now = Rc::new(Slot::new(t0));
    let clock = Rc::clone(&now);
    ui.set_clock(move || clock.get());
    let seen = listener(&mut ui);

    let once = ui.set_timer(Duration::from_millis(50), None);
    let tick = ui.set_timer(Duration::from_millis(20), Some(Duration::from_millis(20)));
    ui.idle();
    assert_eq!(count(&seen, TIMER_EXPIRED), 0);

    now.set(t0 + Duration::from_millis(60));
    ui.idle();
    let fired: Vec<i64> = seen
        .borrow()
        .iter()
        .filter(|e| e.is_broadcast(TIMER_EXPIRED))
        .filter_map(|e| e.message().and_then(|m| m.info.int()))
        .collect();
    assert_eq!(fired, vec![tick.0 as i64, once.0 as i64]);

    seen.borrow_mut().clear();
    ui.kill_timer(tick);
    now.set(t0 + Duration::from_millis(200));
    ui.idle();
    assert_eq!(count(&seen, TIMER_EXPIRED), 0);
}

#[test]
fn command_set_changes_reach_buttons() {
    let (mut ui, _) = engine(Vec::new());
    let root = ui.root();
    let seen = listener(&mut ui);
    let button = Button::create(&mut ui, Rect::new(2, 2, 12, 4), "Go", USER + 3, ButtonFlags::empty());
    ui.insert(root, button);
    assert!(!ui.get_state(button, StateFlags::DISABLED));

    ui.idle();
    let baseline = count(&seen, COMMAND_SET_CHANGED);

    ui.disable_command(USER + 3);
    ui.idle();
    assert!(ui.get_state(button, StateFlags::DISABLED));
    assert_eq!(count(&seen, COMMAND_SET_CHANGED), baseline + 1);

    ui.idle();
    assert_eq!(count(&seen, COMMAND_SET_CHANGED), baseline + 1, "no change, no broadcast");

    ui.enable_command(USER + 3);
    ui.idle();
    assert!(!ui.get_state(button, StateFlags::DISABLED));
}

#[test]
fn resize_relays_out_from_the_root() {
    let (mut ui, screen) = engine(vec![RawEvent::Resize { cols: 60, rows: 20 }]);
    let root = ui.root();
    let extent = ui.extent(root);
    let desk = Background::create(&mut ui, extent, '░');
    ui.insert(root, desk);
    let seen = listener(&mut ui);
    screen.resize(60, 20);

    let event = ui.get_event();

    assert!(event.is_nothing());
    assert_eq!(ui.size(root), Point::new(60, 20));
    assert_eq!(ui.size(desk), Point::new(60, 20));
    assert_eq!(count(&seen, SCREEN_CHANGED), 1);
    assert_eq!(screen.row_text(19), "░".repeat(60));
}

#[test]
fn dragging_the_title_moves_the_window() {
    let (mut ui, _) = engine(vec![
        mouse(13, 2, MouseButtons::LEFT),
        mouse(18, 5, MouseButtons::LEFT),
        mouse(18, 5, MouseButtons::empty()),
    ]);
    let root = ui.root();
    let window = Window::create(&mut ui, Rect::new(5, 2, 35, 12), "Drag", 1);
    ui.insert(root, window);

    let mut event = ui.get_event();
    assert!(matches!(event, Event::Mouse(MouseEvent { kind: MouseEventKind::Down, .. })));
    ui.handle_event(root, &mut event);

    assert!(event.is_nothing());
    assert_eq!(ui.origin(window), Point::new(10, 5));
    assert_eq!(ui.size(window), Point::new(30, 10));
    assert!(!ui.get_state(window, StateFlags::DRAGGING));
}

#[test]
fn scroller_follows_wheel_and_keys() {
    let (mut ui, _) = engine(Vec::new());
    let root = ui.root();
    let window = Window::create(&mut ui, Rect::new(5, 2, 35, 12), "Log", 1);
    let lines = (0..30).map(|i| format!("line {i}")).collect();
    let scroller = Scroller::create(&mut ui, Rect::new(1, 1, 29, 9), lines);
    ui.insert(window, scroller);
    ui.insert(root, window);
    let seen = listener(&mut ui);
    assert_eq!(ui.current(window), Some(scroller));

    let mut wheel = MouseEvent::new(MouseEventKind::Wheel, Point::new(10, 6), MouseButtons::empty());
    wheel.wheel = Some(Wheel::Down);
    ui.handle_event(root, &mut Event::Mouse(wheel));
    let mut record = Vec::new();
    ui.get_data(scroller, &mut record);
    assert_eq!(record, vec![0, 0, 3, 0]);

    ui.handle_event(root, &mut Event::Key(KeyEvent::new(KeyCode::End)));
    record.clear();
    ui.get_data(scroller, &mut record);
    assert_eq!(record, vec![0, 0, 22, 0]);

    // The window hears about scrolling; the root does not.
    assert_eq!(count(&seen, SCROLLBAR_CHANGED), 0);
}

#[test]
fn inserted_window_becomes_active() {
    let (mut ui, _) = engine(Vec::new());
    let root = ui.root();
    assert!(!ui.command_enabled(CLOSE));

    let first = Window::create(&mut ui, Rect::new(5, 2, 35, 12), "One", 1);
    ui.insert(root, first);
    assert!(ui.get_state(first, StateFlags::SELECTED));
    assert!(ui.get_state(first, StateFlags::ACTIVE));
    for cmd in [CLOSE, ZOOM, NEXT] {
        assert!(ui.command_enabled(cmd), "{cmd} enabled");
    }

    let second = Window::create(&mut ui, Rect::new(40, 5, 70, 15), "Two", 2);
    ui.insert(root, second);
    assert!(ui.get_state(second, StateFlags::ACTIVE));
    assert!(!ui.get_state(first, StateFlags::ACTIVE));
    assert!(!ui.get_state(first, StateFlags::SELECTED));
    assert!(ui.command_enabled(CLOSE));
}

#[test]
fn clicking_a_window_activates_it() {
    let (mut ui, _) = engine(vec![
        mouse(10, 6, MouseButtons::LEFT),
        mouse(10, 6, MouseButtons::empty()),
    ]);
    let root = ui.root();
    let first = Window::create(&mut ui, Rect::new(5, 2, 35, 12), "One", 1);
    ui.insert(root, first);
    let second = Window::create(&mut ui, Rect::new(40, 5, 70, 15), "Two", 2);
    ui.insert(root, second);
    assert!(!ui.get_state(first, StateFlags::ACTIVE));

    let mut event = ui.get_event();
    assert!(matches!(event, Event::Mouse(MouseEvent { kind: MouseEventKind::Down, .. })));
    ui.handle_event(root, &mut event);

    assert_eq!(ui.current(root), Some(first));
    assert!(ui.get_state(first, StateFlags::SELECTED));
    assert!(ui.get_state(first, StateFlags::ACTIVE));
    assert!(!ui.get_state(second, StateFlags::ACTIVE));
    assert!(ui.command_enabled(CLOSE));
    assert!(ui.command_enabled(ZOOM));
    // Activity reaches the frame inside.
    let frame = ui.first_match(first, StateFlags::VISIBLE, Options::empty());
    assert!(frame.is_some_and(|f| ui.get_state(f, StateFlags::ACTIVE)));
}
