#![forbid(unsafe_code)]

//! Event routing.
//!
//! Focused events (keys and commands) follow the focus chain: each group
//! offers them to its pre-process children, then to its current child,
//! then to its post-process children. Positional events go to the
//! frontmost visible child under the mouse. Everything else (broadcasts)
//! goes to every child, front to back, until consumed.

use twin_core::event::{Event, EventMask, MouseEventKind, Payload};
use twin_core::handle::ViewId;

use crate::flags::{Options, StateFlags};
use crate::ui::{Phase, Ui};

impl Ui {
    /// Default event handling.
    ///
    /// Any view: a mouse-down on an enabled, selectable, unselected view
    /// focuses it, and is consumed unless the view has
    /// [`Options::FIRST_CLICK`]. Groups then route the event to their
    /// children.
    pub fn handle_event_default(&mut self, id: ViewId, event: &mut Event) {
        if matches!(event.mouse(), Some(m) if m.kind == MouseEventKind::Down) {
            let state = self.state(id);
            let options = self.options(id);
            if !state.intersects(StateFlags::SELECTED | StateFlags::DISABLED)
                && options.contains(Options::SELECTABLE)
                && (!self.focus(id) || !options.contains(Options::FIRST_CLICK))
            {
                self.clear_event(id, event);
            }
        }
        if self.is_group(id) && !event.is_nothing() {
            self.dispatch_to_children(id, event);
        }
    }

    fn dispatch_to_children(&mut self, group: ViewId, event: &mut Event) {
        let mask = event.mask();
        if mask.intersects(EventMask::FOCUSED) {
            self.set_phase(group, Phase::PreProcess);
            self.deliver_to_all(group, event, Phase::PreProcess);
            self.set_phase(group, Phase::Focused);
            if let Some(current) = self.current(group) {
                self.deliver(current, event, Phase::Focused);
            }
            self.set_phase(group, Phase::PostProcess);
            self.deliver_to_all(group, event, Phase::PostProcess);
            self.set_phase(group, Phase::Focused);
        } else if mask.intersects(EventMask::POSITIONAL) {
            let Some(position) = event.mouse().map(|m| m.position) else {
                return;
            };
            let target = self.children_front_to_back(group).into_iter().find(|c| {
                self.get_state(*c, StateFlags::VISIBLE) && self.mouse_in_view(*c, position)
            });
            if let Some(target) = target {
                self.deliver(target, event, Phase::Focused);
            }
        } else {
            self.deliver_to_all(group, event, Phase::Focused);
        }
    }

    fn deliver_to_all(&mut self, group: ViewId, event: &mut Event, phase: Phase) {
        for child in self.children_front_to_back(group) {
            if event.is_nothing() {
                break;
            }
            self.deliver(child, event, phase);
        }
    }

    fn deliver(&mut self, view: ViewId, event: &mut Event, phase: Phase) {
        let Some(node) = self.node(view) else {
            return;
        };
        let mask = event.mask();
        if node.state.contains(StateFlags::DISABLED)
            && mask.intersects(EventMask::POSITIONAL | EventMask::FOCUSED)
        {
            return;
        }
        let wanted = match phase {
            Phase::Focused => true,
            Phase::PreProcess => node.options.contains(Options::PRE_PROCESS),
            Phase::PostProcess => node.options.contains(Options::POST_PROCESS),
        };
        if wanted && node.event_mask.intersects(mask) {
            self.handle_event(view, event);
        }
    }

    fn set_phase(&mut self, group: ViewId, phase: Phase) {
        if let Some(g) = self.group_mut(group) {
            g.phase = phase;
        }
    }

    /// Consume `event` on behalf of `id`. The sender of a
    /// [`message`](Self::message) receives `id` as the reply.
    pub fn clear_event(&mut self, id: ViewId, event: &mut Event) {
        self.reply_event(event, Payload::View(id));
    }

    /// Consume `event`, handing `reply` back to the sender of a
    /// [`message`](Self::message).
    pub fn reply_event(&mut self, event: &mut Event, reply: Payload) {
        event.clear();
        self.reply = reply;
    }

    /// Send `event` to `receiver` synchronously. Returns the reply of the
    /// handler that consumed it, or `None` if nobody did.
    pub fn message(&mut self, receiver: ViewId, event: Event) -> Option<Payload> {
        if !self.contains(receiver) {
            return None;
        }
        let mut event = event;
        let saved = std::mem::take(&mut self.reply);
        self.handle_event(receiver, &mut event);
        let reply = std::mem::replace(&mut self.reply, saved);
        event.is_nothing().then_some(reply)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use twin_core::event::{Event, KeyCode, KeyEvent, Payload};
    use twin_core::geometry::Rect;
    use twin_core::handle::ViewId;
    use twin_core::source::ScriptedSource;
    use twin_render::driver::HeadlessDriver;

    use crate::behavior::ViewBehavior;
    use crate::flags::Options;
    use crate::ui::{Plain, Ui};

    type Log = Rc<RefCell<Vec<&'static str>>>;

    struct Recorder {
        name: &'static str,
        log: Log,
        consume: bool,
    }

    impl ViewBehavior for Recorder {
        fn handle_event(&mut self, ui: &mut Ui, id: ViewId, event: &mut Event) {
            ui.handle_event_default(id, event);
            if event.is_nothing() {
                return;
            }
            self.log.borrow_mut().push(self.name);
            if self.consume {
                ui.clear_event(id, event);
            }
        }
    }

    fn recorder(name: &'static str, log: &Log, consume: bool) -> Recorder {
        Recorder {
            name,
            log: Rc::clone(log),
            consume,
        }
    }

    fn ui() -> Ui {
        Ui::new(HeadlessDriver::new(20, 10), ScriptedSource::new())
    }

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c)))
    }

    #[test]
    fn focused_events_run_pre_current_post() {
        let mut ui = ui();
        let root = ui.root();
        let log: Log = Rc::default();
        let pre = ui.add_view(Rect::new(0, 0, 1, 1), recorder("pre", &log, false));
        let cur = ui.add_view(Rect::new(1, 0, 2, 1), recorder("current", &log, false));
        let post = ui.add_view(Rect::new(2, 0, 3, 1), recorder("post", &log, false));
        ui.set_option(pre, Options::PRE_PROCESS, true);
        ui.set_option(post, Options::POST_PROCESS, true);
        ui.set_option(cur, Options::SELECTABLE, true);
        ui.insert(root, post);
        ui.insert(root, pre);
        ui.insert(root, cur);
        assert_eq!(ui.current(root), Some(cur));

        let mut ev = key('a');
        ui.handle_event(root, &mut ev);
        assert_eq!(*log.borrow(), vec!["pre", "current", "post"]);
    }

    #[test]
    fn consumed_focused_event_stops() {
        let mut ui = ui();
        let root = ui.root();
        let log: Log = Rc::default();
        let pre = ui.add_view(Rect::new(0, 0, 1, 1), recorder("pre", &log, true));
        let post = ui.add_view(Rect::new(2, 0, 3, 1), recorder("post", &log, false));
        ui.set_option(pre, Options::PRE_PROCESS, true);
        ui.set_option(post, Options::POST_PROCESS, true);
        ui.insert(root, post);
        ui.insert(root, pre);

        let mut ev = key('a');
        ui.handle_event(root, &mut ev);
        assert!(ev.is_nothing());
        assert_eq!(*log.borrow(), vec!["pre"]);
    }

    #[test]
    fn disabled_views_miss_focused_events_but_see_broadcasts() {
        let mut ui = ui();
        let root = ui.root();
        let log: Log = Rc::default();
        let v = ui.add_view(Rect::new(0, 0, 1, 1), recorder("v", &log, false));
        ui.set_option(v, Options::PRE_PROCESS, true);
        ui.set_event_mask(v, twin_core::event::EventMask::all());
        ui.insert(root, v);
        ui.set_disabled(v, true);

        let mut ev = key('a');
        ui.handle_event(root, &mut ev);
        assert!(log.borrow().is_empty());

        let mut ev = Event::broadcast(twin_core::command::USER);
        ui.handle_event(root, &mut ev);
        assert_eq!(*log.borrow(), vec!["v"]);
    }

    #[test]
    fn event_mask_filters_delivery() {
        let mut ui = ui();
        let root = ui.root();
        let log: Log = Rc::default();
        let v = ui.add_view(Rect::new(0, 0, 1, 1), recorder("v", &log, false));
        ui.insert(root, v);
        // Default mask has no broadcasts.
        let mut ev = Event::broadcast(twin_core::command::USER);
        ui.handle_event(root, &mut ev);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn message_returns_consumer_reply() {
        let mut ui = ui();
        let root = ui.root();
        let log: Log = Rc::default();
        let v = ui.add_view(Rect::new(0, 0, 1, 1), recorder("v", &log, true));
        ui.set_event_mask(v, twin_core::event::EventMask::all());
        ui.insert(root, v);

        let reply = ui.message(root, Event::broadcast(twin_core::command::USER));
        assert_eq!(reply, Some(Payload::View(v)));

        let nobody = ui.add_view(Rect::new(0, 0, 1, 1), Plain);
        let reply = ui.message(nobody, Event::command(twin_core::command::USER));
        assert_eq!(reply, None);
    }
}
