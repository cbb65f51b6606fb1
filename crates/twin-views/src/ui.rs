#![forbid(unsafe_code)]

//! The view arena and engine context.
//!
//! [`Ui`] owns every view, the screen driver, the event source, and the
//! process-wide state a text UI needs (enabled commands, clipboard, timers,
//! the modal stack). There is exactly one `Ui` per event pump; tests build a
//! fresh one over a [`HeadlessDriver`](twin_render::driver::HeadlessDriver)
//! and a [`ScriptedSource`](twin_core::source::ScriptedSource).
//!
//! Views are addressed by generational [`ViewId`]s. The owner of a view is
//! a handle lookup, never a reference, and a stale handle resolves to
//! nothing.

use std::io;
use std::time::{Duration, Instant};

use smallvec::SmallVec;
use twin_core::command::{Command, CommandSet};
use twin_core::event::{Event, EventMask, Payload};
use twin_core::event_queue::{EventQueue, MouseConfig};
use twin_core::geometry::{Point, Rect};
use twin_core::handle::ViewId;
use twin_core::source::EventSource;
use twin_render::buffer::CellBuffer;
use twin_render::cell::Attr;
use twin_render::driver::ScreenDriver;
use twin_render::palette::{Palette, map_color};

use crate::behavior::ViewBehavior;
use crate::flags::{GrowMode, Options, StateFlags};
use crate::modal::ModalPhase;
use crate::timer::TimerQueue;
use crate::widgets::APP_PALETTE;

/// Engine settings.
#[derive(Debug, Clone)]
pub struct UiConfig {
    /// Mouse gesture timing.
    pub mouse: MouseConfig,
    /// Extent of drop shadows: columns to the right, rows below.
    pub shadow_size: Point,
    /// Longest wait for input when no timer is due.
    pub idle_timeout: Duration,
    /// The root palette; its entries are final attributes.
    pub palette: Palette,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            mouse: MouseConfig::default(),
            shadow_size: Point::new(2, 1),
            idle_timeout: Duration::from_millis(100),
            palette: Palette::from_static(APP_PALETTE),
        }
    }
}

impl UiConfig {
    /// Set mouse timing.
    #[must_use]
    pub fn with_mouse(mut self, mouse: MouseConfig) -> Self {
        self.mouse = mouse;
        self
    }

    /// Set the drop shadow extent.
    #[must_use]
    pub fn with_shadow_size(mut self, cols: i16, rows: i16) -> Self {
        self.shadow_size = Point::new(cols.max(0), rows.max(0));
        self
    }

    /// Set the idle wait.
    #[must_use]
    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Set the root palette.
    #[must_use]
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }
}

/// Which pass of focused-event dispatch a group is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Delivering to the current child (and for all non-focused events).
    #[default]
    Focused,
    /// Delivering to children with [`Options::PRE_PROCESS`].
    PreProcess,
    /// Delivering to children with [`Options::POST_PROCESS`].
    PostProcess,
}

/// A behaviour with every default: plain views fill their extent, plain
/// groups draw their children.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plain;

impl ViewBehavior for Plain {}

pub(crate) struct GroupData {
    /// Frontmost child; `last.next` is the backmost.
    pub last: Option<ViewId>,
    pub current: Option<ViewId>,
    pub clip: Rect,
    pub buffer: Option<CellBuffer>,
    pub lock: u16,
    pub phase: Phase,
}

impl GroupData {
    fn new(size: Point) -> Self {
        Self {
            last: None,
            current: None,
            clip: Rect::from_size(size.x, size.y),
            buffer: None,
            lock: 0,
            phase: Phase::Focused,
        }
    }
}

pub(crate) struct Node {
    pub origin: Point,
    pub size: Point,
    pub state: StateFlags,
    pub options: Options,
    pub grow_mode: GrowMode,
    pub help_ctx: u16,
    pub cursor: Point,
    pub event_mask: EventMask,
    pub owner: Option<ViewId>,
    pub next: Option<ViewId>,
    pub group: Option<GroupData>,
    pub behavior: Option<Box<dyn ViewBehavior>>,
    pub palette: Palette,
    pub end_state: Command,
    pub phase: ModalPhase,
    /// A draw was requested while the behaviour was detached.
    pub draw_pending: bool,
    /// State changes requested while the behaviour was detached, replayed
    /// through it once it is back.
    pub state_pending: SmallVec<[(StateFlags, bool); 2]>,
}

impl Node {
    fn new(bounds: Rect, group: bool, behavior: Box<dyn ViewBehavior>) -> Self {
        let size = bounds.size();
        Self {
            origin: bounds.a,
            size,
            state: StateFlags::default(),
            options: Options::empty(),
            grow_mode: GrowMode::empty(),
            help_ctx: 0,
            cursor: Point::ZERO,
            event_mask: if group { EventMask::all() } else { EventMask::default() },
            owner: None,
            next: None,
            group: group.then(|| GroupData::new(size)),
            palette: behavior.palette(),
            behavior: Some(behavior),
            end_state: 0,
            phase: ModalPhase::NotRunning,
            draw_pending: false,
            state_pending: SmallVec::new(),
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.origin, self.size)
    }

    pub fn extent(&self) -> Rect {
        Rect::from_size(self.size.x, self.size.y)
    }
}

struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// The engine context: view arena, devices, and process-wide UI state.
pub struct Ui {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: ViewId,
    pub(crate) driver: Box<dyn ScreenDriver>,
    pub(crate) source: Box<dyn EventSource>,
    pub(crate) queue: EventQueue,
    pub(crate) put_back: Option<Event>,
    pub(crate) modal_stack: Vec<ViewId>,
    pub(crate) timers: TimerQueue,
    pub(crate) reply: Payload,
    commands: CommandSet,
    commands_changed: bool,
    clipboard: String,
    config: UiConfig,
    clock: Box<dyn Fn() -> Instant>,
}

impl Ui {
    /// Create an engine with default settings.
    pub fn new(
        driver: impl ScreenDriver + 'static,
        source: impl EventSource + 'static,
    ) -> Self {
        Self::with_config(driver, source, UiConfig::default())
    }

    /// Create an engine. The root group covers the driver's screen.
    pub fn with_config(
        driver: impl ScreenDriver + 'static,
        source: impl EventSource + 'static,
        config: UiConfig,
    ) -> Self {
        let (cols, rows) = driver.size();
        let mut ui = Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: ViewId::new(0, 0),
            driver: Box::new(driver),
            source: Box::new(source),
            queue: EventQueue::new(config.mouse),
            put_back: None,
            modal_stack: Vec::new(),
            timers: TimerQueue::default(),
            reply: Payload::None,
            commands: CommandSet::initial(),
            commands_changed: false,
            clipboard: String::new(),
            config,
            clock: Box::new(Instant::now),
        };
        let bounds = Rect::from_size(clamp_dim(cols), clamp_dim(rows));
        let mut root = Node::new(bounds, true, Box::new(Plain));
        root.palette = ui.config.palette.clone();
        root.state = StateFlags::VISIBLE
            | StateFlags::SELECTED
            | StateFlags::FOCUSED
            | StateFlags::MODAL
            | StateFlags::EXPOSED;
        root.options = Options::SELECTABLE;
        ui.root = ui.alloc(root);
        tracing::debug!(cols, rows, "ui created");
        ui
    }

    // ── Arena ───────────────────────────────────────────────────────────

    fn alloc(&mut self, node: Node) -> ViewId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            ViewId::new(index, slot.generation)
        } else {
            let index = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            ViewId::new(index, 0)
        }
    }

    pub(crate) fn release(&mut self, id: ViewId) -> Option<Node> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.generation != id.generation() {
            return None;
        }
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index() as u32);
        Some(node)
    }

    pub(crate) fn node(&self, id: ViewId) -> Option<&Node> {
        let slot = self.slots.get(id.index())?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.node.as_ref()
    }

    pub(crate) fn node_mut(&mut self, id: ViewId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.node.as_mut()
    }

    pub(crate) fn group(&self, id: ViewId) -> Option<&GroupData> {
        self.node(id)?.group.as_ref()
    }

    pub(crate) fn group_mut(&mut self, id: ViewId) -> Option<&mut GroupData> {
        self.node_mut(id)?.group.as_mut()
    }

    /// Create a detached view.
    pub fn add_view(&mut self, bounds: Rect, behavior: impl ViewBehavior + 'static) -> ViewId {
        self.alloc(Node::new(bounds, false, Box::new(behavior)))
    }

    /// Create a detached group.
    pub fn add_group(&mut self, bounds: Rect, behavior: impl ViewBehavior + 'static) -> ViewId {
        self.alloc(Node::new(bounds, true, Box::new(behavior)))
    }

    /// Replace a view's behaviour. The palette is re-read.
    pub fn set_behavior(&mut self, id: ViewId, behavior: Box<dyn ViewBehavior>) {
        if let Some(node) = self.node_mut(id) {
            node.palette = behavior.palette();
            node.behavior = Some(behavior);
        }
    }

    /// Whether `id` refers to a live view.
    #[must_use]
    pub fn contains(&self, id: ViewId) -> bool {
        self.node(id).is_some()
    }

    /// Number of live views, the root included.
    #[must_use]
    pub fn view_count(&self) -> usize {
        self.slots.iter().filter(|s| s.node.is_some()).count()
    }

    /// The root group; it covers the whole screen.
    #[must_use]
    pub fn root(&self) -> ViewId {
        self.root
    }

    /// Run `f` with the view's behaviour detached from its node. Returns
    /// `None` if the view is gone or its behaviour is already running.
    pub(crate) fn with_behavior<R>(
        &mut self,
        id: ViewId,
        f: impl FnOnce(&mut dyn ViewBehavior, &mut Ui) -> R,
    ) -> Option<R> {
        let mut behavior = self.node_mut(id)?.behavior.take()?;
        let out = f(behavior.as_mut(), self);
        let mut pending = SmallVec::<[(StateFlags, bool); 2]>::new();
        if let Some(node) = self.node_mut(id) {
            if node.behavior.is_none() {
                node.behavior = Some(behavior);
            }
            pending = std::mem::take(&mut node.state_pending);
        }
        for (flags, enable) in pending {
            self.set_state(id, flags, enable);
        }
        let redraw = self
            .node_mut(id)
            .is_some_and(|node| std::mem::take(&mut node.draw_pending));
        if redraw {
            self.draw_view(id);
        }
        Some(out)
    }

    // ── Overridable operations ─────────────────────────────────────────

    /// Paint a view (without the exposure check; see
    /// [`draw_view`](Self::draw_view)).
    ///
    /// While one of the view's own methods is running the draw is deferred
    /// until that method returns.
    pub fn draw(&mut self, id: ViewId) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        if node.behavior.is_none() {
            node.draw_pending = true;
            return;
        }
        self.with_behavior(id, |b, ui| b.draw(ui, id));
    }

    /// Deliver an event to one view.
    pub fn handle_event(&mut self, id: ViewId, event: &mut Event) {
        if self
            .with_behavior(id, |b, ui| b.handle_event(ui, id, event))
            .is_none()
        {
            self.handle_event_default(id, event);
        }
    }

    /// Ask a view whether it accepts `command`.
    pub fn valid(&mut self, id: ViewId, command: Command) -> bool {
        match self.with_behavior(id, |b, ui| b.valid(ui, id, command)) {
            Some(ok) => ok,
            None => self.valid_default(id, command),
        }
    }

    /// Set or clear state bits, with side effects.
    ///
    /// While one of the view's own methods is running the bits change at
    /// once, but the side effects (and the view's override) run when that
    /// method returns.
    pub fn set_state(&mut self, id: ViewId, flags: StateFlags, enable: bool) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        if node.behavior.is_none() {
            node.state.set(flags, enable);
            node.state_pending.push((flags, enable));
            return;
        }
        if self
            .with_behavior(id, |b, ui| b.set_state(ui, id, flags, enable))
            .is_none()
        {
            self.set_state_default(id, flags, enable);
        }
    }

    /// Move or resize a view (owner coordinates) and redraw it.
    pub fn change_bounds(&mut self, id: ViewId, bounds: Rect) {
        if self
            .with_behavior(id, |b, ui| b.change_bounds(ui, id, bounds))
            .is_none()
        {
            self.change_bounds_default(id, bounds);
        }
    }

    /// Minimum and maximum size of a view.
    #[must_use]
    pub fn size_limits(&self, id: ViewId) -> (Point, Point) {
        match self.node(id).and_then(|n| n.behavior.as_deref()) {
            Some(b) => b.size_limits(self, id),
            None => self.size_limits_default(id),
        }
    }

    /// Size of the view's data record.
    #[must_use]
    pub fn data_size(&self, id: ViewId) -> usize {
        match self.node(id).and_then(|n| n.behavior.as_deref()) {
            Some(b) => b.data_size(self, id),
            None => self.data_size_default(id),
        }
    }

    /// Append the view's data record to `out`.
    pub fn get_data(&self, id: ViewId, out: &mut Vec<u8>) {
        match self.node(id).and_then(|n| n.behavior.as_deref()) {
            Some(b) => b.get_data(self, id, out),
            None => self.get_data_default(id, out),
        }
    }

    /// Load the view's data record; returns the bytes consumed.
    pub fn set_data(&mut self, id: ViewId, data: &[u8]) -> usize {
        match self.with_behavior(id, |b, ui| b.set_data(ui, id, data)) {
            Some(n) => n,
            None => self.set_data_default(id, data),
        }
    }

    /// Default limits: nothing below zero, nothing larger than the owner.
    #[must_use]
    pub fn size_limits_default(&self, id: ViewId) -> (Point, Point) {
        let max = self
            .owner(id)
            .and_then(|o| self.node(o))
            .map_or(Point::new(i16::MAX, i16::MAX), |o| o.size);
        (Point::ZERO, max)
    }

    /// Default validation: plain views accept everything; groups ask the
    /// current child when focus is leaving, and every child otherwise.
    pub fn valid_default(&mut self, id: ViewId, command: Command) -> bool {
        if !self.is_group(id) {
            return true;
        }
        if command == twin_core::command::RELEASED_FOCUS {
            return match self.current(id) {
                Some(cur) if self.options(cur).contains(Options::VALIDATE) => {
                    self.valid(cur, command)
                }
                _ => true,
            };
        }
        let children = self.children_front_to_back(id);
        children.into_iter().all(|child| self.valid(child, command))
    }

    /// Default record size: the sum of the children's.
    #[must_use]
    pub fn data_size_default(&self, id: ViewId) -> usize {
        self.children_back_to_front(id)
            .into_iter()
            .map(|c| self.data_size(c))
            .sum()
    }

    /// Default record: the children's records, back to front.
    pub fn get_data_default(&self, id: ViewId, out: &mut Vec<u8>) {
        for child in self.children_back_to_front(id) {
            self.get_data(child, out);
        }
    }

    /// Default load: feed the children back to front.
    pub fn set_data_default(&mut self, id: ViewId, data: &[u8]) -> usize {
        let mut used = 0;
        for child in self.children_back_to_front(id) {
            let rest = data.get(used..).unwrap_or(&[]);
            used += self.set_data(child, rest);
        }
        used
    }

    // ── Accessors ──────────────────────────────────────────────────────

    /// State bits.
    #[must_use]
    pub fn state(&self, id: ViewId) -> StateFlags {
        self.node(id).map_or(StateFlags::empty(), |n| n.state)
    }

    /// Whether all of `flags` are set.
    #[must_use]
    pub fn get_state(&self, id: ViewId, flags: StateFlags) -> bool {
        self.state(id).contains(flags)
    }

    /// Option bits.
    #[must_use]
    pub fn options(&self, id: ViewId) -> Options {
        self.node(id).map_or(Options::empty(), |n| n.options)
    }

    /// Replace the option bits.
    pub fn set_options(&mut self, id: ViewId, options: Options) {
        if let Some(n) = self.node_mut(id) {
            n.options = options;
        }
    }

    /// Set or clear some option bits.
    pub fn set_option(&mut self, id: ViewId, options: Options, enable: bool) {
        if let Some(n) = self.node_mut(id) {
            n.options.set(options, enable);
        }
    }

    /// Grow mode.
    #[must_use]
    pub fn grow_mode(&self, id: ViewId) -> GrowMode {
        self.node(id).map_or(GrowMode::empty(), |n| n.grow_mode)
    }

    /// Set the grow mode.
    pub fn set_grow_mode(&mut self, id: ViewId, mode: GrowMode) {
        if let Some(n) = self.node_mut(id) {
            n.grow_mode = mode;
        }
    }

    /// Help context id.
    #[must_use]
    pub fn help_ctx(&self, id: ViewId) -> u16 {
        self.node(id).map_or(0, |n| n.help_ctx)
    }

    /// Set the help context id.
    pub fn set_help_ctx(&mut self, id: ViewId, ctx: u16) {
        if let Some(n) = self.node_mut(id) {
            n.help_ctx = ctx;
        }
    }

    /// Event classes the view accepts.
    #[must_use]
    pub fn event_mask(&self, id: ViewId) -> EventMask {
        self.node(id).map_or(EventMask::empty(), |n| n.event_mask)
    }

    /// Set the event classes the view accepts.
    pub fn set_event_mask(&mut self, id: ViewId, mask: EventMask) {
        if let Some(n) = self.node_mut(id) {
            n.event_mask = mask;
        }
    }

    /// Origin in owner coordinates.
    #[must_use]
    pub fn origin(&self, id: ViewId) -> Point {
        self.node(id).map_or(Point::ZERO, |n| n.origin)
    }

    /// Size.
    #[must_use]
    pub fn size(&self, id: ViewId) -> Point {
        self.node(id).map_or(Point::ZERO, |n| n.size)
    }

    /// Bounds in owner coordinates.
    #[must_use]
    pub fn bounds(&self, id: ViewId) -> Rect {
        self.node(id).map_or(Rect::default(), Node::bounds)
    }

    /// Bounds in local coordinates (origin at zero).
    #[must_use]
    pub fn extent(&self, id: ViewId) -> Rect {
        self.node(id).map_or(Rect::default(), Node::extent)
    }

    /// Owning group, if inserted.
    #[must_use]
    pub fn owner(&self, id: ViewId) -> Option<ViewId> {
        self.node(id)?.owner
    }

    /// Next sibling in back-to-front order (wrapping).
    #[must_use]
    pub fn next(&self, id: ViewId) -> Option<ViewId> {
        self.node(id)?.next
    }

    /// Whether the view was created as a group.
    #[must_use]
    pub fn is_group(&self, id: ViewId) -> bool {
        self.group(id).is_some()
    }

    /// Frontmost child of a group.
    #[must_use]
    pub fn last(&self, group: ViewId) -> Option<ViewId> {
        self.group(group)?.last
    }

    /// Focused child of a group.
    #[must_use]
    pub fn current(&self, group: ViewId) -> Option<ViewId> {
        self.group(group)?.current
    }

    /// Group-local clip rectangle.
    #[must_use]
    pub fn clip(&self, group: ViewId) -> Rect {
        self.group(group).map_or(Rect::default(), |g| g.clip)
    }

    /// Lock depth of a group.
    #[must_use]
    pub fn lock_count(&self, group: ViewId) -> u16 {
        self.group(group).map_or(0, |g| g.lock)
    }

    /// Whether a group currently holds a back-buffer.
    #[must_use]
    pub fn has_buffer(&self, group: ViewId) -> bool {
        self.group(group).is_some_and(|g| g.buffer.is_some())
    }

    /// A group's back-buffer.
    #[must_use]
    pub fn buffer(&self, group: ViewId) -> Option<&CellBuffer> {
        self.group(group)?.buffer.as_ref()
    }

    /// The dispatch pass a group is in.
    #[must_use]
    pub fn phase(&self, group: ViewId) -> Phase {
        self.group(group).map_or(Phase::Focused, |g| g.phase)
    }

    /// Cursor position, view-local.
    #[must_use]
    pub fn cursor(&self, id: ViewId) -> Point {
        self.node(id).map_or(Point::ZERO, |n| n.cursor)
    }

    // ── Coordinates ────────────────────────────────────────────────────

    /// Convert a view-local point to screen coordinates.
    #[must_use]
    pub fn make_global(&self, id: ViewId, p: Point) -> Point {
        let mut out = p;
        let mut at = Some(id);
        while let Some(v) = at {
            let Some(n) = self.node(v) else { break };
            out += n.origin;
            at = n.owner;
        }
        out
    }

    /// Convert a screen point to view-local coordinates.
    #[must_use]
    pub fn make_local(&self, id: ViewId, p: Point) -> Point {
        p - self.make_global(id, Point::ZERO)
    }

    /// Whether a screen point lies inside the view.
    #[must_use]
    pub fn mouse_in_view(&self, id: ViewId, p: Point) -> bool {
        self.extent(id).contains(self.make_local(id, p))
    }

    // ── Colours ────────────────────────────────────────────────────────

    /// Resolve a palette index through the view and all its owners.
    #[must_use]
    pub fn map_color(&self, id: ViewId, index: u8) -> Attr {
        let chain = std::iter::successors(self.node(id), |n| n.owner.and_then(|o| self.node(o)))
            .map(|n| &n.palette);
        map_color(index, chain)
    }

    // ── Commands ───────────────────────────────────────────────────────

    /// Whether `cmd` is enabled.
    #[must_use]
    pub fn command_enabled(&self, cmd: Command) -> bool {
        self.commands.has(cmd)
    }

    /// The enabled-command set.
    #[must_use]
    pub fn commands(&self) -> CommandSet {
        self.commands
    }

    /// Replace the enabled-command set.
    pub fn set_commands(&mut self, set: CommandSet) {
        self.update_commands(|c| *c = set);
    }

    /// Enable one command.
    pub fn enable_command(&mut self, cmd: Command) {
        self.update_commands(|c| c.enable_cmd(cmd));
    }

    /// Disable one command.
    pub fn disable_command(&mut self, cmd: Command) {
        self.update_commands(|c| c.disable_cmd(cmd));
    }

    /// Enable every command in `set`.
    pub fn enable_commands(&mut self, set: &CommandSet) {
        self.update_commands(|c| c.enable(set));
    }

    /// Disable every command in `set`.
    pub fn disable_commands(&mut self, set: &CommandSet) {
        self.update_commands(|c| c.disable(set));
    }

    fn update_commands(&mut self, f: impl FnOnce(&mut CommandSet)) {
        let before = self.commands;
        f(&mut self.commands);
        if self.commands != before {
            self.commands_changed = true;
        }
    }

    pub(crate) fn take_commands_changed(&mut self) -> bool {
        std::mem::take(&mut self.commands_changed)
    }

    // ── Context ────────────────────────────────────────────────────────

    /// Engine settings.
    #[must_use]
    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    /// Drop shadow extent.
    #[must_use]
    pub fn shadow_size(&self) -> Point {
        self.config.shadow_size
    }

    /// Clipboard text.
    #[must_use]
    pub fn clipboard(&self) -> &str {
        &self.clipboard
    }

    /// Replace the clipboard text.
    pub fn set_clipboard(&mut self, text: impl Into<String>) {
        self.clipboard = text.into();
    }

    /// Replace the time source used for gestures and timers.
    pub fn set_clock(&mut self, clock: impl Fn() -> Instant + 'static) {
        self.clock = Box::new(clock);
    }

    /// Current time according to the engine clock.
    #[must_use]
    pub fn now(&self) -> Instant {
        (self.clock)()
    }

    /// The screen driver.
    pub fn driver_mut(&mut self) -> &mut dyn ScreenDriver {
        self.driver.as_mut()
    }

    /// The event source.
    pub fn source_mut(&mut self) -> &mut dyn EventSource {
        self.source.as_mut()
    }

    /// Release the terminal: suspend the driver and the source.
    pub fn suspend(&mut self) -> io::Result<()> {
        tracing::debug!("suspending");
        self.source.suspend()?;
        self.driver.suspend()?;
        self.queue.mouse_mut().reset();
        Ok(())
    }

    /// Reacquire the terminal and repaint everything.
    pub fn resume(&mut self) -> io::Result<()> {
        tracing::debug!("resuming");
        self.driver.resume()?;
        self.source.resume()?;
        self.redraw_screen();
        Ok(())
    }

    /// Clear the screen and redraw the whole tree.
    pub fn redraw_screen(&mut self) {
        self.driver.clear_screen();
        let root = self.root;
        self.draw_view(root);
    }
}

pub(crate) fn clamp_dim(v: u16) -> i16 {
    i16::try_from(v).unwrap_or(i16::MAX)
}
