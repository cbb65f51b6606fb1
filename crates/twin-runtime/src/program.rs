#![forbid(unsafe_code)]

//! The program pump.
//!
//! A [`Program`] owns the [`Ui`], fills the root with a desktop, and runs
//! the root's modal loop until something ends it with [`QUIT`]. There is one
//! pump per process; nested dialogs run inside it through
//! [`Ui::exec_view`].
//!
//! The root understands a few application-wide keys and commands:
//!
//! | Input | Effect |
//! |-------|--------|
//! | Alt+X or [`QUIT`] | end the program (if every view agrees) |
//! | F6 / Shift+F6 | [`NEXT`] / [`PREV`] when enabled |
//! | Alt+1 … Alt+9 | [`SELECT_WINDOW_NUM`] broadcast |
//! | [`NEXT`] / [`PREV`] | cycle the selected window |

use std::io;

use twin_core::command::{Command, NEXT, PREV, QUIT, SELECT_WINDOW_NUM};
use twin_core::event::{Event, KeyCode, Message, Payload};
use twin_core::handle::ViewId;
use twin_core::source::EventSource;
use twin_render::driver::ScreenDriver;
use twin_render::palette::Palette;
use twin_tty::{CrosstermDriver, CrosstermEventSource, TerminalSession, Waker};
use twin_views::widgets::Background;
use twin_views::{Ui, ViewBehavior};

use crate::config::ProgramConfig;

/// Behaviour of the root group.
struct ProgramRoot {
    palette: Palette,
}

impl ProgramRoot {
    fn key_command(ui: &Ui, event: &Event) -> Option<Event> {
        let key = event.key()?;
        match key.code {
            KeyCode::Char('x' | 'X') if key.alt() => Some(Event::command(QUIT)),
            KeyCode::F(6) => {
                let cmd = if key.shift() { PREV } else { NEXT };
                ui.command_enabled(cmd).then(|| Event::command(cmd))
            }
            KeyCode::Char(c @ '1'..='9') if key.alt() => {
                let n = i64::from(c as u8 - b'0');
                Some(Event::Broadcast(
                    Message::new(SELECT_WINDOW_NUM).with_info(Payload::Int(n)),
                ))
            }
            _ => None,
        }
    }
}

impl ViewBehavior for ProgramRoot {
    fn palette(&self) -> Palette {
        self.palette.clone()
    }

    fn handle_event(&mut self, ui: &mut Ui, id: ViewId, event: &mut Event) {
        ui.handle_event_default(id, event);
        if let Some(mut translated) = Self::key_command(ui, event) {
            ui.clear_event(id, event);
            if matches!(translated, Event::Broadcast(_)) {
                ui.handle_event_default(id, &mut translated);
            } else {
                ui.put_event(translated);
            }
            return;
        }
        let Some(command) = event.message().map(|m| m.command) else {
            return;
        };
        if !matches!(event, Event::Command(_)) {
            return;
        }
        match command {
            QUIT => {
                ui.end_modal(id, QUIT);
                ui.clear_event(id, event);
            }
            NEXT | PREV => {
                ui.select_next(id, command == NEXT);
                ui.clear_event(id, event);
            }
            _ => {}
        }
    }
}

/// An application: the engine, its desktop, and (on a real terminal) the
/// session guard that restores the terminal on drop.
pub struct Program {
    ui: Ui,
    desktop: ViewId,
    waker: Option<Waker>,
    // Dropped after `ui`, so the last frame is flushed before the terminal
    // is restored.
    session: Option<TerminalSession>,
}

impl Program {
    /// Take over the terminal.
    ///
    /// # Errors
    ///
    /// Fails if the terminal cannot enter raw mode or report its size.
    pub fn new(config: ProgramConfig) -> io::Result<Self> {
        let session = TerminalSession::new(config.session_options())?;
        let driver = CrosstermDriver::stdout()?.with_alternate_screen(config.alternate_screen);
        let source = CrosstermEventSource::new(session.mouse_enabled());
        let waker = source.waker();
        let mut program = Self::with_backend(driver, source, &config);
        program.waker = Some(waker);
        program.session = Some(session);
        tracing::info!(?config, "program started");
        Ok(program)
    }

    /// Build over any driver and source (headless tests, recordings).
    pub fn with_backend(
        driver: impl ScreenDriver + 'static,
        source: impl EventSource + 'static,
        config: &ProgramConfig,
    ) -> Self {
        let mut ui = Ui::with_config(driver, source, config.ui_config());
        let root = ui.root();
        let palette = ui.config().palette.clone();
        ui.set_behavior(root, Box::new(ProgramRoot { palette }));
        let extent = ui.extent(root);
        let desktop = Background::create(&mut ui, extent, config.desktop_pattern);
        ui.insert(root, desktop);
        Self {
            ui,
            desktop,
            waker: None,
            session: None,
        }
    }

    /// The engine.
    pub fn ui(&self) -> &Ui {
        &self.ui
    }

    /// The engine, mutably: insert windows, set timers, run dialogs.
    pub fn ui_mut(&mut self) -> &mut Ui {
        &mut self.ui
    }

    /// The background view behind every window.
    pub fn desktop(&self) -> ViewId {
        self.desktop
    }

    /// A handle that interrupts the pump's wait for input from another
    /// thread. `None` for custom backends, whose source has its own.
    pub fn waker(&self) -> Option<Waker> {
        self.waker.clone()
    }

    /// Paint the screen and pump events until the root's loop ends.
    pub fn run(&mut self) -> Command {
        self.ui.redraw_screen();
        let root = self.ui.root();
        let result = self.ui.execute(root);
        if let Err(err) = self.ui.driver_mut().flush() {
            tracing::warn!(%err, "final flush failed");
        }
        tracing::info!(result, "program finished");
        result
    }

    /// Hand the terminal back, run `f`, then take it over again and
    /// repaint.
    ///
    /// # Errors
    ///
    /// Propagates failures to release or reacquire the terminal.
    pub fn suspended<T>(&mut self, f: impl FnOnce() -> T) -> io::Result<T> {
        self.ui.suspend()?;
        let out = f();
        self.ui.resume()?;
        Ok(out)
    }
}

impl std::fmt::Debug for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Program")
            .field("desktop", &self.desktop)
            .field("terminal", &self.session.is_some())
            .finish_non_exhaustive()
    }
}
