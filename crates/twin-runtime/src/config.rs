#![forbid(unsafe_code)]

//! Program configuration.
//!
//! [`ProgramConfig`] gathers the knobs a program is started with. Defaults
//! suit a full-screen application; [`ProgramConfig::from_env`] lets a user
//! override the mouse timings without recompiling:
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `TWIN_DOUBLE_CLICK_MS` | multi-click window | 440 |
//! | `TWIN_REPEAT_DELAY_MS` | hold time before auto-repeat | 440 |
//! | `TWIN_AUTO_REPEAT_MS` | auto-repeat interval | 55 |
//! | `TWIN_NO_MOUSE` | disable mouse capture when set (non-empty, not `0`) | unset |

use std::time::Duration;

use twin_core::event_queue::MouseConfig;
use twin_core::geometry::Point;
use twin_tty::SessionOptions;
use twin_views::UiConfig;

/// Environment variable: multi-click window in milliseconds.
pub const ENV_DOUBLE_CLICK: &str = "TWIN_DOUBLE_CLICK_MS";
/// Environment variable: initial auto-repeat delay in milliseconds.
pub const ENV_REPEAT_DELAY: &str = "TWIN_REPEAT_DELAY_MS";
/// Environment variable: auto-repeat interval in milliseconds.
pub const ENV_AUTO_REPEAT: &str = "TWIN_AUTO_REPEAT_MS";
/// Environment variable: disable the mouse.
pub const ENV_NO_MOUSE: &str = "TWIN_NO_MOUSE";

/// Settings for a [`Program`](crate::Program).
#[derive(Debug, Clone)]
pub struct ProgramConfig {
    /// Mouse gesture timing.
    pub mouse: MouseConfig,
    /// Longest wait for input when no timer is due.
    pub idle_timeout: Duration,
    /// Drop shadow extent: columns right, rows below.
    pub shadow_size: Point,
    /// Capture the mouse.
    pub mouse_enabled: bool,
    /// Run on the alternate screen.
    pub alternate_screen: bool,
    /// Receive pastes as a burst of keys.
    pub bracketed_paste: bool,
    /// Fill character of the desktop behind all windows.
    pub desktop_pattern: char,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            mouse: MouseConfig::default(),
            idle_timeout: Duration::from_millis(100),
            shadow_size: Point::new(2, 1),
            mouse_enabled: true,
            alternate_screen: true,
            bracketed_paste: true,
            desktop_pattern: '░',
        }
    }
}

impl ProgramConfig {
    /// Defaults overridden from the process environment.
    pub fn from_env() -> Self {
        Self::default().with_env(|name| std::env::var(name).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its
    /// value. Unparseable values are logged and ignored.
    #[must_use]
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(d) = millis(&lookup, ENV_DOUBLE_CLICK) {
            self.mouse.double_click = d;
        }
        if let Some(d) = millis(&lookup, ENV_REPEAT_DELAY) {
            self.mouse.repeat_delay = d;
        }
        if let Some(d) = millis(&lookup, ENV_AUTO_REPEAT) {
            self.mouse.auto_repeat = d;
        }
        if let Some(v) = lookup(ENV_NO_MOUSE) {
            let v = v.trim();
            if !v.is_empty() && v != "0" {
                self.mouse_enabled = false;
            }
        }
        self
    }

    /// Set the multi-click window.
    #[must_use]
    pub fn with_double_click(mut self, delay: Duration) -> Self {
        self.mouse.double_click = delay;
        self
    }

    /// Set the hold time before the first auto-repeat.
    #[must_use]
    pub fn with_repeat_delay(mut self, delay: Duration) -> Self {
        self.mouse.repeat_delay = delay;
        self
    }

    /// Set the auto-repeat interval.
    #[must_use]
    pub fn with_auto_repeat(mut self, interval: Duration) -> Self {
        self.mouse.auto_repeat = interval;
        self
    }

    /// Set the idle wait.
    #[must_use]
    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Set the drop shadow extent.
    #[must_use]
    pub fn with_shadow_size(mut self, cols: i16, rows: i16) -> Self {
        self.shadow_size = Point::new(cols.max(0), rows.max(0));
        self
    }

    /// Enable or disable mouse capture.
    #[must_use]
    pub fn with_mouse(mut self, enabled: bool) -> Self {
        self.mouse_enabled = enabled;
        self
    }

    /// Run on the alternate screen or in the main one.
    #[must_use]
    pub fn with_alternate_screen(mut self, enabled: bool) -> Self {
        self.alternate_screen = enabled;
        self
    }

    /// Set the desktop fill character.
    #[must_use]
    pub fn with_desktop_pattern(mut self, pattern: char) -> Self {
        self.desktop_pattern = pattern;
        self
    }

    /// The engine part of the configuration.
    pub fn ui_config(&self) -> UiConfig {
        UiConfig::default()
            .with_mouse(self.mouse)
            .with_shadow_size(self.shadow_size.x, self.shadow_size.y)
            .with_idle_timeout(self.idle_timeout)
    }

    /// The terminal modes to switch on.
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            alternate_screen: self.alternate_screen,
            mouse_capture: self.mouse_enabled,
            bracketed_paste: self.bracketed_paste,
        }
    }
}

fn millis(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<Duration> {
    let raw = lookup(name)?;
    match raw.trim().parse::<u64>() {
        Ok(ms) => Some(Duration::from_millis(ms)),
        Err(err) => {
            tracing::warn!(variable = name, value = %raw, %err, "ignoring invalid setting");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults() {
        let c = ProgramConfig::default();
        assert_eq!(c.mouse.double_click, Duration::from_millis(440));
        assert_eq!(c.mouse.repeat_delay, Duration::from_millis(440));
        assert_eq!(c.mouse.auto_repeat, Duration::from_millis(55));
        assert_eq!(c.idle_timeout, Duration::from_millis(100));
        assert_eq!(c.shadow_size, Point::new(2, 1));
        assert!(c.mouse_enabled);
        assert!(c.alternate_screen);
    }

    #[test]
    fn environment_overrides_timings() {
        let c = ProgramConfig::default().with_env(env(&[
            (ENV_DOUBLE_CLICK, "300"),
            (ENV_REPEAT_DELAY, " 500 "),
            (ENV_AUTO_REPEAT, "40"),
        ]));
        assert_eq!(c.mouse.double_click, Duration::from_millis(300));
        assert_eq!(c.mouse.repeat_delay, Duration::from_millis(500));
        assert_eq!(c.mouse.auto_repeat, Duration::from_millis(40));
        assert!(c.mouse_enabled);
    }

    #[test]
    fn invalid_values_keep_defaults() {
        let c = ProgramConfig::default().with_env(env(&[(ENV_DOUBLE_CLICK, "fast")]));
        assert_eq!(c.mouse.double_click, Duration::from_millis(440));
    }

    #[test]
    fn no_mouse_flag() {
        let off = ProgramConfig::default().with_env(env(&[(ENV_NO_MOUSE, "1")]));
        assert!(!off.mouse_enabled);
        assert!(!off.session_options().mouse_capture);
        let zero = ProgramConfig::default().with_env(env(&[(ENV_NO_MOUSE, "0")]));
        assert!(zero.mouse_enabled);
    }

    #[test]
    fn ui_config_carries_engine_settings() {
        let c = ProgramConfig::default()
            .with_shadow_size(1, 1)
            .with_idle_timeout(Duration::from_millis(20))
            .with_auto_repeat(Duration::from_millis(30));
        let ui = c.ui_config();
        assert_eq!(ui.shadow_size, Point::new(1, 1));
        assert_eq!(ui.idle_timeout, Duration::from_millis(20));
        assert_eq!(ui.mouse.auto_repeat, Duration::from_millis(30));
    }
}
