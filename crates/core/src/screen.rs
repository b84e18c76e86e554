//! Screen control panel model: brightness, fullscreen, lock and an action log.

use crate::{
    history::{BoundedHistory, SCREEN_ACTION_CAPACITY},
    interpreter::{Clock, format_time},
};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

pub const MIN_BRIGHTNESS: u8 = 20;
pub const MAX_BRIGHTNESS: u8 = 100;

#[derive(Debug, Clone, Serialize)]
pub struct ScreenStatus {
    pub brightness: u8,
    pub fullscreen: bool,
    pub locked: bool,
    pub actions: BoundedHistory<String>,
}

pub struct ScreenControl {
    brightness: u8,
    fullscreen: bool,
    locked: bool,
    actions: BoundedHistory<String>,
    clock: Arc<dyn Clock>,
}

impl ScreenControl {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            brightness: MAX_BRIGHTNESS,
            fullscreen: false,
            locked: false,
            actions: BoundedHistory::new(SCREEN_ACTION_CAPACITY),
            clock,
        }
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn actions(&self) -> &BoundedHistory<String> {
        &self.actions
    }

    pub fn status(&self) -> ScreenStatus {
        ScreenStatus {
            brightness: self.brightness,
            fullscreen: self.fullscreen,
            locked: self.locked,
            actions: self.actions.clone(),
        }
    }

    pub fn toggle_fullscreen(&mut self) -> bool {
        self.fullscreen = !self.fullscreen;
        self.log(if self.fullscreen {
            "Entered fullscreen mode"
        } else {
            "Exited fullscreen mode"
        });
        self.fullscreen
    }

    /// Sets brightness, clamped to the supported range. Returns the applied value.
    pub fn set_brightness(&mut self, value: i64) -> u8 {
        let clamped = value.clamp(MIN_BRIGHTNESS as i64, MAX_BRIGHTNESS as i64) as u8;
        self.brightness = clamped;
        self.log(&format!("Brightness adjusted to {clamped}%"));
        clamped
    }

    pub fn toggle_lock(&mut self) -> bool {
        self.locked = !self.locked;
        self.log(if self.locked {
            "Screen locked"
        } else {
            "Screen unlocked"
        });
        self.locked
    }

    pub fn refresh(&mut self) {
        self.log("Screen refreshed");
    }

    /// Restores full brightness.
    pub fn optimize(&mut self) {
        self.set_brightness(MAX_BRIGHTNESS as i64);
        self.log("Performance mode activated");
    }

    fn log(&mut self, action: &str) {
        info!(action, "Screen action");
        let entry = format!("{}: {}", format_time(&self.clock.now()), action);
        self.actions.push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::MockClock;
    use chrono::{Local, TimeZone};

    fn screen() -> ScreenControl {
        let mut clock = MockClock::new();
        clock
            .expect_now()
            .returning(|| Local.with_ymd_and_hms(2024, 2, 29, 9, 0, 0).unwrap());
        ScreenControl::new(Arc::new(clock))
    }

    #[test]
    fn test_initial_state() {
        let screen = screen();
        assert_eq!(screen.brightness(), 100);
        assert!(!screen.is_fullscreen());
        assert!(!screen.is_locked());
        assert!(screen.actions().is_empty());
    }

    #[test]
    fn test_toggles_log_their_actions() {
        let mut screen = screen();
        assert!(screen.toggle_fullscreen());
        assert!(!screen.toggle_fullscreen());
        assert!(screen.toggle_lock());
        assert!(!screen.toggle_lock());

        assert_eq!(
            screen.actions().to_vec(),
            vec![
                "09:00:00: Entered fullscreen mode",
                "09:00:00: Exited fullscreen mode",
                "09:00:00: Screen locked",
                "09:00:00: Screen unlocked",
            ]
        );
    }

    #[test]
    fn test_brightness_is_clamped() {
        let mut screen = screen();
        assert_eq!(screen.set_brightness(5), MIN_BRIGHTNESS);
        assert_eq!(screen.set_brightness(150), MAX_BRIGHTNESS);
        assert_eq!(screen.set_brightness(55), 55);
        assert_eq!(
            screen.actions().latest().unwrap(),
            "09:00:00: Brightness adjusted to 55%"
        );
    }

    #[test]
    fn test_optimize_restores_brightness() {
        let mut screen = screen();
        screen.set_brightness(30);
        screen.optimize();

        assert_eq!(screen.brightness(), 100);
        let actions = screen.actions().to_vec();
        assert_eq!(actions[1], "09:00:00: Brightness adjusted to 100%");
        assert_eq!(actions[2], "09:00:00: Performance mode activated");
    }

    #[test]
    fn test_action_log_keeps_last_eight() {
        let mut screen = screen();
        for _ in 0..12 {
            screen.refresh();
        }
        screen.toggle_lock();

        assert_eq!(screen.actions().len(), SCREEN_ACTION_CAPACITY);
        assert_eq!(screen.actions().latest().unwrap(), "09:00:00: Screen locked");
    }
}
