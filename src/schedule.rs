//! Single-slot debounce
//!
//! Holds at most one pending deadline. Each trigger replaces the previous
//! deadline, so a burst of triggers fires once, one window after the last.
//! Time is passed in as milliseconds (`js_sys::Date::now()` on the web) so
//! the slot itself never touches a clock.

use crate::consts::MAX_TIMER_DELAY_MS;

#[derive(Debug, Clone, PartialEq)]
pub struct Debounce {
    window_ms: f64,
    deadline: Option<f64>,
}

impl Debounce {
    pub fn new(window_ms: f64) -> Self {
        Self {
            window_ms: window_ms.clamp(0.0, MAX_TIMER_DELAY_MS),
            deadline: None,
        }
    }

    /// Arm (or re-arm) the slot; returns the new deadline
    pub fn trigger(&mut self, now: f64) -> f64 {
        let deadline = now + self.window_ms;
        self.deadline = Some(deadline);
        deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<f64> {
        self.deadline
    }

    /// Disarm and return true if the deadline has passed
    pub fn take_due(&mut self, now: f64) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}
