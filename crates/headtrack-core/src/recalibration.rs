//! Countdown while the user re-centres their head

use crate::timer::ChargingTimer;

pub const RECALIBRATION_COUNTDOWN_SECONDS: f64 = 3.0;

#[derive(Debug, Clone, PartialEq)]
pub struct RecalibrationCountdown {
    timer: ChargingTimer,
    running: bool,
}

impl Default for RecalibrationCountdown {
    fn default() -> Self {
        Self {
            timer: ChargingTimer::new(RECALIBRATION_COUNTDOWN_SECONDS).with_cycle(false),
            running: false,
        }
    }
}

impl RecalibrationCountdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting down. Returns false if a countdown is already running.
    pub fn begin(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.timer.reset();
        self.running = true;
        true
    }

    /// Advance the countdown; true on the update that finishes it
    pub fn update(&mut self, seconds_elapsed: f64) -> bool {
        if !self.running {
            return false;
        }
        self.timer.update(seconds_elapsed, true);
        if self.timer.is_full() {
            self.running = false;
            self.timer.reset();
            return true;
        }
        false
    }

    pub fn cancel(&mut self) {
        self.running = false;
        self.timer.reset();
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn remaining_seconds(&self) -> f64 {
        if !self.running {
            return 0.0;
        }
        (1.0 - self.timer.charge() as f64) * RECALIBRATION_COUNTDOWN_SECONDS
    }
}
