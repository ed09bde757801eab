//! Idle detection with a delayed, smoothly ramping transition level
//!
//! The tracker charges while the head is still and discharges five times as
//! fast while it moves. The transition level only starts rising once the
//! charge is past the point where half a second of movement would no longer
//! bring it back down to zero, so brief stillness never registers as idle.

use tracing::debug;

use crate::timer::ChargingTimer;

/// Movement needed to go from the start of the idle ramp back to fully active
pub const ACTIVE_TIME_SECONDS: f64 = 0.5;
/// Stillness needed to become fully idle
pub const IDLE_TIME_SECONDS: f64 = 20.0;
pub const ACTIVE_TO_IDLE_FACTOR: f32 = 5.0;
/// Returning to fully active this soon after being idle starts over from zero
pub const RECENTLY_IDLE_TIME_SECONDS: f64 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct IdleTracker {
    timer: ChargingTimer,
    /// Sum of elapsed time fed to the tracker
    clock: f64,
    last_idle_at: Option<f64>,
}

impl Default for IdleTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl IdleTracker {
    /// Starts disabled; the first update enables it
    pub fn new() -> Self {
        Self {
            timer: ChargingTimer::new(IDLE_TIME_SECONDS)
                .with_cycle(false)
                .with_decay_factor(ACTIVE_TO_IDLE_FACTOR)
                .disabled(),
            clock: 0.0,
            last_idle_at: None,
        }
    }

    /// Charge below which the transition level stays at zero
    pub fn minimum_transition_threshold() -> f32 {
        1.0 - (ACTIVE_TIME_SECONDS * ACTIVE_TO_IDLE_FACTOR as f64 / IDLE_TIME_SECONDS) as f32
    }

    /// Feed one frame and return the new transition level
    pub fn update(&mut self, seconds_elapsed: f64, is_moving_fast: bool) -> f32 {
        self.timer.enabled = true;
        if seconds_elapsed.is_finite() && seconds_elapsed > 0.0 {
            self.clock += seconds_elapsed;
        }
        self.timer.update(seconds_elapsed, !is_moving_fast);

        if self.is_idle() {
            self.last_idle_at = Some(self.clock);
        } else if self.is_fully_active() && self.charge() > 0.0 {
            let recently_idle = self
                .last_idle_at
                .map_or(false, |at| self.clock - at < RECENTLY_IDLE_TIME_SECONDS);
            if recently_idle {
                debug!(charge = self.charge(), "back to active right after idle, restarting idle charge");
                self.timer.reset();
            }
        }

        self.idle_transition_level()
    }

    /// 0.0 while active, ramping to 1.0 when fully idle
    pub fn idle_transition_level(&self) -> f32 {
        if self.timer.is_full() {
            return 1.0;
        }
        let threshold = Self::minimum_transition_threshold();
        let charge = self.timer.charge();
        if charge <= threshold {
            0.0
        } else {
            (charge - threshold) / (1.0 - threshold)
        }
    }

    pub fn is_idle(&self) -> bool {
        self.idle_transition_level() >= 1.0
    }

    pub fn is_fully_active(&self) -> bool {
        self.idle_transition_level() <= 0.0
    }

    pub fn charge(&self) -> f32 {
        self.timer.charge()
    }

    /// Back to fully active (click, recalibration)
    pub fn reset(&mut self) {
        self.timer.reset();
    }
}
