//! Saturating charge accumulator driven by elapsed time
//!
//! A [`ChargingTimer`] answers "has condition C held long enough?". Every
//! update adds `elapsed / duration` while the condition holds and removes
//! `elapsed / duration * decay_factor` while it does not, clamped to `[0, 1]`.
//! Time is always supplied by the caller; the timer never reads a clock.

/// Result of a single [`ChargingTimer::update`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChargeUpdate {
    /// Charge before the update
    pub previous: f32,
    /// Charge reached by the update, before any cycle reset
    pub current: f32,
    /// The update crossed from below full to full
    pub completed: bool,
}

impl ChargeUpdate {
    fn unchanged(charge: f32) -> Self {
        Self {
            previous: charge,
            current: charge,
            completed: false,
        }
    }
}

/// Bounded accumulator with asymmetric rise and fall
#[derive(Debug, Clone, PartialEq)]
pub struct ChargingTimer {
    duration: f64,
    decay_factor: f32,
    charge: f32,
    /// Reset to empty right after completing
    pub cycle: bool,
    /// Disabled timers ignore updates
    pub enabled: bool,
}

impl ChargingTimer {
    /// Timer that takes `duration` seconds to fill. Cycles by default.
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            decay_factor: 1.0,
            charge: 0.0,
            cycle: true,
            enabled: true,
        }
    }

    /// Set whether the timer resets after completing
    pub fn with_cycle(mut self, cycle: bool) -> Self {
        self.cycle = cycle;
        self
    }

    /// Set the discharge multiplier
    pub fn with_decay_factor(mut self, decay_factor: f32) -> Self {
        self.decay_factor = decay_factor;
        self
    }

    /// Start disabled
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Seconds to fill from empty
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Change the fill time; the current charge is kept
    pub fn set_duration(&mut self, duration: f64) {
        self.duration = duration;
    }

    /// How much faster the charge drains than it fills
    pub fn decay_factor(&self) -> f32 {
        self.decay_factor
    }

    /// Current charge in `[0, 1]`
    pub fn charge(&self) -> f32 {
        self.charge
    }

    /// Set the charge directly, clamped to `[0, 1]`. NaN empties the timer.
    pub fn set_charge(&mut self, charge: f32) {
        self.charge = clamp_unit(charge);
    }

    pub fn is_full(&self) -> bool {
        self.charge == 1.0
    }

    pub fn is_empty(&self) -> bool {
        self.charge == 0.0
    }

    /// Empty the timer
    pub fn reset(&mut self) {
        self.charge = 0.0;
    }

    /// Advance by `seconds_elapsed`, charging while `condition` holds.
    ///
    /// Completion is reported only on the update that moves the charge from
    /// below 1.0 to exactly 1.0; staying full does not complete again.
    pub fn update(&mut self, seconds_elapsed: f64, condition: bool) -> ChargeUpdate {
        if !self.enabled {
            return ChargeUpdate::unchanged(self.charge);
        }

        let delta = self.delta(seconds_elapsed);
        let previous = self.charge;
        let change = if condition {
            delta
        } else {
            delta * self.decay_factor.max(0.0)
        };
        self.set_charge(if condition {
            previous + change
        } else {
            previous - change
        });

        let current = self.charge;
        let completed = current == 1.0 && previous < 1.0;
        if completed && self.cycle {
            self.charge = 0.0;
        }

        ChargeUpdate {
            previous,
            current,
            completed,
        }
    }

    /// Like [`update`](Self::update), running `on_full` when the timer completes.
    pub fn update_then<F: FnOnce()>(
        &mut self,
        seconds_elapsed: f64,
        condition: bool,
        on_full: F,
    ) -> ChargeUpdate {
        let result = self.update(seconds_elapsed, condition);
        if result.completed {
            on_full();
        }
        result
    }

    /// If full, empty the timer and run `on_consume`. Returns whether it ran.
    pub fn consume_if_charged<F: FnOnce()>(&mut self, on_consume: F) -> bool {
        if self.is_full() {
            self.charge = 0.0;
            on_consume();
            true
        } else {
            false
        }
    }

    fn delta(&self, seconds_elapsed: f64) -> f32 {
        if !seconds_elapsed.is_finite() || seconds_elapsed <= 0.0 {
            return 0.0;
        }
        if self.duration.is_nan() || self.duration <= 0.0 {
            // A zero-length timer fills on any positive elapsed time
            return 1.0;
        }
        (seconds_elapsed / self.duration) as f32
    }
}

pub(crate) fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
