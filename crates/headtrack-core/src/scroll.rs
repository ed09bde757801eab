//! Scroll speed bookkeeping for the "scrolling fast" gate
//!
//! The scrolling itself belongs to the host UI. The host reports the speed it
//! actually applied to each scroller, and targets that don't ignore scroll
//! speed stop being focusable while any recorded speed is above the threshold.

use std::collections::HashMap;

/// Speeds above this (fraction of the scroller's extent per second) count as fast
pub const SCROLLING_FAST_SPEED_THRESHOLD: f64 = 4.0 / 60.0;

/// Host-side identifier for a scrollable view
pub type ScrollerId = u64;

#[derive(Debug, Clone, Default)]
pub struct ScrollSpeedMonitor {
    horizontal: HashMap<ScrollerId, f64>,
    vertical: HashMap<ScrollerId, f64>,
    custom: Option<f64>,
}

impl ScrollSpeedMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the speeds applied to a scroller this frame. Zero speeds keep
    /// the last non-zero value, matching how momentum is reported.
    pub fn record(&mut self, scroller: ScrollerId, horizontal: f64, vertical: f64) {
        let horizontal = horizontal.abs();
        let vertical = vertical.abs();
        if horizontal > 0.0 && horizontal.is_finite() {
            self.horizontal.insert(scroller, horizontal);
        }
        if vertical > 0.0 && vertical.is_finite() {
            self.vertical.insert(scroller, vertical);
        }
    }

    /// Speed reported by a custom scroll handler (e.g. embedded web content)
    pub fn record_custom(&mut self, speed: f64) {
        self.custom = speed.is_finite().then(|| speed.abs());
    }

    pub fn clear_horizontal(&mut self) {
        self.horizontal.clear();
    }

    pub fn clear_vertical(&mut self) {
        self.vertical.clear();
    }

    pub fn clear(&mut self) {
        self.horizontal.clear();
        self.vertical.clear();
        self.custom = None;
    }

    /// Largest speed on record
    pub fn max_speed(&self) -> f64 {
        self.horizontal
            .values()
            .chain(self.vertical.values())
            .chain(self.custom.iter())
            .copied()
            .fold(0.0, f64::max)
    }

    pub fn is_scrolling_fast(&self) -> bool {
        self.max_speed() > SCROLLING_FAST_SPEED_THRESHOLD
    }
}
