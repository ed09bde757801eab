//! Per-frame observations from the tracking source

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// One tracking frame worth of cursor input
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CursorSample {
    /// Smoothed cursor position; `None` when no face is detected
    pub screen_point: Option<Point>,
    /// Time since the previous sample
    pub seconds_since_last_sample: f64,
    /// The head is moving quickly enough to count as active
    pub is_moving_fast: bool,
}

impl CursorSample {
    /// Sample with the face detected at `point`
    pub fn at(point: Point, seconds_since_last_sample: f64) -> Self {
        Self {
            screen_point: Some(point),
            seconds_since_last_sample,
            is_moving_fast: false,
        }
    }

    /// Sample without a detected face
    pub fn lost(seconds_since_last_sample: f64) -> Self {
        Self {
            screen_point: None,
            seconds_since_last_sample,
            is_moving_fast: false,
        }
    }

    /// Mark the sample as moving fast
    pub fn moving_fast(mut self, moving: bool) -> Self {
        self.is_moving_fast = moving;
        self
    }

    /// Elapsed time safe to feed into timers: never negative or non-finite
    pub fn elapsed(&self) -> f64 {
        if self.seconds_since_last_sample.is_finite() {
            self.seconds_since_last_sample.max(0.0)
        } else {
            0.0
        }
    }

    /// Point if present and finite
    pub fn point(&self) -> Option<Point> {
        self.screen_point.filter(Point::is_finite)
    }
}

/// A completed blink
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlinkEvent {
    /// How long the eyes were closed, in seconds
    pub duration: f64,
}

impl BlinkEvent {
    pub fn new(duration: f64) -> Self {
        Self { duration }
    }
}
