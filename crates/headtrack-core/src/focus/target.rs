//! Focusable capability implemented by host UI elements

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geometry::{Point, Rect};

/// Stable handle for a registered target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetId(pub u64);

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for TargetId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A UI element the cursor can focus and click.
///
/// Defaults match a plain enabled control: always focusable, ignores both the
/// cursor mode and the scroll speed gates, no tooltip, and a too-short blink
/// does nothing.
pub trait Focusable {
    /// Current frame in screen coordinates
    fn frame(&self) -> Rect;

    /// Whether the element may be focused at all (e.g. control enabled)
    fn is_focusable(&self) -> bool {
        true
    }

    /// Focusable even when the cursor mode disallows clicking
    fn ignores_cursor_mode(&self) -> bool {
        true
    }

    /// Focusable even while content is scrolling fast
    fn ignores_scroll_speed(&self) -> bool {
        true
    }

    fn tooltip_text(&self) -> Option<&str> {
        None
    }

    /// Perform the element's primary action at `point` (inside its frame)
    fn initiate_action(&mut self, point: Point);

    /// A blink was seen but was too short to count as a click
    fn handle_too_short_click(&mut self) {}
}
