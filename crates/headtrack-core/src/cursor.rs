//! Cursor interaction modes

use serde::{Deserialize, Serialize};
use std::fmt;

/// What the cursor is currently allowed to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorMode {
    /// Clicking only
    Click,
    /// Scrolling only
    Scroll,
    /// Clicking and scrolling
    ClickAndScroll,
    /// Neither clicking nor scrolling
    Empty,
}

impl Default for CursorMode {
    fn default() -> Self {
        Self::ClickAndScroll
    }
}

impl CursorMode {
    /// Clicks allowed
    pub fn is_click_mode(&self) -> bool {
        matches!(self, CursorMode::Click | CursorMode::ClickAndScroll)
    }

    /// Scrolling allowed
    pub fn is_scroll_mode(&self) -> bool {
        matches!(self, CursorMode::Scroll | CursorMode::ClickAndScroll)
    }

    /// Mode after pressing one of the two toggle buttons
    pub fn toggled(self, toggle: CursorToggle) -> CursorMode {
        match (toggle, self) {
            (CursorToggle::Click, CursorMode::ClickAndScroll) => CursorMode::Scroll,
            (CursorToggle::Click, CursorMode::Scroll) => CursorMode::ClickAndScroll,
            (CursorToggle::Click, CursorMode::Click) => CursorMode::Empty,
            (CursorToggle::Click, CursorMode::Empty) => CursorMode::Click,
            (CursorToggle::Scroll, CursorMode::ClickAndScroll) => CursorMode::Click,
            (CursorToggle::Scroll, CursorMode::Click) => CursorMode::ClickAndScroll,
            (CursorToggle::Scroll, CursorMode::Scroll) => CursorMode::Empty,
            (CursorToggle::Scroll, CursorMode::Empty) => CursorMode::Scroll,
        }
    }

    /// Get mode name
    pub fn name(&self) -> &'static str {
        match self {
            CursorMode::Click => "click",
            CursorMode::Scroll => "scroll",
            CursorMode::ClickAndScroll => "click_and_scroll",
            CursorMode::Empty => "empty",
        }
    }
}

impl fmt::Display for CursorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The two on-screen mode buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorToggle {
    /// Click button
    Click,
    /// Scroll button
    Scroll,
}

/// Cursor activity and mode selection
#[derive(Debug, Clone, PartialEq)]
pub struct CursorState {
    selected_mode: CursorMode,
    /// An on-screen keyboard forces click mode while visible
    pub keyboard_visible: bool,
    /// Inactive cursors never focus or click
    pub active: bool,
}

impl Default for CursorState {
    fn default() -> Self {
        Self {
            selected_mode: CursorMode::default(),
            keyboard_visible: false,
            active: true,
        }
    }
}

impl CursorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mode chosen by the user
    pub fn selected_mode(&self) -> CursorMode {
        self.selected_mode
    }

    /// Mode actually applied, after overrides
    pub fn actual_mode(&self) -> CursorMode {
        if self.keyboard_visible {
            CursorMode::Click
        } else {
            self.selected_mode
        }
    }

    pub fn set_mode(&mut self, mode: CursorMode) {
        self.selected_mode = mode;
    }

    /// Apply a toggle and return the new selected mode
    pub fn toggle(&mut self, toggle: CursorToggle) -> CursorMode {
        self.selected_mode = self.selected_mode.toggled(toggle);
        self.selected_mode
    }

    /// Turn scrolling off if it is on
    pub fn disable_scroll(&mut self) -> CursorMode {
        if self.selected_mode.is_scroll_mode() {
            self.toggle(CursorToggle::Scroll);
        }
        self.selected_mode
    }

    pub fn enable_click_and_scroll(&mut self) {
        self.selected_mode = CursorMode::ClickAndScroll;
    }
}
