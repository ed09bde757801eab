//! Named presets for user-facing options.
//!
//! Presets map a short label ("Fast", "High", ...) to the seconds value the
//! engine actually consumes. Labels are matched case-insensitively.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ConfigError;

/// Which gesture turns a focused target into a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClickGesture {
    /// Close both eyes for at least the blink threshold
    Blink,
    /// Keep the cursor on a target until it is fully charged
    Dwell,
}

impl Default for ClickGesture {
    fn default() -> Self {
        Self::Blink
    }
}

impl ClickGesture {
    pub fn label(&self) -> &'static str {
        match self {
            ClickGesture::Blink => "Blink",
            ClickGesture::Dwell => "Dwell",
        }
    }
}

impl fmt::Display for ClickGesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ClickGesture {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "blink" => Ok(ClickGesture::Blink),
            "dwell" => Ok(ClickGesture::Dwell),
            _ => Err(ConfigError::UnknownLabel {
                kind: "click gesture",
                label: s.to_string(),
            }),
        }
    }
}

/// Dwell time presets.
///
/// 0.75s is about as fast as anyone can dwell without misfiring; 1.5s is the
/// comfortable default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DwellTimeOption {
    Fast,
    Medium,
    Slow,
}

impl DwellTimeOption {
    pub const ALL: [DwellTimeOption; 3] = [Self::Fast, Self::Medium, Self::Slow];

    pub fn seconds(&self) -> f64 {
        match self {
            DwellTimeOption::Fast => 0.75,
            DwellTimeOption::Medium => 1.5,
            DwellTimeOption::Slow => 2.25,
        }
    }

    /// Preset whose value is exactly `seconds`, if any.
    pub fn from_seconds(seconds: f64) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.seconds() == seconds)
    }

    pub fn label(&self) -> &'static str {
        match self {
            DwellTimeOption::Fast => "Fast",
            DwellTimeOption::Medium => "Medium",
            DwellTimeOption::Slow => "Slow",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|o| o.label().eq_ignore_ascii_case(label))
    }
}

impl Default for DwellTimeOption {
    fn default() -> Self {
        Self::Medium
    }
}

/// Minimum blink duration presets.
///
/// Higher sensitivity means a shorter blink is accepted as a click. At 0.12s
/// unintentional blinks still slip through occasionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlinkSensitivityOption {
    Highest,
    High,
    Medium,
    Low,
}

impl BlinkSensitivityOption {
    pub const ALL: [BlinkSensitivityOption; 4] =
        [Self::Highest, Self::High, Self::Medium, Self::Low];

    pub fn seconds(&self) -> f64 {
        match self {
            BlinkSensitivityOption::Highest => 0.0,
            BlinkSensitivityOption::High => 0.12,
            BlinkSensitivityOption::Medium => 0.19,
            BlinkSensitivityOption::Low => 0.29,
        }
    }

    pub fn from_seconds(seconds: f64) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.seconds() == seconds)
    }

    pub fn label(&self) -> &'static str {
        match self {
            BlinkSensitivityOption::Highest => "Highest",
            BlinkSensitivityOption::High => "High",
            BlinkSensitivityOption::Medium => "Medium",
            BlinkSensitivityOption::Low => "Low",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|o| o.label().eq_ignore_ascii_case(label))
    }
}

impl Default for BlinkSensitivityOption {
    fn default() -> Self {
        Self::Highest
    }
}
