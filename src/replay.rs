//! Replaying recorded tracking traces
//!
//! A trace is a JSON document with the targets on screen and the sequence of
//! frames and gestures the tracking source produced:
//!
//! ```json
//! {
//!   "targets": [
//!     { "id": 1, "frame": { "origin": { "x": 0, "y": 0 }, "size": { "width": 80, "height": 40 } },
//!       "tooltip": "Back" }
//!   ],
//!   "steps": [
//!     { "kind": "frame", "dt": 0.1, "point": { "x": 10, "y": 10 } },
//!     { "kind": "blink", "duration": 0.2 }
//!   ]
//! }
//! ```

use anyhow::{bail, Context, Result};
use headtrack_config::Settings;
use headtrack_core::{
    BlinkEvent, CursorSample, CursorToggle, EventLog, Focusable, HeadTracker, HeadTrackingEvent,
    Point, Rect, TargetId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

fn default_true() -> bool {
    true
}

/// A target as described in a trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetSpec {
    pub id: u64,
    pub frame: Rect,
    #[serde(default)]
    pub tooltip: Option<String>,
    #[serde(default = "default_true")]
    pub focusable: bool,
    #[serde(default = "default_true")]
    pub ignores_cursor_mode: bool,
    #[serde(default = "default_true")]
    pub ignores_scroll_speed: bool,
    /// Higher sits on top; defaults to the order of appearance
    #[serde(default)]
    pub stacking: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Step {
    Frame {
        dt: f64,
        #[serde(default)]
        point: Option<Point>,
        #[serde(default)]
        moving_fast: bool,
    },
    Blink {
        duration: f64,
    },
    Recalibrate,
    Toggle {
        toggle: CursorToggle,
    },
    ScrollSpeed {
        #[serde(default)]
        scroller: u64,
        #[serde(default)]
        horizontal: f64,
        #[serde(default)]
        vertical: f64,
    },
    Keyboard {
        visible: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    #[serde(default)]
    pub targets: Vec<TargetSpec>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Trace {
    pub fn from_json(text: &str) -> Result<Self> {
        let trace: Trace = serde_json::from_str(text).context("Invalid trace JSON")?;
        trace.validate()?;
        Ok(trace)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read trace {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Failed to load trace {}", path.display()))
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for target in &self.targets {
            if !seen.insert(target.id) {
                bail!("Duplicate target id {}", target.id);
            }
        }
        Ok(())
    }
}

/// Target driven by a trace; activations are only logged
#[derive(Debug, Clone)]
pub struct ScriptedTarget {
    spec: TargetSpec,
}

impl ScriptedTarget {
    pub fn new(spec: TargetSpec) -> Self {
        Self { spec }
    }
}

impl Focusable for ScriptedTarget {
    fn frame(&self) -> Rect {
        self.spec.frame
    }

    fn is_focusable(&self) -> bool {
        self.spec.focusable
    }

    fn ignores_cursor_mode(&self) -> bool {
        self.spec.ignores_cursor_mode
    }

    fn ignores_scroll_speed(&self) -> bool {
        self.spec.ignores_scroll_speed
    }

    fn tooltip_text(&self) -> Option<&str> {
        self.spec.tooltip.as_deref()
    }

    fn initiate_action(&mut self, point: Point) {
        debug!(target_id = self.spec.id, x = point.x, y = point.y, "target activated");
    }

    fn handle_too_short_click(&mut self) {
        debug!(target_id = self.spec.id, "target saw a too short blink");
    }
}

/// Result of replaying a trace
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplaySummary {
    pub events: Vec<HeadTrackingEvent>,
    pub frames: usize,
    pub blinks: usize,
}

impl ReplaySummary {
    pub fn clicks(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, HeadTrackingEvent::Click(_)))
            .count()
    }
}

/// Tracker with every target of `trace` registered
pub fn build_tracker(trace: &Trace, settings: Settings) -> HeadTracker {
    let mut tracker = HeadTracker::new(settings);
    let registry = tracker.registry_mut();
    for spec in &trace.targets {
        let id = TargetId(spec.id);
        let target = Box::new(ScriptedTarget::new(spec.clone()));
        match spec.stacking {
            Some(stacking) => registry.insert_with_stacking(id, target, stacking),
            None => registry.insert(id, target),
        }
    }
    tracker
}

/// Replay every step of `trace` and collect the emitted events
pub fn run(trace: &Trace, settings: Settings) -> ReplaySummary {
    let mut tracker = build_tracker(trace, settings);
    let log = EventLog::new();
    tracker.subscribe(log.clone());

    let mut summary = ReplaySummary::default();
    for step in &trace.steps {
        match step {
            Step::Frame {
                dt,
                point,
                moving_fast,
            } => {
                let sample = CursorSample {
                    screen_point: *point,
                    seconds_since_last_sample: *dt,
                    is_moving_fast: *moving_fast,
                };
                tracker.update(sample);
                summary.frames += 1;
            }
            Step::Blink { duration } => {
                let outcome = tracker.blink(BlinkEvent::new(*duration));
                debug!(?outcome, "blink replayed");
                summary.blinks += 1;
            }
            Step::Recalibrate => {
                tracker.begin_recalibration();
            }
            Step::Toggle { toggle } => {
                tracker.toggle_cursor_mode(*toggle);
            }
            Step::ScrollSpeed {
                scroller,
                horizontal,
                vertical,
            } => tracker.record_scroll_speed(*scroller, *horizontal, *vertical),
            Step::Keyboard { visible } => tracker.set_keyboard_visible(*visible),
        }
    }

    summary.events = log.take();
    info!(
        frames = summary.frames,
        blinks = summary.blinks,
        events = summary.events.len(),
        "replay finished"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use headtrack_config::{BlinkSensitivityOption, ClickGesture};
    use headtrack_core::CursorMode;
    use std::io::Write;

    const TRACE: &str = r#"{
        "targets": [
            { "id": 1, "frame": { "origin": { "x": 0, "y": 0 }, "size": { "width": 100, "height": 100 } },
              "tooltip": "Back" },
            { "id": 2, "frame": { "origin": { "x": 200, "y": 0 }, "size": { "width": 100, "height": 100 } } }
        ],
        "steps": [
            { "kind": "frame", "dt": 0.5, "point": { "x": 50, "y": 50 } },
            { "kind": "frame", "dt": 0.5, "point": { "x": 50, "y": 50 } },
            { "kind": "frame", "dt": 0.5, "point": { "x": 50, "y": 50 } },
            { "kind": "blink", "duration": 0.05 },
            { "kind": "blink", "duration": 0.3 },
            { "kind": "frame", "dt": 0.1 }
        ]
    }"#;

    #[test]
    fn test_blink_trace() {
        let trace = Trace::from_json(TRACE).unwrap();
        let settings = Settings::default().with_blink_sensitivity(BlinkSensitivityOption::High);
        let summary = run(&trace, settings);

        assert_eq!(summary.frames, 4);
        assert_eq!(summary.blinks, 2);
        assert_eq!(summary.clicks(), 1);
        assert_eq!(
            summary.events[0],
            HeadTrackingEvent::FocusChanged {
                previous: None,
                current: Some(TargetId(1)),
            }
        );
        assert!(summary.events.contains(&HeadTrackingEvent::TooltipShown {
            target: TargetId(1),
            text: "Back".to_string(),
        }));
        assert!(summary.events.contains(&HeadTrackingEvent::TooShortClick {
            target: TargetId(1),
            duration: 0.05,
        }));
        assert!(summary.events.contains(&HeadTrackingEvent::TooltipHidden { target: TargetId(1) }));
    }

    #[test]
    fn test_dwell_trace() {
        let trace = Trace::from_json(TRACE).unwrap();
        let settings = Settings {
            click_gesture: ClickGesture::Dwell,
            dwell_time_secs: 1.0,
            ..Settings::default()
        };
        let summary = run(&trace, settings);

        // Two half-second frames charge the target, the third starts over
        assert_eq!(summary.clicks(), 1);
        assert!(!summary
            .events
            .iter()
            .any(|e| matches!(e, HeadTrackingEvent::TooShortClick { .. })));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let text = r#"{ "targets": [
            { "id": 1, "frame": { "origin": { "x": 0, "y": 0 }, "size": { "width": 1, "height": 1 } } },
            { "id": 1, "frame": { "origin": { "x": 5, "y": 0 }, "size": { "width": 1, "height": 1 } } }
        ] }"#;
        let err = Trace::from_json(text).unwrap_err();
        assert!(err.to_string().contains("Duplicate target id 1"));
    }

    #[test]
    fn test_step_kinds_parse() {
        let text = r#"{ "steps": [
            { "kind": "recalibrate" },
            { "kind": "toggle", "toggle": "scroll" },
            { "kind": "scroll_speed", "vertical": 0.5 },
            { "kind": "keyboard", "visible": true }
        ] }"#;
        let trace = Trace::from_json(text).unwrap();
        assert_eq!(trace.steps.len(), 4);
        assert_eq!(
            trace.steps[1],
            Step::Toggle {
                toggle: CursorToggle::Scroll
            }
        );

        let summary = run(&trace, Settings::default());
        assert_eq!(
            summary.events,
            vec![
                HeadTrackingEvent::RecalibrationStarted,
                HeadTrackingEvent::CursorModeChanged {
                    mode: CursorMode::Click
                },
            ]
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TRACE.as_bytes()).unwrap();
        let trace = Trace::load(file.path()).unwrap();
        assert_eq!(trace.targets.len(), 2);
        assert_eq!(trace.targets[0].tooltip.as_deref(), Some("Back"));
        assert!(trace.targets[1].focusable);

        let missing = file.path().with_extension("missing");
        assert!(Trace::load(&missing).is_err());
    }
}
