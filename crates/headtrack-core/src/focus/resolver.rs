//! Per-frame focused target selection

use headtrack_config::{ClickGesture, Settings, DEFAULT_MINIMUM_ELEMENT_SIZE};
use serde::Serialize;
use tracing::trace;

use super::registry::{FocusRegistry, HitTester};
use super::target::{Focusable, TargetId};
use crate::cursor::CursorMode;
use crate::geometry::{Point, Rect};
use crate::input::CursorSample;

/// Focus rise/fall time when focus does not drive clicking
pub const DEFAULT_FOCUS_DURATION: f64 = 0.5;

/// Interaction gates that can make a target temporarily unfocusable
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InteractionState {
    pub cursor_mode: CursorMode,
    pub scrolling_fast: bool,
}

impl InteractionState {
    pub fn allows(&self, target: &dyn Focusable) -> bool {
        let mode_ok = target.ignores_cursor_mode() || self.cursor_mode.is_click_mode();
        let speed_ok = target.ignores_scroll_speed() || !self.scrolling_fast;
        mode_ok && speed_ok
    }
}

/// Outcome of one focus resolution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FocusContext {
    pub focused: Option<TargetId>,
    /// True frame of the focused target
    pub focus_frame: Option<Rect>,
    /// Cursor point mapped into the focused target's frame
    pub screen_point_in_target: Option<Point>,
    pub sample: CursorSample,
}

impl FocusContext {
    pub fn unfocused(sample: CursorSample) -> Self {
        Self {
            focused: None,
            focus_frame: None,
            screen_point_in_target: None,
            sample,
        }
    }

    pub fn is_focused(&self) -> bool {
        self.focused.is_some()
    }
}

struct Candidate {
    id: TargetId,
    frame: Rect,
    hit_box: Rect,
    true_hit: bool,
    close: f64,
    far: f64,
}

impl Candidate {
    /// True hits first, then the closer aligned axis, then the far axis
    fn beats(&self, other: &Candidate) -> bool {
        if self.true_hit != other.true_hit {
            return self.true_hit;
        }
        if self.close != other.close {
            return self.close < other.close;
        }
        self.far < other.far
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FocusResolver {
    /// Targets smaller than this are padded up to it for hit testing
    pub minimum_element_size: f64,
    /// Seconds for a focus level to go from 0 to 1
    pub focus_duration: f64,
}

impl Default for FocusResolver {
    fn default() -> Self {
        Self {
            minimum_element_size: DEFAULT_MINIMUM_ELEMENT_SIZE,
            focus_duration: DEFAULT_FOCUS_DURATION,
        }
    }
}

impl FocusResolver {
    pub fn new(minimum_element_size: f64, focus_duration: f64) -> Self {
        Self {
            minimum_element_size,
            focus_duration,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let mut resolver = Self::default();
        resolver.apply_settings(settings);
        resolver
    }

    /// Focus builds up over the dwell time in dwell mode, otherwise it only
    /// drives the highlight animation.
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.minimum_element_size = settings.minimum_element_size;
        self.focus_duration = match settings.click_gesture {
            ClickGesture::Dwell => settings.dwell_time_secs,
            ClickGesture::Blink => DEFAULT_FOCUS_DURATION,
        };
    }

    /// Effective hit rectangle of a target frame
    pub fn hit_box(&self, frame: Rect) -> Rect {
        frame.padded_to(self.minimum_element_size)
    }

    /// Pick the focused target at `point` without touching focus levels
    pub fn select(
        &self,
        registry: &FocusRegistry,
        point: Point,
        interaction: &InteractionState,
        hit_tester: &dyn HitTester,
    ) -> Option<(TargetId, Rect, Point)> {
        let mut best: Option<Candidate> = None;

        for (id, target) in registry.iter() {
            if !target.is_focusable() {
                continue;
            }
            let frame = target.frame();
            let hit_box = self.hit_box(frame);
            if !hit_box.contains(point) {
                continue;
            }
            if !hit_tester.hits(id, frame.map_from(point, &hit_box)) {
                trace!(target_id = %id, "padded hit occluded");
                continue;
            }
            if !interaction.allows(target) {
                continue;
            }

            let (close, far) = hit_box.center().axis_distances(&point);
            let candidate = Candidate {
                id,
                frame,
                hit_box,
                true_hit: frame.contains(point),
                close,
                far,
            };
            if best.as_ref().map_or(true, |b| candidate.beats(b)) {
                best = Some(candidate);
            }
        }

        best.map(|c| (c.id, c.frame, c.frame.map_from(point, &c.hit_box)))
    }

    /// Resolve focus for `sample` and advance every focus level.
    ///
    /// Without a hit tester the registry's own stacking order decides
    /// occlusion.
    pub fn resolve(
        &self,
        registry: &mut FocusRegistry,
        sample: &CursorSample,
        interaction: &InteractionState,
        hit_tester: Option<&dyn HitTester>,
    ) -> FocusContext {
        let Some(point) = sample.point() else {
            return self.resolve_unfocused(registry, sample);
        };

        let selected = {
            let registry: &FocusRegistry = registry;
            self.select(registry, point, interaction, hit_tester.unwrap_or(registry))
        };

        let winner = selected.map(|(id, _, _)| id);
        self.advance_focus_levels(registry, winner, sample.elapsed());

        match selected {
            Some((id, frame, local)) => FocusContext {
                focused: Some(id),
                focus_frame: Some(frame),
                screen_point_in_target: Some(local),
                sample: *sample,
            },
            None => FocusContext::unfocused(*sample),
        }
    }

    /// No target can be focused this frame; every focus level decays
    pub fn resolve_unfocused(&self, registry: &mut FocusRegistry, sample: &CursorSample) -> FocusContext {
        self.advance_focus_levels(registry, None, sample.elapsed());
        FocusContext::unfocused(*sample)
    }

    fn advance_focus_levels(&self, registry: &mut FocusRegistry, winner: Option<TargetId>, secs: f64) {
        let delta = if secs <= 0.0 {
            0.0
        } else if self.focus_duration.is_nan() || self.focus_duration <= 0.0 {
            1.0
        } else {
            (secs / self.focus_duration) as f32
        };
        registry.update_focus_levels(|id, level| {
            if Some(id) == winner {
                level + delta
            } else {
                level - delta
            }
        });
    }
}
