//! Tooltip delay

use tracing::debug;

use crate::focus::{FocusRegistry, TargetId};
use crate::timer::ChargingTimer;

pub const TOOLTIP_DELAY_SECONDS: f64 = 1.5;
pub const TOOLTIP_DECAY_FACTOR: f32 = 3.0;

#[derive(Debug, Clone, PartialEq)]
pub enum TooltipEvent {
    Shown { target: TargetId, text: String },
    Hidden { target: TargetId },
}

/// Shows a target's tooltip after it has been focused for a while.
///
/// Charge belongs to one target at a time. Moving to another target drains
/// it (three times faster than it rose) before the new target starts charging,
/// so skimming across neighbours keeps the current tooltip up.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipTracker {
    timer: ChargingTimer,
    charging: Option<TargetId>,
    shown: Option<TargetId>,
}

impl Default for TooltipTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl TooltipTracker {
    pub fn new() -> Self {
        Self {
            timer: ChargingTimer::new(TOOLTIP_DELAY_SECONDS)
                .with_cycle(false)
                .with_decay_factor(TOOLTIP_DECAY_FACTOR),
            charging: None,
            shown: None,
        }
    }

    pub fn shown(&self) -> Option<TargetId> {
        self.shown
    }

    pub fn update(
        &mut self,
        focused: Option<TargetId>,
        seconds_elapsed: f64,
        registry: &FocusRegistry,
    ) -> Vec<TooltipEvent> {
        let mut events = Vec::new();
        let Some(id) = focused else {
            events.extend(self.dispose());
            return events;
        };

        if self.timer.is_empty() {
            events.extend(self.dispose());
            self.charging = Some(id);
        }

        let on_charging_target = self.charging == Some(id);
        self.timer.update(seconds_elapsed, on_charging_target);

        if self.timer.is_full() && on_charging_target && self.shown != Some(id) {
            if let Some(text) = registry.get(id).and_then(|t| t.tooltip_text()) {
                debug!(target_id = %id, "showing tooltip");
                self.shown = Some(id);
                events.push(TooltipEvent::Shown {
                    target: id,
                    text: text.to_string(),
                });
            }
        }
        events
    }

    /// Drop the charge and hide whatever is shown
    pub fn dispose(&mut self) -> Option<TooltipEvent> {
        self.timer.reset();
        self.charging = None;
        self.shown.take().map(|target| TooltipEvent::Hidden { target })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focus::test_support::TestTarget;
    use crate::geometry::Rect;

    fn registry() -> FocusRegistry {
        let mut registry = FocusRegistry::new();
        let mut with_tip = TestTarget::new(Rect::new(0.0, 0.0, 10.0, 10.0));
        with_tip.tooltip = Some("Back".to_string());
        registry.insert(TargetId(1), Box::new(with_tip));
        let mut other = TestTarget::new(Rect::new(20.0, 0.0, 10.0, 10.0));
        other.tooltip = Some("Forward".to_string());
        registry.insert(TargetId(2), Box::new(other));
        registry.insert(TargetId(3), TestTarget::boxed(Rect::new(40.0, 0.0, 10.0, 10.0)));
        registry
    }

    #[test]
    fn test_shows_once_after_delay() {
        let registry = registry();
        let mut tooltip = TooltipTracker::new();

        assert!(tooltip.update(Some(TargetId(1)), 0.75, &registry).is_empty());
        let events = tooltip.update(Some(TargetId(1)), 0.75, &registry);
        assert_eq!(
            events,
            vec![TooltipEvent::Shown {
                target: TargetId(1),
                text: "Back".to_string()
            }]
        );
        assert!(tooltip.update(Some(TargetId(1)), 0.5, &registry).is_empty());
        assert_eq!(tooltip.shown(), Some(TargetId(1)));
    }

    #[test]
    fn test_moving_away_drains_before_switching() {
        let registry = registry();
        let mut tooltip = TooltipTracker::new();
        tooltip.update(Some(TargetId(1)), 1.5, &registry);
        assert_eq!(tooltip.shown(), Some(TargetId(1)));

        // 0.25s on another target drains half the charge
        assert!(tooltip.update(Some(TargetId(2)), 0.25, &registry).is_empty());
        assert_eq!(tooltip.shown(), Some(TargetId(1)));

        tooltip.update(Some(TargetId(2)), 0.25, &registry);
        let events = tooltip.update(Some(TargetId(2)), 0.1, &registry);
        assert_eq!(events, vec![TooltipEvent::Hidden { target: TargetId(1) }]);
        assert_eq!(tooltip.shown(), None);
    }

    #[test]
    fn test_no_focus_hides() {
        let registry = registry();
        let mut tooltip = TooltipTracker::new();
        tooltip.update(Some(TargetId(1)), 2.0, &registry);
        let events = tooltip.update(None, 0.1, &registry);
        assert_eq!(events, vec![TooltipEvent::Hidden { target: TargetId(1) }]);
    }

    #[test]
    fn test_target_without_text() {
        let registry = registry();
        let mut tooltip = TooltipTracker::new();
        assert!(tooltip.update(Some(TargetId(3)), 5.0, &registry).is_empty());
        assert_eq!(tooltip.shown(), None);
    }
}
