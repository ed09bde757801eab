//! Blink and dwell click dispatch
//!
//! Every gate is a silent no-op: a blink with nothing focused, a dwell in
//! blink mode or a click on a target the cursor mode forbids simply does not
//! click. The only feedback path is the too-short blink, which is reported to
//! the target so it can show that the blink was seen.

use headtrack_config::{ClickGesture, Settings};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, trace};

use crate::focus::{FocusContext, FocusRegistry, Focusable, InteractionState, TargetId};
use crate::geometry::Point;
use crate::input::BlinkEvent;

/// Why a click did not happen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuppressReason {
    /// Nothing focused
    NoFocus,
    /// Cursor inactive or head tracking disabled
    CursorInactive,
    /// Gesture does not match the configured click gesture
    WrongGesture,
    /// Target needs a click mode and the cursor is not in one
    CursorModeBlocked,
    /// Target is speed sensitive and a scroller is moving fast
    ScrollingFast,
    /// Dwell focus level not full yet
    NotCharged,
    /// Focused target no longer registered
    TargetGone,
}

impl SuppressReason {
    /// Get reason name
    pub fn name(&self) -> &'static str {
        match self {
            SuppressReason::NoFocus => "no_focus",
            SuppressReason::CursorInactive => "cursor_inactive",
            SuppressReason::WrongGesture => "wrong_gesture",
            SuppressReason::CursorModeBlocked => "cursor_mode_blocked",
            SuppressReason::ScrollingFast => "scrolling_fast",
            SuppressReason::NotCharged => "not_charged",
            SuppressReason::TargetGone => "target_gone",
        }
    }
}

impl fmt::Display for SuppressReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A click that fired
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClickEvent {
    pub target: TargetId,
    /// Point inside the target's true frame
    pub point: Point,
    pub gesture: ClickGesture,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// Target activated
    Clicked(ClickEvent),
    /// Blink seen on an eligible target but shorter than the threshold
    TooShort { target: TargetId, duration: f64 },
    /// A gate blocked the click; nothing was reported to the target
    Suppressed(SuppressReason),
}

impl ClickOutcome {
    /// The click, if one fired
    pub fn click(&self) -> Option<&ClickEvent> {
        match self {
            ClickOutcome::Clicked(event) => Some(event),
            _ => None,
        }
    }
}

/// Externally owned state the click gates read
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickGate {
    pub cursor_active: bool,
    pub gesture: ClickGesture,
    pub interaction: InteractionState,
}

impl ClickGate {
    fn check(&self, target: &dyn Focusable) -> Result<(), SuppressReason> {
        if !target.ignores_cursor_mode() && !self.interaction.cursor_mode.is_click_mode() {
            return Err(SuppressReason::CursorModeBlocked);
        }
        if !target.ignores_scroll_speed() && self.interaction.scrolling_fast {
            return Err(SuppressReason::ScrollingFast);
        }
        Ok(())
    }
}

/// Replacement for a target's own activation
pub type ClickAction = Box<dyn FnMut(TargetId, &mut dyn Focusable, Point)>;

pub struct ClickGestureDispatcher {
    /// Blinks shorter than this are too short to click
    pub min_blink_duration: f64,
    click_action: Option<ClickAction>,
}

impl fmt::Debug for ClickGestureDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClickGestureDispatcher")
            .field("min_blink_duration", &self.min_blink_duration)
            .field("custom_click_action", &self.click_action.is_some())
            .finish()
    }
}

impl Default for ClickGestureDispatcher {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl ClickGestureDispatcher {
    pub fn new(min_blink_duration: f64) -> Self {
        Self {
            min_blink_duration,
            click_action: None,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.blink_min_duration_secs)
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.min_blink_duration = settings.blink_min_duration_secs;
    }

    /// Run `action` instead of [`Focusable::initiate_action`] on click
    pub fn set_click_action<F>(&mut self, action: F)
    where
        F: FnMut(TargetId, &mut dyn Focusable, Point) + 'static,
    {
        self.click_action = Some(Box::new(action));
    }

    pub fn clear_click_action(&mut self) {
        self.click_action = None;
    }

    /// Handle a blink against the focus of the last update
    pub fn on_blink(
        &mut self,
        blink: &BlinkEvent,
        focus: Option<&FocusContext>,
        gate: &ClickGate,
        registry: &mut FocusRegistry,
    ) -> ClickOutcome {
        let focused = focus.and_then(|f| Some((f.focused?, f.screen_point_in_target?)));
        let Some((id, point)) = focused else {
            return suppressed(SuppressReason::NoFocus);
        };
        if !gate.cursor_active {
            return suppressed(SuppressReason::CursorInactive);
        }
        if gate.gesture != ClickGesture::Blink {
            return suppressed(SuppressReason::WrongGesture);
        }
        let Some(target) = registry.get_mut(id) else {
            return suppressed(SuppressReason::TargetGone);
        };
        if let Err(reason) = gate.check(target) {
            return suppressed(reason);
        }

        if !(blink.duration >= self.min_blink_duration) {
            debug!(
                target_id = %id,
                duration = blink.duration,
                threshold = self.min_blink_duration,
                "blink too short to click"
            );
            target.handle_too_short_click();
            return ClickOutcome::TooShort {
                target: id,
                duration: blink.duration,
            };
        }

        self.fire(id, target, point, ClickGesture::Blink)
    }

    /// Click the focused target once its focus level is full in dwell mode.
    ///
    /// The focus level is reset before clicking so the same spot has to charge
    /// again for another click.
    pub fn on_focus_update(
        &mut self,
        focus: &FocusContext,
        gate: &ClickGate,
        registry: &mut FocusRegistry,
    ) -> ClickOutcome {
        if !gate.cursor_active {
            return ClickOutcome::Suppressed(SuppressReason::CursorInactive);
        }
        if gate.gesture != ClickGesture::Dwell {
            return ClickOutcome::Suppressed(SuppressReason::WrongGesture);
        }
        let (Some(id), Some(point)) = (focus.focused, focus.screen_point_in_target) else {
            return ClickOutcome::Suppressed(SuppressReason::NoFocus);
        };
        let Some(target) = registry.get(id) else {
            return ClickOutcome::Suppressed(SuppressReason::TargetGone);
        };
        if let Err(reason) = gate.check(target) {
            trace!(target_id = %id, %reason, "dwell click gated");
            return ClickOutcome::Suppressed(reason);
        }
        if registry.focus_level(id) < 1.0 {
            return ClickOutcome::Suppressed(SuppressReason::NotCharged);
        }

        registry.set_focus_level(id, 0.0);
        match registry.get_mut(id) {
            Some(target) => self.fire(id, target, point, ClickGesture::Dwell),
            None => ClickOutcome::Suppressed(SuppressReason::TargetGone),
        }
    }

    fn fire(
        &mut self,
        id: TargetId,
        target: &mut dyn Focusable,
        point: Point,
        gesture: ClickGesture,
    ) -> ClickOutcome {
        match self.click_action.as_mut() {
            Some(action) => action(id, target, point),
            None => target.initiate_action(point),
        }
        info!(target_id = %id, %gesture, x = point.x, y = point.y, "click");
        ClickOutcome::Clicked(ClickEvent {
            target: id,
            point,
            gesture,
        })
    }
}

fn suppressed(reason: SuppressReason) -> ClickOutcome {
    debug!(%reason, "blink ignored");
    ClickOutcome::Suppressed(reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::CursorMode;
    use crate::focus::test_support::TestTarget;
    use crate::focus::FocusResolver;
    use crate::geometry::Rect;
    use crate::input::CursorSample;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn gate(gesture: ClickGesture) -> ClickGate {
        ClickGate {
            cursor_active: true,
            gesture,
            interaction: InteractionState::default(),
        }
    }

    fn focused_on(id: TargetId, point: Point) -> FocusContext {
        FocusContext {
            focused: Some(id),
            focus_frame: None,
            screen_point_in_target: Some(point),
            sample: CursorSample::at(point, 0.0),
        }
    }

    #[test]
    fn test_short_blink_is_too_short_click() {
        let mut registry = FocusRegistry::new();
        let (target, activity) = TestTarget::new(Rect::new(0.0, 0.0, 50.0, 50.0)).tracked();
        registry.insert(TargetId(1), target);
        let mut dispatcher = ClickGestureDispatcher::new(0.12);
        let focus = focused_on(TargetId(1), Point::new(10.0, 10.0));

        let outcome = dispatcher.on_blink(
            &BlinkEvent::new(0.05),
            Some(&focus),
            &gate(ClickGesture::Blink),
            &mut registry,
        );

        assert_eq!(
            outcome,
            ClickOutcome::TooShort {
                target: TargetId(1),
                duration: 0.05
            }
        );
        assert!(outcome.click().is_none());
        assert_eq!(activity.borrow().too_short, 1);
        assert!(activity.borrow().actions.is_empty());
    }

    #[test]
    fn test_blink_clicks_at_mapped_point() {
        let mut registry = FocusRegistry::new();
        let (target, activity) = TestTarget::new(Rect::new(0.0, 0.0, 50.0, 50.0)).tracked();
        registry.insert(TargetId(1), target);
        let mut dispatcher = ClickGestureDispatcher::new(0.12);
        let focus = focused_on(TargetId(1), Point::new(10.0, 20.0));

        let outcome = dispatcher.on_blink(
            &BlinkEvent::new(0.2),
            Some(&focus),
            &gate(ClickGesture::Blink),
            &mut registry,
        );

        assert_eq!(
            outcome.click(),
            Some(&ClickEvent {
                target: TargetId(1),
                point: Point::new(10.0, 20.0),
                gesture: ClickGesture::Blink,
            })
        );
        assert_eq!(activity.borrow().actions, vec![Point::new(10.0, 20.0)]);
    }

    #[test]
    fn test_blink_gates() {
        let mut registry = FocusRegistry::new();
        let mut gated = TestTarget::new(Rect::new(0.0, 0.0, 50.0, 50.0));
        gated.ignores_cursor_mode = false;
        let (target, activity) = gated.tracked();
        registry.insert(TargetId(1), target);
        let mut dispatcher = ClickGestureDispatcher::new(0.0);
        let focus = focused_on(TargetId(1), Point::new(1.0, 1.0));
        let blink = BlinkEvent::new(0.3);

        let none = dispatcher.on_blink(&blink, None, &gate(ClickGesture::Blink), &mut registry);
        assert_eq!(none, ClickOutcome::Suppressed(SuppressReason::NoFocus));

        let mut inactive = gate(ClickGesture::Blink);
        inactive.cursor_active = false;
        let outcome = dispatcher.on_blink(&blink, Some(&focus), &inactive, &mut registry);
        assert_eq!(outcome, ClickOutcome::Suppressed(SuppressReason::CursorInactive));

        let outcome = dispatcher.on_blink(&blink, Some(&focus), &gate(ClickGesture::Dwell), &mut registry);
        assert_eq!(outcome, ClickOutcome::Suppressed(SuppressReason::WrongGesture));

        let mut scroll_only = gate(ClickGesture::Blink);
        scroll_only.interaction.cursor_mode = CursorMode::Scroll;
        let outcome = dispatcher.on_blink(&blink, Some(&focus), &scroll_only, &mut registry);
        assert_eq!(outcome, ClickOutcome::Suppressed(SuppressReason::CursorModeBlocked));

        let gone = focused_on(TargetId(9), Point::new(1.0, 1.0));
        let outcome = dispatcher.on_blink(&blink, Some(&gone), &gate(ClickGesture::Blink), &mut registry);
        assert_eq!(outcome, ClickOutcome::Suppressed(SuppressReason::TargetGone));

        assert!(activity.borrow().actions.is_empty());
        assert_eq!(activity.borrow().too_short, 0);
    }

    #[test]
    fn test_dwell_click_resets_focus_and_needs_recharge() {
        let mut registry = FocusRegistry::new();
        let (target, activity) = TestTarget::new(Rect::new(0.0, 0.0, 100.0, 100.0)).tracked();
        registry.insert(TargetId(1), target);
        let resolver = FocusResolver::new(0.0, 1.0);
        let mut dispatcher = ClickGestureDispatcher::default();
        let gate = gate(ClickGesture::Dwell);
        let interaction = InteractionState::default();

        let step = |registry: &mut FocusRegistry, dispatcher: &mut ClickGestureDispatcher| {
            let sample = CursorSample::at(Point::new(50.0, 50.0), 0.5);
            let focus = resolver.resolve(registry, &sample, &interaction, None);
            dispatcher.on_focus_update(&focus, &gate, registry)
        };

        assert_eq!(
            step(&mut registry, &mut dispatcher),
            ClickOutcome::Suppressed(SuppressReason::NotCharged)
        );
        assert!(step(&mut registry, &mut dispatcher).click().is_some());
        assert_eq!(registry.focus_level(TargetId(1)), 0.0);

        assert_eq!(
            step(&mut registry, &mut dispatcher),
            ClickOutcome::Suppressed(SuppressReason::NotCharged)
        );
        assert!(step(&mut registry, &mut dispatcher).click().is_some());
        assert_eq!(activity.borrow().actions.len(), 2);
    }

    #[test]
    fn test_dwell_ignored_in_blink_mode() {
        let mut registry = FocusRegistry::new();
        registry.insert(TargetId(1), TestTarget::boxed(Rect::new(0.0, 0.0, 10.0, 10.0)));
        registry.set_focus_level(TargetId(1), 1.0);
        let mut dispatcher = ClickGestureDispatcher::default();
        let focus = focused_on(TargetId(1), Point::new(1.0, 1.0));

        let outcome = dispatcher.on_focus_update(&focus, &gate(ClickGesture::Blink), &mut registry);
        assert_eq!(outcome, ClickOutcome::Suppressed(SuppressReason::WrongGesture));
        assert_eq!(registry.focus_level(TargetId(1)), 1.0);
    }

    #[test]
    fn test_custom_click_action() {
        let mut registry = FocusRegistry::new();
        let (target, activity) = TestTarget::new(Rect::new(0.0, 0.0, 10.0, 10.0)).tracked();
        registry.insert(TargetId(4), target);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut dispatcher = ClickGestureDispatcher::default();
        let log = Rc::clone(&seen);
        dispatcher.set_click_action(move |id, _target, point| log.borrow_mut().push((id, point)));

        let focus = focused_on(TargetId(4), Point::new(3.0, 4.0));
        let outcome = dispatcher.on_blink(
            &BlinkEvent::new(1.0),
            Some(&focus),
            &gate(ClickGesture::Blink),
            &mut registry,
        );

        assert!(outcome.click().is_some());
        assert_eq!(*seen.borrow(), vec![(TargetId(4), Point::new(3.0, 4.0))]);
        assert!(activity.borrow().actions.is_empty());
    }
}
