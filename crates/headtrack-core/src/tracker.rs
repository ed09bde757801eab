//! Context object wiring every component to one update stream
//!
//! The host owns a [`HeadTracker`], keeps its [`FocusRegistry`] in sync with
//! the UI, and calls [`HeadTracker::update`] once per tracking frame and
//! [`HeadTracker::blink`] whenever a blink completes. Everything runs on the
//! caller's thread with caller-supplied time.

use headtrack_config::Settings;
use tracing::{debug, info, trace};

use crate::click::{ClickEvent, ClickGate, ClickGestureDispatcher, ClickOutcome};
use crate::cursor::{CursorMode, CursorState, CursorToggle};
use crate::event::{EventBus, EventSink, HeadTrackingEvent};
use crate::focus::{FocusContext, FocusRegistry, FocusResolver, HitTester, InteractionState, TargetId};
use crate::idle::IdleTracker;
use crate::input::{BlinkEvent, CursorSample};
use crate::recalibration::RecalibrationCountdown;
use crate::scroll::{ScrollSpeedMonitor, ScrollerId};
use crate::timer::ChargingTimer;
use crate::tooltip::TooltipTracker;

/// How often the host should re-collect its focusable targets
pub const TARGET_REFRESH_INTERVAL_SECONDS: f64 = 0.1;

/// Everything one [`HeadTracker::update`] produced
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub focus: FocusContext,
    /// Dwell click fired this frame
    pub click: Option<ClickEvent>,
    pub idle_transition_level: f32,
    /// The host should re-collect targets and [`FocusRegistry::sync`] them
    pub refresh_due: bool,
    /// Events emitted during this update, in order
    pub events: Vec<HeadTrackingEvent>,
}

pub struct HeadTracker {
    settings: Settings,
    enabled: bool,
    registry: FocusRegistry,
    resolver: FocusResolver,
    dispatcher: ClickGestureDispatcher,
    idle: IdleTracker,
    tooltip: TooltipTracker,
    cursor: CursorState,
    scroll: ScrollSpeedMonitor,
    recalibration: RecalibrationCountdown,
    refresh_timer: ChargingTimer,
    hit_tester: Option<Box<dyn HitTester>>,
    bus: EventBus,
    last_focus: Option<FocusContext>,
    was_idle: bool,
    pending: Vec<HeadTrackingEvent>,
}

impl Default for HeadTracker {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl HeadTracker {
    pub fn new(settings: Settings) -> Self {
        Self {
            enabled: !settings.disabled_by_user,
            registry: FocusRegistry::new(),
            resolver: FocusResolver::from_settings(&settings),
            dispatcher: ClickGestureDispatcher::from_settings(&settings),
            idle: IdleTracker::new(),
            tooltip: TooltipTracker::new(),
            cursor: CursorState::new(),
            scroll: ScrollSpeedMonitor::new(),
            recalibration: RecalibrationCountdown::new(),
            refresh_timer: ChargingTimer::new(TARGET_REFRESH_INTERVAL_SECONDS).with_cycle(false),
            hit_tester: None,
            bus: EventBus::new(),
            last_focus: None,
            was_idle: false,
            pending: Vec::new(),
            settings,
        }
    }

    /// Use host hit testing instead of the registry's stacking order
    pub fn with_hit_tester(mut self, hit_tester: impl HitTester + 'static) -> Self {
        self.hit_tester = Some(Box::new(hit_tester));
        self
    }

    pub fn set_hit_tester(&mut self, hit_tester: Option<Box<dyn HitTester>>) {
        self.hit_tester = hit_tester;
    }

    pub fn subscribe(&mut self, sink: impl EventSink + 'static) {
        self.bus.subscribe(sink);
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Apply new settings. Changing the click gesture or the dwell time drops
    /// every focus level so a dwell click always takes a full dwell.
    pub fn set_settings(&mut self, settings: Settings) {
        if settings.click_gesture != self.settings.click_gesture
            || settings.dwell_time_secs != self.settings.dwell_time_secs
        {
            debug!(gesture = %settings.click_gesture, "click timing changed; focus levels reset");
            self.registry.reset_focus_levels();
        }
        self.resolver.apply_settings(&settings);
        self.dispatcher.apply_settings(&settings);
        let enabled = !settings.disabled_by_user;
        self.settings = settings;
        if enabled != self.enabled {
            self.set_enabled(enabled);
        }
    }

    pub fn registry(&self) -> &FocusRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut FocusRegistry {
        &mut self.registry
    }

    pub fn dispatcher_mut(&mut self) -> &mut ClickGestureDispatcher {
        &mut self.dispatcher
    }

    pub fn cursor(&self) -> &CursorState {
        &self.cursor
    }

    pub fn last_focus(&self) -> Option<&FocusContext> {
        self.last_focus.as_ref()
    }

    pub fn focus_level(&self, id: TargetId) -> f32 {
        self.registry.focus_level(id)
    }

    pub fn idle_transition_level(&self) -> f32 {
        self.idle.idle_transition_level()
    }

    pub fn is_idle(&self) -> bool {
        self.idle.is_idle()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_recalibrating(&self) -> bool {
        self.recalibration.is_running()
    }

    fn interaction(&self) -> InteractionState {
        InteractionState {
            cursor_mode: self.cursor.actual_mode(),
            scrolling_fast: self.scroll.is_scrolling_fast(),
        }
    }

    fn click_gate(&self) -> ClickGate {
        ClickGate {
            cursor_active: self.enabled && self.cursor.active,
            gesture: self.settings.click_gesture,
            interaction: self.interaction(),
        }
    }

    /// Publish and record for the current frame report
    fn emit(&mut self, event: HeadTrackingEvent) {
        self.bus.publish(&event);
        self.pending.push(event);
    }

    /// Process one tracking frame
    pub fn update(&mut self, sample: CursorSample) -> FrameReport {
        let secs = sample.elapsed();

        if self.recalibration.update(secs) {
            info!("recalibration finished");
            self.cursor.active = true;
            self.idle.reset();
            self.emit(HeadTrackingEvent::Recalibrated);
        }

        self.refresh_timer.update(secs, true);
        let refresh_due = self.refresh_timer.consume_if_charged(|| trace!("target refresh due"));

        if !self.cursor.actual_mode().is_scroll_mode() {
            self.scroll.clear();
        }

        let focus = if self.enabled && self.cursor.active {
            let interaction = self.interaction();
            self.resolver.resolve(
                &mut self.registry,
                &sample,
                &interaction,
                self.hit_tester.as_deref(),
            )
        } else {
            self.resolver.resolve_unfocused(&mut self.registry, &sample)
        };

        let previous = self.last_focus.as_ref().and_then(|f| f.focused);
        if previous != focus.focused {
            debug!(?previous, current = ?focus.focused, "focus changed");
            self.emit(HeadTrackingEvent::FocusChanged {
                previous,
                current: focus.focused,
            });
        }
        self.bus.publish_focus(&focus);

        let gate = self.click_gate();
        let click = match self.dispatcher.on_focus_update(&focus, &gate, &mut self.registry) {
            ClickOutcome::Clicked(click) => Some(click),
            _ => None,
        };

        self.idle.update(secs, sample.is_moving_fast);
        if let Some(click) = click {
            self.idle.reset();
            self.emit(HeadTrackingEvent::Click(click));
        }
        let is_idle = self.idle.is_idle();
        if is_idle != self.was_idle {
            self.was_idle = is_idle;
            info!(idle = is_idle, "idle state changed");
            self.emit(HeadTrackingEvent::IdleChanged { idle: is_idle });
        }

        let tooltip_target = if gate.cursor_active { focus.focused } else { None };
        for event in self.tooltip.update(tooltip_target, secs, &self.registry) {
            self.emit(event.into());
        }

        self.last_focus = Some(focus.clone());
        FrameReport {
            focus,
            click,
            idle_transition_level: self.idle.idle_transition_level(),
            refresh_due,
            events: std::mem::take(&mut self.pending),
        }
    }

    /// Handle a completed blink against the most recent focus
    pub fn blink(&mut self, blink: BlinkEvent) -> ClickOutcome {
        let gate = self.click_gate();
        let outcome = self.dispatcher.on_blink(
            &blink,
            self.last_focus.as_ref(),
            &gate,
            &mut self.registry,
        );
        match &outcome {
            ClickOutcome::Clicked(click) => {
                self.idle.reset();
                self.bus.publish(&HeadTrackingEvent::Click(*click));
            }
            ClickOutcome::TooShort { target, duration } => {
                self.bus.publish(&HeadTrackingEvent::TooShortClick {
                    target: *target,
                    duration: *duration,
                });
            }
            ClickOutcome::Suppressed(_) => {}
        }
        outcome
    }

    /// Turn head tracking on or off. Turning it off drops all focus.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled == enabled {
            return;
        }
        info!(enabled, "head tracking toggled");
        self.enabled = enabled;
        if !enabled {
            self.registry.reset_focus_levels();
            if let Some(event) = self.tooltip.dispose() {
                self.bus.publish(&event.into());
            }
            if let Some(previous) = self.last_focus.take().and_then(|f| f.focused) {
                self.bus.publish(&HeadTrackingEvent::FocusChanged {
                    previous: Some(previous),
                    current: None,
                });
            }
        }
    }

    /// Deactivate the cursor for the recalibration countdown
    pub fn begin_recalibration(&mut self) -> bool {
        if !self.recalibration.begin() {
            return false;
        }
        info!("recalibration started");
        self.cursor.active = false;
        self.idle.reset();
        self.bus.publish(&HeadTrackingEvent::RecalibrationStarted);
        true
    }

    pub fn toggle_cursor_mode(&mut self, toggle: CursorToggle) -> CursorMode {
        let mode = self.cursor.toggle(toggle);
        self.announce_mode(mode);
        mode
    }

    pub fn set_cursor_mode(&mut self, mode: CursorMode) {
        if self.cursor.selected_mode() != mode {
            self.cursor.set_mode(mode);
            self.announce_mode(mode);
        }
    }

    fn announce_mode(&mut self, mode: CursorMode) {
        debug!(%mode, "cursor mode changed");
        self.bus.publish(&HeadTrackingEvent::CursorModeChanged { mode });
    }

    /// An inactive cursor neither focuses nor clicks
    pub fn set_cursor_active(&mut self, active: bool) {
        self.cursor.active = active;
    }

    pub fn set_keyboard_visible(&mut self, visible: bool) {
        self.cursor.keyboard_visible = visible;
    }

    pub fn record_scroll_speed(&mut self, scroller: ScrollerId, horizontal: f64, vertical: f64) {
        self.scroll.record(scroller, horizontal, vertical);
    }

    pub fn scroll_monitor_mut(&mut self) -> &mut ScrollSpeedMonitor {
        &mut self.scroll
    }
}
