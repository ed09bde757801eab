//! Focus, click and idle timing for head-tracked cursors
//!
//! All components are synchronous state machines driven by caller-supplied
//! elapsed time. [`HeadTracker`] owns one of each and is the usual entry
//! point; the individual components are public for hosts that wire them up
//! differently.

pub mod click;
pub mod cursor;
pub mod event;
pub mod focus;
pub mod geometry;
pub mod idle;
pub mod input;
pub mod recalibration;
pub mod scroll;
pub mod timer;
pub mod tooltip;
pub mod tracker;

pub use click::{ClickAction, ClickEvent, ClickGate, ClickGestureDispatcher, ClickOutcome, SuppressReason};
pub use cursor::{CursorMode, CursorState, CursorToggle};
pub use event::{EventBus, EventLog, EventSink, HeadTrackingEvent};
pub use focus::{
    FocusContext, FocusRegistry, FocusResolver, Focusable, HitTester, InteractionState, TargetId,
    DEFAULT_FOCUS_DURATION,
};
pub use geometry::{Point, Rect, Size};
pub use idle::IdleTracker;
pub use input::{BlinkEvent, CursorSample};
pub use recalibration::RecalibrationCountdown;
pub use scroll::{ScrollSpeedMonitor, ScrollerId, SCROLLING_FAST_SPEED_THRESHOLD};
pub use timer::{ChargeUpdate, ChargingTimer};
pub use tooltip::{TooltipEvent, TooltipTracker};
pub use tracker::{FrameReport, HeadTracker, TARGET_REFRESH_INTERVAL_SECONDS};
