//! Typed tracker events and observers

use serde::Serialize;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::click::ClickEvent;
use crate::cursor::CursorMode;
use crate::focus::{FocusContext, TargetId};
use crate::tooltip::TooltipEvent;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HeadTrackingEvent {
    FocusChanged {
        previous: Option<TargetId>,
        current: Option<TargetId>,
    },
    Click(ClickEvent),
    TooShortClick {
        target: TargetId,
        duration: f64,
    },
    TooltipShown {
        target: TargetId,
        text: String,
    },
    TooltipHidden {
        target: TargetId,
    },
    IdleChanged {
        idle: bool,
    },
    CursorModeChanged {
        mode: CursorMode,
    },
    RecalibrationStarted,
    Recalibrated,
}

impl From<TooltipEvent> for HeadTrackingEvent {
    fn from(event: TooltipEvent) -> Self {
        match event {
            TooltipEvent::Shown { target, text } => HeadTrackingEvent::TooltipShown { target, text },
            TooltipEvent::Hidden { target } => HeadTrackingEvent::TooltipHidden { target },
        }
    }
}

impl fmt::Display for HeadTrackingEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn target(id: &Option<TargetId>) -> String {
            id.map_or_else(|| "none".to_string(), |id| id.to_string())
        }

        match self {
            HeadTrackingEvent::FocusChanged { previous, current } => {
                write!(f, "focus {} -> {}", target(previous), target(current))
            }
            HeadTrackingEvent::Click(click) => write!(
                f,
                "{} click on {} at ({:.1}, {:.1})",
                click.gesture, click.target, click.point.x, click.point.y
            ),
            HeadTrackingEvent::TooShortClick { target, duration } => {
                write!(f, "too short click on {} ({:.3}s)", target, duration)
            }
            HeadTrackingEvent::TooltipShown { target, text } => {
                write!(f, "tooltip on {}: {}", target, text)
            }
            HeadTrackingEvent::TooltipHidden { target } => write!(f, "tooltip hidden on {}", target),
            HeadTrackingEvent::IdleChanged { idle: true } => f.write_str("idle"),
            HeadTrackingEvent::IdleChanged { idle: false } => f.write_str("active"),
            HeadTrackingEvent::CursorModeChanged { mode } => write!(f, "cursor mode {}", mode),
            HeadTrackingEvent::RecalibrationStarted => f.write_str("recalibration started"),
            HeadTrackingEvent::Recalibrated => f.write_str("recalibrated"),
        }
    }
}

/// Observer of tracker output
pub trait EventSink {
    fn on_event(&mut self, event: &HeadTrackingEvent);

    /// Called once per update with the resolved focus
    fn on_focus(&mut self, _focus: &FocusContext) {}
}

impl<F> EventSink for F
where
    F: FnMut(&HeadTrackingEvent),
{
    fn on_event(&mut self, event: &HeadTrackingEvent) {
        self(event)
    }
}

/// Fan-out to every subscribed sink, in subscription order
#[derive(Default)]
pub struct EventBus {
    sinks: Vec<Box<dyn EventSink>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, sink: impl EventSink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn publish(&mut self, event: &HeadTrackingEvent) {
        for sink in &mut self.sinks {
            sink.on_event(event);
        }
    }

    pub fn publish_focus(&mut self, focus: &FocusContext) {
        for sink in &mut self.sinks {
            sink.on_focus(focus);
        }
    }
}

/// Recording sink; clones share the same log
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<HeadTrackingEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<HeadTrackingEvent> {
        self.events.borrow().clone()
    }

    pub fn take(&self) -> Vec<HeadTrackingEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn clicks(&self) -> Vec<ClickEvent> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                HeadTrackingEvent::Click(click) => Some(*click),
                _ => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl EventSink for EventLog {
    fn on_event(&mut self, event: &HeadTrackingEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use headtrack_config::ClickGesture;

    #[test]
    fn test_log_clones_share_events() {
        let log = EventLog::new();
        let mut bus = EventBus::new();
        bus.subscribe(log.clone());
        bus.publish(&HeadTrackingEvent::Recalibrated);
        bus.publish(&HeadTrackingEvent::IdleChanged { idle: true });

        assert_eq!(log.len(), 2);
        assert_eq!(log.take().len(), 2);
        assert!(log.is_empty());
    }

    #[test]
    fn test_closure_sink() {
        let count = Rc::new(RefCell::new(0));
        let seen = Rc::clone(&count);
        let mut bus = EventBus::new();
        bus.subscribe(move |_: &HeadTrackingEvent| *seen.borrow_mut() += 1);
        bus.publish(&HeadTrackingEvent::RecalibrationStarted);
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_serialized_shape() {
        let click = HeadTrackingEvent::Click(ClickEvent {
            target: TargetId(3),
            point: Point::new(1.0, 2.0),
            gesture: ClickGesture::Dwell,
        });
        let value = serde_json::to_value(&click).unwrap();
        assert_eq!(value["type"], "click");
        assert_eq!(value["target"], 3);
        assert_eq!(value["gesture"], "dwell");

        let focus = HeadTrackingEvent::FocusChanged {
            previous: None,
            current: Some(TargetId(1)),
        };
        let value = serde_json::to_value(&focus).unwrap();
        assert_eq!(value["type"], "focus_changed");
        assert!(value["previous"].is_null());
        assert_eq!(value["current"], 1);
    }

    #[test]
    fn test_display() {
        let event = HeadTrackingEvent::FocusChanged {
            previous: Some(TargetId(1)),
            current: None,
        };
        assert_eq!(event.to_string(), "focus #1 -> none");
    }
}
