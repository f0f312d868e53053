use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::Viewport;
use crate::interaction::InteractionMode;

/// Read-only state snapshot passed to listener hooks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineContext {
    pub viewport: Viewport,
    pub focused_timestamp: DateTime<Utc>,
    pub duration_per_pixel_ms: f64,
    pub timestamp_now: DateTime<Utc>,
    pub paused_at: Option<DateTime<Utc>>,
    pub interaction_mode: InteractionMode,
}

/// Event stream exposed to listeners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TimelineEvent {
    PanStarted,
    /// Fired on every drag frame while panning.
    PanUpdated { timestamp: DateTime<Utc> },
    /// Fired once when a pan gesture ends, with the final focus.
    PanEnded { timestamp: DateTime<Utc> },
    /// Fired on tick clicks and forward/backward jumps.
    InstantJump { timestamp: DateTime<Utc> },
    ZoomChanged { duration_per_pixel_ms: f64 },
    NowRefreshed { timestamp_now: DateTime<Utc> },
}

/// Hook interface for host-side reactions to timeline navigation.
pub trait TimelineListener {
    fn id(&self) -> &str;
    fn on_event(&mut self, event: TimelineEvent, context: TimelineContext);
}

type TimestampCallback = Box<dyn FnMut(DateTime<Utc>)>;

/// Closure-based listener covering the three navigation callbacks hosts
/// usually wire to application state.
pub struct TimelineCallbacks {
    id: String,
    on_pan_update: Option<TimestampCallback>,
    on_pan_end: Option<TimestampCallback>,
    on_instant_jump: Option<TimestampCallback>,
}

impl TimelineCallbacks {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            on_pan_update: None,
            on_pan_end: None,
            on_instant_jump: None,
        }
    }

    #[must_use]
    pub fn on_pan_update(mut self, callback: impl FnMut(DateTime<Utc>) + 'static) -> Self {
        self.on_pan_update = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub fn on_pan_end(mut self, callback: impl FnMut(DateTime<Utc>) + 'static) -> Self {
        self.on_pan_end = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub fn on_instant_jump(mut self, callback: impl FnMut(DateTime<Utc>) + 'static) -> Self {
        self.on_instant_jump = Some(Box::new(callback));
        self
    }
}

impl TimelineListener for TimelineCallbacks {
    fn id(&self) -> &str {
        &self.id
    }

    fn on_event(&mut self, event: TimelineEvent, _context: TimelineContext) {
        let (callback, timestamp) = match event {
            TimelineEvent::PanUpdated { timestamp } => (self.on_pan_update.as_mut(), timestamp),
            TimelineEvent::PanEnded { timestamp } => (self.on_pan_end.as_mut(), timestamp),
            TimelineEvent::InstantJump { timestamp } => (self.on_instant_jump.as_mut(), timestamp),
            TimelineEvent::PanStarted
            | TimelineEvent::ZoomChanged { .. }
            | TimelineEvent::NowRefreshed { .. } => return,
        };
        if let Some(callback) = callback {
            callback(timestamp);
        }
    }
}

impl std::fmt::Debug for TimelineCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimelineCallbacks")
            .field("id", &self.id)
            .field("on_pan_update", &self.on_pan_update.is_some())
            .field("on_pan_end", &self.on_pan_end.is_some())
            .field("on_instant_jump", &self.on_instant_jump.is_some())
            .finish()
    }
}
