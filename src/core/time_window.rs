use chrono::{DateTime, TimeDelta, Utc};

use crate::core::time::{clamp_to_now, scale_duration};
use crate::error::{TimelineError, TimelineResult};

/// Inclusive bounds for the zoom level (duration represented by one pixel).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationBounds {
    min: TimeDelta,
    max: TimeDelta,
}

impl DurationBounds {
    pub fn new(min: TimeDelta, max: TimeDelta) -> TimelineResult<Self> {
        if min <= TimeDelta::zero() || max < min {
            return Err(TimelineError::InvalidConfig(format!(
                "duration-per-pixel bounds must satisfy 0 < min <= max (min={min}, max={max})"
            )));
        }
        Ok(Self { min, max })
    }

    #[must_use]
    pub fn min(self) -> TimeDelta {
        self.min
    }

    #[must_use]
    pub fn max(self) -> TimeDelta {
        self.max
    }

    #[must_use]
    pub fn clamp(self, duration: TimeDelta) -> TimeDelta {
        duration.clamp(self.min, self.max)
    }
}

/// Focused instant plus zoom level: everything the axis needs to lay itself out.
///
/// The value is immutable; every input event produces a new window through one
/// of the reducers below, each of which re-applies the clamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    focused_timestamp: DateTime<Utc>,
    duration_per_pixel: TimeDelta,
}

impl TimeWindow {
    /// Builds a window without clamping. Use [`TimeWindow::clamped`] to enforce invariants.
    #[must_use]
    pub fn new(focused_timestamp: DateTime<Utc>, duration_per_pixel: TimeDelta) -> Self {
        Self {
            focused_timestamp,
            duration_per_pixel,
        }
    }

    #[must_use]
    pub fn focused_timestamp(self) -> DateTime<Utc> {
        self.focused_timestamp
    }

    #[must_use]
    pub fn duration_per_pixel(self) -> TimeDelta {
        self.duration_per_pixel
    }

    #[must_use]
    pub fn clamped(self, now: DateTime<Utc>, bounds: DurationBounds) -> Self {
        Self {
            focused_timestamp: clamp_to_now(self.focused_timestamp, now),
            duration_per_pixel: bounds.clamp(self.duration_per_pixel),
        }
    }

    /// Applies one drag frame. Content follows the pointer, so the focus moves
    /// against the drag direction.
    #[must_use]
    pub fn panned(self, dx: f64, now: DateTime<Utc>) -> Self {
        self.shifted_by_pixels(-dx, now)
    }

    /// Moves the focus by `pixels` worth of time (positive is towards the future).
    #[must_use]
    pub fn shifted_by_pixels(self, pixels: f64, now: DateTime<Utc>) -> Self {
        let delta = scale_duration(self.duration_per_pixel, pixels);
        self.jumped_to(offset_saturating(self.focused_timestamp, delta), now)
    }

    /// Applies one wheel event: `dpp *= sensitivity ^ delta_y`, clamped to `bounds`.
    #[must_use]
    pub fn zoomed(self, delta_y: f64, sensitivity: f64, bounds: DurationBounds) -> Self {
        let factor = sensitivity.powf(delta_y);
        Self {
            focused_timestamp: self.focused_timestamp,
            duration_per_pixel: bounds.clamp(scale_duration(self.duration_per_pixel, factor)),
        }
    }

    #[must_use]
    pub fn jumped_to(self, timestamp: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self {
            focused_timestamp: clamp_to_now(timestamp, now),
            duration_per_pixel: self.duration_per_pixel,
        }
    }
}

/// `time + delta`, pinned to the representable range instead of overflowing.
#[must_use]
pub fn offset_saturating(time: DateTime<Utc>, delta: TimeDelta) -> DateTime<Utc> {
    time.checked_add_signed(delta).unwrap_or(if delta < TimeDelta::zero() {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}
