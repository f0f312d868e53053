use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::time::scale_duration;
use crate::core::{Period, TickInterval, TimeScale, Viewport};

/// Headroom applied to the minimal tick spacing when picking an interval.
const SPACING_HEADROOM: f64 = 1.1;

/// One tick mark on a period row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub timestamp: DateTime<Utc>,
    /// Horizontal offset in pixels from the viewport center.
    pub position: f64,
    /// Set only on the first tick: the latest boundary left of the viewport,
    /// pinned to the left edge.
    pub is_behind_visible_range: bool,
}

pub type TickList = SmallVec<[Tick; 16]>;

/// Builds tick sequences for each period row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickGenerator {
    min_tick_spacing_px: f64,
}

impl TickGenerator {
    #[must_use]
    pub fn new(min_tick_spacing_px: f64) -> Self {
        Self {
            min_tick_spacing_px,
        }
    }

    #[must_use]
    pub fn min_tick_spacing_px(self) -> f64 {
        self.min_tick_spacing_px
    }

    /// Smallest candidate interval of `period` that keeps ticks comfortably
    /// apart at `duration_per_pixel`. `None` hides the period.
    #[must_use]
    pub fn select_interval(
        self,
        period: Period,
        duration_per_pixel: TimeDelta,
    ) -> Option<TickInterval> {
        let minimal = scale_duration(
            duration_per_pixel,
            SPACING_HEADROOM * self.min_tick_spacing_px,
        );
        period
            .spec()
            .intervals
            .iter()
            .copied()
            .find(|interval| interval.nominal_duration() >= minimal)
    }

    /// Ticks for `period` across `viewport`, ordered by time and position.
    ///
    /// The first tick is the sentinel. Walking forward, a step that crosses
    /// into a new parent period is snapped to the parent's start unless the
    /// interval divides the parent evenly, and a tick landing closer than the
    /// minimal spacing to its predecessor replaces it. The walk ends with the
    /// first tick at or past the right edge.
    #[must_use]
    pub fn ticks_for_period(
        self,
        period: Period,
        scale: TimeScale,
        viewport: Viewport,
    ) -> TickList {
        let mut ticks = TickList::new();
        if viewport.width == 0 {
            return ticks;
        }
        let Some(interval) = self.select_interval(period, scale.duration_per_pixel()) else {
            return ticks;
        };

        let parent = period.parent();
        let (start_date, end_date) = scale.visible_range(viewport);
        let Some(seed) = seed_timestamp(parent.unwrap_or(period), interval, start_date) else {
            return ticks;
        };

        ticks.push(Tick {
            timestamp: seed,
            position: -viewport.half_width(),
            is_behind_visible_range: true,
        });

        let mut timestamp = seed;
        while let Some(mut next) = interval.checked_add_to(timestamp) {
            if let Some(parent) = parent {
                if !parent.same_instance(timestamp, next) && !interval.evenly_divides(parent) {
                    next = parent.start_of(next);
                }
            }
            timestamp = next;

            self.push_spaced(
                &mut ticks,
                Tick {
                    timestamp,
                    position: scale.time_to_pixel(timestamp),
                    is_behind_visible_range: false,
                },
            );

            if timestamp >= end_date {
                break;
            }
        }

        ticks
    }

    fn push_spaced(self, ticks: &mut TickList, tick: Tick) {
        if let Some(previous) = ticks.last() {
            if tick.position - previous.position < self.min_tick_spacing_px {
                // The sentinel always survives; a tick crowding it is skipped.
                if previous.is_behind_visible_range {
                    return;
                }
                ticks.pop();
            }
        }
        ticks.push(tick);
    }
}

/// Latest interval boundary before `start_date`, counted from the start of
/// the enclosing `anchor` period.
fn seed_timestamp(
    anchor: Period,
    interval: TickInterval,
    start_date: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    let mut timestamp = anchor.start_of(start_date);
    while timestamp < start_date {
        timestamp = interval.checked_add_to(timestamp)?;
    }
    interval.checked_sub_from(timestamp)
}
