use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::core::Period;
use crate::core::time::{duration_as_millis_f64, scale_duration};

/// Derived per-period row state for one zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodVisibility {
    pub period: Period,
    /// Accumulated shift of this period and every finer period below it.
    pub vertical_shift: f64,
    pub opacity: f64,
}

/// Cross-fades period rows as the zoom level changes.
///
/// A period with a parent fades between two zoom thresholds derived from the
/// parent's base interval: it is fully shown at or below `fade_in` and fully
/// hidden at or above `fade_out`. Interpolation runs on the natural logarithm
/// of the duration because zooming is multiplicative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionController {
    max_tick_spacing_px: f64,
    fade_out_factor: f64,
}

impl TransitionController {
    #[must_use]
    pub fn new(max_tick_spacing_px: f64, fade_out_factor: f64) -> Self {
        Self {
            max_tick_spacing_px,
            fade_out_factor,
        }
    }

    /// `(fade_in, fade_out)` durations-per-pixel, or `None` for root periods.
    #[must_use]
    pub fn fade_thresholds(self, period: Period) -> Option<(TimeDelta, TimeDelta)> {
        let parent = period.parent()?;
        let parent_interval = parent.spec().base_interval().nominal_duration();
        let fade_in = scale_duration(parent_interval, 1.0 / self.max_tick_spacing_px);
        let fade_out = scale_duration(fade_in, self.fade_out_factor);
        Some((fade_in, fade_out))
    }

    /// Shift of `period` alone, in `[0, 1]`.
    #[must_use]
    pub fn own_shift(self, period: Period, duration_per_pixel: TimeDelta) -> f64 {
        let Some((fade_in, fade_out)) = self.fade_thresholds(period) else {
            return 1.0;
        };

        let log_fade_out = duration_as_millis_f64(fade_out).ln();
        let transition_factor = log_fade_out - duration_as_millis_f64(duration_per_pixel).ln();
        let transition_length = log_fade_out - duration_as_millis_f64(fade_in).ln();
        let shift = transition_factor / transition_length;
        if shift.is_nan() {
            return 0.0;
        }
        shift.clamp(0.0, 1.0)
    }

    /// Own shift plus the shifts of every finer period, so a row only moves up
    /// once the rows below it are visible.
    #[must_use]
    pub fn vertical_shift(self, period: Period, duration_per_pixel: TimeDelta) -> f64 {
        let mut shift = 0.0;
        let mut current = Some(period);
        while let Some(level) = current {
            shift += self.own_shift(level, duration_per_pixel);
            current = level.child();
        }
        shift
    }

    #[must_use]
    pub fn opacity(self, period: Period, duration_per_pixel: TimeDelta) -> f64 {
        self.vertical_shift(period, duration_per_pixel).clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn visibility(self, period: Period, duration_per_pixel: TimeDelta) -> PeriodVisibility {
        let vertical_shift = self.vertical_shift(period, duration_per_pixel);
        PeriodVisibility {
            period,
            vertical_shift,
            opacity: vertical_shift.clamp(0.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::TransitionController;
    use crate::core::Period;

    fn controller() -> TransitionController {
        TransitionController::new(415.0, 1.4)
    }

    #[test]
    fn root_period_is_always_fully_shifted() {
        assert_eq!(controller().own_shift(Period::Year, TimeDelta::days(3)), 1.0);
        assert_eq!(controller().own_shift(Period::Year, TimeDelta::seconds(1)), 1.0);
    }

    #[test]
    fn shift_is_one_at_fade_in_and_zero_at_fade_out() {
        let (fade_in, fade_out) = controller()
            .fade_thresholds(Period::Minute)
            .expect("minute has a parent");

        assert!((controller().own_shift(Period::Minute, fade_in) - 1.0).abs() < 1e-9);
        assert!(controller().own_shift(Period::Minute, fade_out).abs() < 1e-9);
    }

    #[test]
    fn vertical_shift_accumulates_down_the_child_chain() {
        let dpp = TimeDelta::seconds(1);

        assert_eq!(controller().vertical_shift(Period::Year, dpp), 4.0);
        assert_eq!(controller().vertical_shift(Period::Day, dpp), 2.0);
        assert_eq!(controller().opacity(Period::Minute, dpp), 1.0);
    }

    #[test]
    fn fine_periods_vanish_when_zoomed_out() {
        let dpp = TimeDelta::days(3);

        assert_eq!(controller().opacity(Period::Minute, dpp), 0.0);
        assert_eq!(controller().opacity(Period::Day, dpp), 0.0);
        assert_eq!(controller().vertical_shift(Period::Year, dpp), 1.0);
    }
}
