use chrono::{DateTime, TimeDelta, Utc};

use crate::core::time::truncate_to_seconds;
use crate::core::time_window::offset_saturating;
use crate::core::{LinearScale, TimeWindow, Viewport};
use crate::error::{TimelineError, TimelineResult};

const MILLIS_PER_SECOND: f64 = 1_000.0;
const NANOS_PER_MILLI: f64 = 1_000_000.0;
const MAX_SUBSEC_NANOS: f64 = 999_999_999.0;

/// Pixel <-> calendar-time mapping for one `TimeWindow`.
///
/// The normalized range `[-1, 1]` covers `[focus - dpp, focus + dpp]`, so the
/// focused instant sits at pixel `0` and one pixel spans exactly one
/// duration-per-pixel. The focus is truncated to whole seconds first, which
/// keeps tick positions from jittering on sub-second pans.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    center: DateTime<Utc>,
    duration_per_pixel: TimeDelta,
    linear: LinearScale,
}

impl TimeScale {
    pub fn new(window: TimeWindow) -> TimelineResult<Self> {
        let center = truncate_to_seconds(window.focused_timestamp());
        let duration_per_pixel = window.duration_per_pixel();
        if duration_per_pixel <= TimeDelta::zero() {
            return Err(TimelineError::InvalidData(
                "duration per pixel must be > 0".to_owned(),
            ));
        }

        let start = offset_saturating(center, -duration_per_pixel);
        let end = offset_saturating(center, duration_per_pixel);
        let linear = LinearScale::new((epoch_millis(start), epoch_millis(end)), (-1.0, 1.0))?;

        Ok(Self {
            center,
            duration_per_pixel,
            linear,
        })
    }

    /// The instant at pixel `0`.
    #[must_use]
    pub fn center(self) -> DateTime<Utc> {
        self.center
    }

    #[must_use]
    pub fn duration_per_pixel(self) -> TimeDelta {
        self.duration_per_pixel
    }

    /// Calendar window mapped onto the normalized range `[-1, 1]`.
    #[must_use]
    pub fn domain(self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.pixel_to_time(-1.0), self.pixel_to_time(1.0))
    }

    #[must_use]
    pub fn time_to_pixel(self, time: DateTime<Utc>) -> f64 {
        self.linear.map(epoch_millis(time))
    }

    #[must_use]
    pub fn pixel_to_time(self, pixel: f64) -> DateTime<Utc> {
        from_epoch_millis(self.linear.invert(pixel))
    }

    /// Calendar bounds of a viewport laid out symmetrically around the focus.
    #[must_use]
    pub fn visible_range(self, viewport: Viewport) -> (DateTime<Utc>, DateTime<Utc>) {
        let half_width = viewport.half_width();
        (
            self.pixel_to_time(-half_width),
            self.pixel_to_time(half_width),
        )
    }
}

fn epoch_millis(time: DateTime<Utc>) -> f64 {
    time.timestamp() as f64 * MILLIS_PER_SECOND
        + f64::from(time.timestamp_subsec_nanos()) / NANOS_PER_MILLI
}

fn from_epoch_millis(millis: f64) -> DateTime<Utc> {
    let saturated = if millis.is_sign_negative() {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    };
    if !millis.is_finite() {
        return saturated;
    }

    let seconds = (millis / MILLIS_PER_SECOND).floor();
    let nanos = ((millis - seconds * MILLIS_PER_SECOND) * NANOS_PER_MILLI)
        .round()
        .clamp(0.0, MAX_SUBSEC_NANOS);
    if seconds.abs() >= i64::MAX as f64 {
        return saturated;
    }
    DateTime::from_timestamp(seconds as i64, nanos as u32).unwrap_or(saturated)
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};

    use super::TimeScale;
    use crate::core::{TimeWindow, Viewport};

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 6, 15, 12, 0, 0)
            .single()
            .expect("valid date")
    }

    #[test]
    fn focus_maps_to_zero_and_one_pixel_is_one_duration() {
        let scale =
            TimeScale::new(TimeWindow::new(noon(), TimeDelta::minutes(1))).expect("time scale");

        assert_eq!(scale.time_to_pixel(noon()), 0.0);
        assert!((scale.time_to_pixel(noon() + TimeDelta::minutes(5)) - 5.0).abs() < 1e-9);
        assert_eq!(scale.pixel_to_time(-60.0), noon() - TimeDelta::hours(1));
    }

    #[test]
    fn sub_second_focus_is_truncated() {
        let window = TimeWindow::new(noon() + TimeDelta::milliseconds(700), TimeDelta::seconds(1));
        let scale = TimeScale::new(window).expect("time scale");

        assert_eq!(scale.center(), noon());
        assert_eq!(
            scale.domain(),
            (noon() - TimeDelta::seconds(1), noon() + TimeDelta::seconds(1))
        );
    }

    #[test]
    fn visible_range_inverts_half_width() {
        let scale =
            TimeScale::new(TimeWindow::new(noon(), TimeDelta::minutes(1))).expect("time scale");

        let (start, end) = scale.visible_range(Viewport::new(800, 60));

        assert_eq!(start, noon() - TimeDelta::minutes(400));
        assert_eq!(end, noon() + TimeDelta::minutes(400));
    }

    #[test]
    fn rejects_non_positive_duration_per_pixel() {
        assert!(TimeScale::new(TimeWindow::new(noon(), TimeDelta::zero())).is_err());
    }
}
