use std::cell::Cell;
use std::rc::Rc;

use chrono::{DateTime, SubsecRound, TimeDelta, Utc};

const NANOS_PER_MILLI: f64 = 1_000_000.0;
// Keeps the f64 -> i64 cast away from the saturation edge.
const SCALED_NANOS_LIMIT: f64 = 9.0e18;

/// Source of the current instant, provided by the host.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Settable clock shared between a host (or a test) and the engine.
///
/// Clones observe the same instant, so the host can keep one handle and move
/// time forward while the engine owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<Utc>>>,
}

impl ManualClock {
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Rc::new(Cell::new(now)),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    pub fn advance(&self, delta: TimeDelta) {
        let next = self
            .now
            .get()
            .checked_add_signed(delta)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.now.set(next);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

/// Drops sub-second precision.
#[must_use]
pub fn truncate_to_seconds(time: DateTime<Utc>) -> DateTime<Utc> {
    time.trunc_subsecs(0)
}

/// Current instant of `clock`, truncated to whole seconds.
#[must_use]
pub fn now_in_seconds_precision(clock: &dyn Clock) -> DateTime<Utc> {
    truncate_to_seconds(clock.now())
}

#[must_use]
pub fn clamp_to_now(time: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    time.min(now)
}

/// Multiplies `duration` by a real-valued `factor`.
///
/// The product is computed at nanosecond precision when the duration fits in
/// nanoseconds and at millisecond precision otherwise. Results outside the
/// `TimeDelta` range saturate; a NaN factor yields zero.
#[must_use]
pub fn scale_duration(duration: TimeDelta, factor: f64) -> TimeDelta {
    if factor.is_nan() {
        return TimeDelta::zero();
    }

    if let Some(nanos) = duration.num_nanoseconds() {
        let scaled = (nanos as f64 * factor).round();
        if scaled.abs() < SCALED_NANOS_LIMIT {
            return TimeDelta::nanoseconds(scaled as i64);
        }
    }

    let scaled_millis = (duration.num_milliseconds() as f64 * factor).round();
    saturating_millis(scaled_millis)
}

/// Duration magnitude in (fractional) milliseconds.
#[must_use]
pub fn duration_as_millis_f64(duration: TimeDelta) -> f64 {
    match duration.num_nanoseconds() {
        Some(nanos) => nanos as f64 / NANOS_PER_MILLI,
        None => duration.num_milliseconds() as f64,
    }
}

fn saturating_millis(millis: f64) -> TimeDelta {
    let saturated = if millis.is_sign_negative() {
        TimeDelta::MIN
    } else {
        TimeDelta::MAX
    };
    if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
        return saturated;
    }
    TimeDelta::try_milliseconds(millis as i64).unwrap_or(saturated)
}
