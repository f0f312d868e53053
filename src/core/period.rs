use chrono::{DateTime, Datelike, Months, NaiveTime, TimeDelta, Timelike, Utc};
use serde::{Deserialize, Serialize};

// Mean Gregorian month length in days is 146097 / 4800.
const GREGORIAN_CYCLE_DAYS: f64 = 146_097.0;
const GREGORIAN_CYCLE_MONTHS: f64 = 4_800.0;

/// Tick granularity level, coarsest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Period {
    Year,
    Month,
    Day,
    Minute,
}

impl Period {
    pub const ALL: [Period; 4] = [Period::Year, Period::Month, Period::Day, Period::Minute];

    #[must_use]
    pub fn spec(self) -> &'static PeriodSpec {
        match self {
            Period::Year => &YEAR_SPEC,
            Period::Month => &MONTH_SPEC,
            Period::Day => &DAY_SPEC,
            Period::Minute => &MINUTE_SPEC,
        }
    }

    #[must_use]
    pub fn parent(self) -> Option<Period> {
        self.spec().parent
    }

    #[must_use]
    pub fn child(self) -> Option<Period> {
        self.spec().child
    }

    /// Start of the instance of this period that contains `time` (UTC).
    #[must_use]
    pub fn start_of(self, time: DateTime<Utc>) -> DateTime<Utc> {
        let date = time.date_naive();
        let naive = match self {
            Period::Year => date.with_ordinal(1).unwrap_or(date).and_time(NaiveTime::MIN),
            Period::Month => date.with_day(1).unwrap_or(date).and_time(NaiveTime::MIN),
            Period::Day => date.and_time(NaiveTime::MIN),
            Period::Minute => date.and_time(
                NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(NaiveTime::MIN),
            ),
        };
        naive.and_utc()
    }

    /// Whether `a` and `b` fall into the same instance of this period.
    #[must_use]
    pub fn same_instance(self, a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
        self.start_of(a) == self.start_of(b)
    }
}

/// Calendar-aware step between two ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TickInterval {
    Minutes(u32),
    Hours(u32),
    Days(u32),
    Weeks(u32),
    Months(u32),
    Years(u32),
}

impl TickInterval {
    /// Length used when comparing intervals against a zoom level.
    ///
    /// Calendar months count as the mean Gregorian month rounded to whole days
    /// (1 month = 30 days, 3 months = 91 days, 1 year = 365 days).
    #[must_use]
    pub fn nominal_duration(self) -> TimeDelta {
        match self {
            TickInterval::Minutes(n) => TimeDelta::minutes(i64::from(n)),
            TickInterval::Hours(n) => TimeDelta::hours(i64::from(n)),
            TickInterval::Days(n) => TimeDelta::days(i64::from(n)),
            TickInterval::Weeks(n) => TimeDelta::weeks(i64::from(n)),
            TickInterval::Months(n) => nominal_months(n),
            TickInterval::Years(n) => nominal_months(n.saturating_mul(12)),
        }
    }

    #[must_use]
    pub fn checked_add_to(self, time: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            TickInterval::Months(n) => time.checked_add_months(Months::new(n)),
            TickInterval::Years(n) => time.checked_add_months(Months::new(n.checked_mul(12)?)),
            fixed => time.checked_add_signed(fixed.nominal_duration()),
        }
    }

    #[must_use]
    pub fn checked_sub_from(self, time: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            TickInterval::Months(n) => time.checked_sub_months(Months::new(n)),
            TickInterval::Years(n) => time.checked_sub_months(Months::new(n.checked_mul(12)?)),
            fixed => time.checked_sub_signed(fixed.nominal_duration()),
        }
    }

    /// Whether stepping from the start of `period` always lands exactly on the
    /// start of the next instance of `period`.
    #[must_use]
    pub fn evenly_divides(self, period: Period) -> bool {
        match (self, period) {
            (TickInterval::Minutes(n), Period::Minute) => n == 1,
            (TickInterval::Minutes(n), Period::Day) => n > 0 && 1_440 % n == 0,
            (TickInterval::Hours(n), Period::Day) => n > 0 && 24 % n == 0,
            (TickInterval::Days(1), Period::Day | Period::Month | Period::Year) => true,
            (TickInterval::Months(n), Period::Month) => n == 1,
            (TickInterval::Months(n), Period::Year) => n > 0 && 12 % n == 0,
            (TickInterval::Years(1), Period::Year) => true,
            _ => false,
        }
    }
}

fn nominal_months(months: u32) -> TimeDelta {
    let days = (f64::from(months) * GREGORIAN_CYCLE_DAYS / GREGORIAN_CYCLE_MONTHS).round();
    TimeDelta::days(days as i64)
}

/// Static per-period tick settings.
#[derive(Debug, PartialEq, Eq)]
pub struct PeriodSpec {
    pub period: Period,
    pub label_format: PeriodLabelFormat,
    pub parent: Option<Period>,
    pub child: Option<Period>,
    /// Ascending candidate spacings.
    pub intervals: &'static [TickInterval],
}

impl PeriodSpec {
    /// Smallest candidate interval; drives the fade thresholds of child periods.
    #[must_use]
    pub fn base_interval(&self) -> TickInterval {
        self.intervals[0]
    }
}

/// How a tick timestamp is turned into a label for one period row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodLabelFormat {
    /// `2021`
    Year,
    /// `June`
    MonthName,
    /// `15th`
    OrdinalDay,
    /// `12:00`
    HourMinute,
}

static YEAR_SPEC: PeriodSpec = PeriodSpec {
    period: Period::Year,
    label_format: PeriodLabelFormat::Year,
    parent: None,
    child: Some(Period::Month),
    intervals: &[TickInterval::Years(1)],
};

static MONTH_SPEC: PeriodSpec = PeriodSpec {
    period: Period::Month,
    label_format: PeriodLabelFormat::MonthName,
    parent: Some(Period::Year),
    child: Some(Period::Day),
    intervals: &[TickInterval::Months(1), TickInterval::Months(3)],
};

static DAY_SPEC: PeriodSpec = PeriodSpec {
    period: Period::Day,
    label_format: PeriodLabelFormat::OrdinalDay,
    parent: Some(Period::Month),
    child: Some(Period::Minute),
    intervals: &[TickInterval::Days(1), TickInterval::Weeks(1)],
};

static MINUTE_SPEC: PeriodSpec = PeriodSpec {
    period: Period::Minute,
    label_format: PeriodLabelFormat::HourMinute,
    parent: Some(Period::Day),
    child: None,
    intervals: &[
        TickInterval::Minutes(1),
        TickInterval::Minutes(5),
        TickInterval::Minutes(15),
        TickInterval::Hours(1),
        TickInterval::Hours(3),
        TickInterval::Hours(6),
    ],
};
