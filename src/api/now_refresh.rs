use std::time::{Duration, Instant};

/// Periodic schedule for refreshing the engine's notion of "now".
///
/// Nothing runs in the background: the host polls with its own monotonic
/// instants, and the schedule only exists between `activate` and
/// `deactivate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NowRefreshSchedule {
    interval: Duration,
    next_due: Option<Instant>,
}

impl NowRefreshSchedule {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    #[must_use]
    pub fn interval(self) -> Duration {
        self.interval
    }

    #[must_use]
    pub fn is_active(self) -> bool {
        self.next_due.is_some()
    }

    pub fn activate(&mut self, at: Instant) {
        self.next_due = at.checked_add(self.interval);
    }

    pub fn deactivate(&mut self) {
        self.next_due = None;
    }

    /// Returns `true` when a refresh is due at `at` and schedules the next one.
    ///
    /// Missed periods collapse into a single refresh.
    pub fn poll(&mut self, at: Instant) -> bool {
        let Some(due) = self.next_due else {
            return false;
        };
        if at < due {
            return false;
        }

        let elapsed_periods = at.duration_since(due).as_nanos() / self.interval.as_nanos().max(1);
        let steps = u32::try_from(elapsed_periods)
            .unwrap_or(u32::MAX)
            .saturating_add(1);
        self.next_due = due.checked_add(self.interval.saturating_mul(steps));
        true
    }

    /// Time left until the next refresh, `None` while inactive.
    #[must_use]
    pub fn time_until_due(self, at: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(at))
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::NowRefreshSchedule;

    #[test]
    fn inactive_schedule_never_fires() {
        let mut schedule = NowRefreshSchedule::new(Duration::from_secs(1));
        let start = Instant::now();

        assert!(!schedule.poll(start + Duration::from_secs(10)));
        assert_eq!(schedule.time_until_due(start), None);
    }

    #[test]
    fn fires_once_per_interval_and_collapses_missed_periods() {
        let mut schedule = NowRefreshSchedule::new(Duration::from_secs(1));
        let start = Instant::now();
        schedule.activate(start);

        assert!(!schedule.poll(start + Duration::from_millis(999)));
        assert!(schedule.poll(start + Duration::from_millis(1_000)));
        assert!(!schedule.poll(start + Duration::from_millis(1_500)));
        assert!(schedule.poll(start + Duration::from_millis(5_200)));
        assert_eq!(
            schedule.time_until_due(start + Duration::from_millis(5_200)),
            Some(Duration::from_millis(800))
        );
    }

    #[test]
    fn deactivate_cancels_pending_refresh() {
        let mut schedule = NowRefreshSchedule::new(Duration::from_secs(1));
        let start = Instant::now();
        schedule.activate(start);
        schedule.deactivate();

        assert!(!schedule.is_active());
        assert!(!schedule.poll(start + Duration::from_secs(2)));
    }
}
