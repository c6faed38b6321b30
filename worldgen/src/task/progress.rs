//! Progress snapshots with throughput and completion estimates.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Local, TimeDelta};

use crate::throttle::ThrottleReading;

/// Progress of a task at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressReport {
    /// Task label, e.g. `"inspect"` or `"generate"`.
    pub label: &'static str,
    /// Units processed so far.
    pub processed: u64,
    /// Units the task will process in total.
    pub total: u64,
    /// Time the rate is measured over.
    pub elapsed: Duration,
    /// Throttle state, for tasks gated by one.
    pub throttle: Option<ThrottleReading>,
}

impl ProgressReport {
    /// Completion percentage. An empty task is 100% complete.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.processed as f64 * 100.0 / self.total as f64
    }

    /// Units not yet processed.
    pub fn remaining(&self) -> u64 {
        self.total.saturating_sub(self.processed)
    }

    /// Units per second over `elapsed`. Zero when no time has passed.
    pub fn rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        self.processed as f64 / secs
    }

    /// Estimated completion time from now.
    pub fn eta(&self) -> Option<DateTime<Local>> {
        self.eta_from(Local::now())
    }

    /// Estimated completion time: `now + ceil(remaining / rate)` seconds.
    ///
    /// `None` when the rate is zero or not finite, or when the result does
    /// not fit in a timestamp.
    pub fn eta_from(&self, now: DateTime<Local>) -> Option<DateTime<Local>> {
        let rate = self.rate();
        if !rate.is_finite() || rate <= 0.0 {
            return None;
        }
        let secs = (self.remaining() as f64 / rate).ceil();
        if !secs.is_finite() || secs >= i64::MAX as f64 {
            return None;
        }
        let delta = TimeDelta::try_seconds(secs as i64)?;
        now.checked_add_signed(delta)
    }
}

impl fmt::Display for ProgressReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let eta = match self.eta() {
            Some(t) => t.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => "n/a".to_string(),
        };
        write!(
            f,
            "[{}] {}/{} ({:.2} %, ETA {}) {:.2} [cells/s]",
            self.label,
            self.processed,
            self.total,
            self.percent(),
            eta,
            self.rate()
        )?;
        if let Some(throttle) = &self.throttle {
            write!(f, " {}", throttle)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn report(processed: u64, total: u64, elapsed_secs: u64) -> ProgressReport {
        ProgressReport {
            label: "generate",
            processed,
            total,
            elapsed: Duration::from_secs(elapsed_secs),
            throttle: None,
        }
    }

    #[test]
    fn test_percent_and_rate() {
        let r = report(25, 100, 5);
        assert_eq!(r.percent(), 25.0);
        assert_eq!(r.rate(), 5.0);
        assert_eq!(r.remaining(), 75);
    }

    #[test]
    fn test_empty_task_is_complete() {
        assert_eq!(report(0, 0, 0).percent(), 100.0);
    }

    #[test]
    fn test_eta_rounds_up() {
        let now = Local.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        // 10 processed in 3s -> 3.33/s; 10 remaining -> 3.0s exactly -> ceil 3
        let r = report(10, 20, 3);
        assert_eq!(r.eta_from(now), Some(now + TimeDelta::try_seconds(3).unwrap()));

        // 3 processed in 2s -> 1.5/s; 4 remaining -> 2.67s -> 3
        let r = report(3, 7, 2);
        assert_eq!(r.eta_from(now), Some(now + TimeDelta::try_seconds(3).unwrap()));
    }

    #[test]
    fn test_eta_unavailable_at_zero_rate() {
        let now = Local::now();
        assert_eq!(report(0, 100, 10).eta_from(now), None);
        assert_eq!(report(5, 100, 0).eta_from(now), None);
    }

    #[test]
    fn test_eta_unavailable_on_overflow() {
        // One unit in ~31 years leaves u64::MAX units: far beyond any timestamp.
        let r = report(1, u64::MAX, 1_000_000_000);
        assert_eq!(r.eta_from(Local::now()), None);
    }

    #[test]
    fn test_display_without_eta() {
        let line = report(0, 4, 0).to_string();
        assert!(line.starts_with("[generate] 0/4 (0.00 %, ETA n/a)"), "{}", line);
    }
}
