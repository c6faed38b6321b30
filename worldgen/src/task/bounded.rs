//! The shared budgeted work loop used by every task.

use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

/// Result of one unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A unit was processed; more may remain.
    Continue,
    /// Nothing was left to process.
    Exhausted,
}

/// Why a slice ended.
#[derive(Debug)]
pub enum StopReason<E> {
    /// The time budget ran out.
    BudgetSpent,
    /// The work source ran dry.
    Exhausted,
    /// Cancellation was observed before the next unit.
    Cancelled,
    /// A unit failed. The failed unit is not counted.
    Failed(E),
}

/// Summary of one slice.
#[derive(Debug)]
pub struct SliceOutcome<E> {
    /// Units completed in this slice.
    pub units: u64,
    /// Wall time spent in this slice.
    pub elapsed: Duration,
    /// Why the slice ended.
    pub stop: StopReason<E>,
}

/// Repeatedly calls `step` until the budget is spent, the work is
/// exhausted, `cancel` fires, or a step fails.
///
/// Cancellation is checked before each unit; elapsed time after each unit.
/// At least one unit is attempted per call unless already cancelled, so a
/// zero budget still makes progress.
pub fn run_bounded<E, F>(budget: Duration, cancel: &CancellationToken, mut step: F) -> SliceOutcome<E>
where
    F: FnMut() -> Result<Step, E>,
{
    let start = Instant::now();
    let mut units = 0;

    let stop = loop {
        if cancel.is_cancelled() {
            break StopReason::Cancelled;
        }
        match step() {
            Ok(Step::Continue) => units += 1,
            Ok(Step::Exhausted) => break StopReason::Exhausted,
            Err(e) => break StopReason::Failed(e),
        }
        if start.elapsed() >= budget {
            break StopReason::BudgetSpent;
        }
    };

    SliceOutcome {
        units,
        elapsed: start.elapsed(),
        stop,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_runs_until_exhausted() {
        let cancel = CancellationToken::new();
        let mut remaining = 5;
        let outcome = run_bounded::<(), _>(Duration::from_secs(10), &cancel, || {
            if remaining == 0 {
                return Ok(Step::Exhausted);
            }
            remaining -= 1;
            Ok(Step::Continue)
        });

        assert_eq!(outcome.units, 5);
        assert!(matches!(outcome.stop, StopReason::Exhausted));
    }

    #[test]
    fn test_stops_when_budget_spent() {
        let cancel = CancellationToken::new();
        let mut calls = 0;
        let outcome = run_bounded::<(), _>(Duration::from_millis(20), &cancel, || {
            calls += 1;
            thread::sleep(Duration::from_millis(5));
            Ok(Step::Continue)
        });

        assert!(matches!(outcome.stop, StopReason::BudgetSpent));
        assert_eq!(outcome.units, calls);
        assert!((1..=4).contains(&calls), "unexpected call count {}", calls);
        assert!(outcome.elapsed >= Duration::from_millis(20));
    }

    #[test]
    fn test_zero_budget_still_processes_one_unit() {
        let cancel = CancellationToken::new();
        let outcome = run_bounded::<(), _>(Duration::ZERO, &cancel, || Ok(Step::Continue));
        assert_eq!(outcome.units, 1);
        assert!(matches!(outcome.stop, StopReason::BudgetSpent));
    }

    #[test]
    fn test_cancelled_before_first_unit() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut called = false;
        let outcome = run_bounded::<(), _>(Duration::from_secs(1), &cancel, || {
            called = true;
            Ok(Step::Continue)
        });

        assert!(!called);
        assert_eq!(outcome.units, 0);
        assert!(matches!(outcome.stop, StopReason::Cancelled));
    }

    #[test]
    fn test_cancel_observed_between_units() {
        let cancel = CancellationToken::new();
        let inner = cancel.clone();
        let mut calls = 0;
        let outcome = run_bounded::<(), _>(Duration::from_secs(10), &cancel, || {
            calls += 1;
            if calls == 3 {
                inner.cancel();
            }
            Ok(Step::Continue)
        });

        assert_eq!(outcome.units, 3);
        assert!(matches!(outcome.stop, StopReason::Cancelled));
    }

    #[test]
    fn test_failure_ends_slice_without_counting_unit() {
        let cancel = CancellationToken::new();
        let mut calls = 0;
        let outcome = run_bounded(Duration::from_secs(10), &cancel, || {
            calls += 1;
            if calls == 2 {
                Err("lookup failed")
            } else {
                Ok(Step::Continue)
            }
        });

        assert_eq!(outcome.units, 1);
        assert!(matches!(outcome.stop, StopReason::Failed("lookup failed")));
    }
}
