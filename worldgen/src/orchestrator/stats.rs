//! Per-run statistics.

use std::fmt;
use std::time::Duration;

use crate::task::ProgressReport;

/// Totals recorded as each phase of a run completes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    /// Cells inspected.
    pub inspected: u64,
    /// Cells found without a marker.
    pub pending: u64,
    /// Cells materialized.
    pub generated: u64,
    /// Time spent inspecting.
    pub inspect_time: Duration,
    /// Time spent inside generation ticks.
    pub generate_time: Duration,
}

impl RunStats {
    pub(super) fn record_inspection(&mut self, report: &ProgressReport) {
        self.inspected = report.processed;
        self.inspect_time = report.elapsed;
    }

    pub(super) fn record_generation(&mut self, report: &ProgressReport) {
        self.generated = report.processed;
        self.generate_time = report.elapsed;
    }

    /// Inspection throughput in cells per second.
    pub fn inspect_rate(&self) -> f64 {
        rate(self.inspected, self.inspect_time)
    }

    /// Generation throughput in cells per second.
    pub fn generate_rate(&self) -> f64 {
        rate(self.generated, self.generate_time)
    }
}

fn rate(count: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        count as f64 / secs
    } else {
        0.0
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "inspected {} ({:.2} cells/s), pending {}, generated {} ({:.2} cells/s)",
            self.inspected,
            self.inspect_rate(),
            self.pending,
            self.generated,
            self.generate_rate()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rates() {
        let stats = RunStats {
            inspected: 100,
            pending: 10,
            generated: 10,
            inspect_time: Duration::from_secs(4),
            generate_time: Duration::ZERO,
        };
        assert_eq!(stats.inspect_rate(), 25.0);
        assert_eq!(stats.generate_rate(), 0.0);
        assert_eq!(
            stats.to_string(),
            "inspected 100 (25.00 cells/s), pending 10, generated 10 (0.00 cells/s)"
        );
    }
}
