//! Throttle configuration.

use std::collections::HashMap;
use std::time::Duration;

/// Fraction of the ceiling the balance must exceed for the gate to open.
pub const DEFAULT_THRESHOLD_RATIO: f64 = 0.2;

/// Default minimum time between telemetry polls (5 minutes).
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Default telemetry lookback window (10 minutes).
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(10 * 60);

/// Configuration for [`CreditThrottle`](super::CreditThrottle).
#[derive(Debug, Clone, PartialEq)]
pub struct ThrottleConfig {
    /// Maximum credit balance per instance class.
    pub ceilings: HashMap<String, f64>,
    /// Gate opens while `balance > ceiling * threshold_ratio`.
    pub threshold_ratio: f64,
    /// Minimum time between telemetry polls; cached value in between.
    pub poll_interval: Duration,
    /// How far back each telemetry query looks.
    pub window: Duration,
}

impl ThrottleConfig {
    /// Ceiling for an instance class; 0 for unknown classes.
    pub fn ceiling_for(&self, instance_class: &str) -> f64 {
        self.ceilings.get(instance_class).copied().unwrap_or(0.0)
    }
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            ceilings: default_ceilings(),
            threshold_ratio: DEFAULT_THRESHOLD_RATIO,
            poll_interval: DEFAULT_POLL_INTERVAL,
            window: DEFAULT_WINDOW,
        }
    }
}

/// Maximum CPU credit balances of the T2 burstable instance family.
pub fn default_ceilings() -> HashMap<String, f64> {
    [
        ("t2.nano", 72.0),
        ("t2.micro", 144.0),
        ("t2.small", 288.0),
        ("t2.medium", 576.0),
        ("t2.large", 864.0),
        ("t2.xlarge", 1296.0),
        ("t2.2xlarge", 1958.4),
    ]
    .into_iter()
    .map(|(class, ceiling)| (class.to_string(), ceiling))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ThrottleConfig::default();
        assert_eq!(config.threshold_ratio, 0.2);
        assert_eq!(config.poll_interval, Duration::from_secs(300));
        assert_eq!(config.window, Duration::from_secs(600));
        assert_eq!(config.ceilings.len(), 7);
    }

    #[test]
    fn test_ceiling_lookup() {
        let config = ThrottleConfig::default();
        assert_eq!(config.ceiling_for("t2.small"), 288.0);
        assert_eq!(config.ceiling_for("m5.large"), 0.0);
    }
}
