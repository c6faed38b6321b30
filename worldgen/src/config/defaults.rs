//! Default values and constants for all configuration settings.
//!
//! Contains all `DEFAULT_*` constants and the `ConfigFile::default()`
//! implementation.

use super::settings::*;
use crate::marker::MarkerStrategy;
use crate::orchestrator::{DEFAULT_LOG_INTERVAL, DEFAULT_WORK_BUDGET};
use crate::throttle::{
    default_ceilings, DEFAULT_POLL_INTERVAL, DEFAULT_THRESHOLD_RATIO, DEFAULT_WINDOW,
};

/// Default time between ticks (one server tick).
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 50;

/// Default work budget of one tick.
pub const DEFAULT_WORK_BUDGET_MS: u64 = DEFAULT_WORK_BUDGET.as_millis() as u64;

/// Default time between progress lines.
pub const DEFAULT_LOG_INTERVAL_SECS: u64 = DEFAULT_LOG_INTERVAL.as_secs();

/// Default minimum time between telemetry polls.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = DEFAULT_POLL_INTERVAL.as_secs();

/// Default telemetry lookback.
pub const DEFAULT_WINDOW_SECS: u64 = DEFAULT_WINDOW.as_secs();

/// Default marker database directory name inside the config directory.
pub const DEFAULT_DATABASE_DIR: &str = "database";

/// Default log file name inside the config directory.
pub const DEFAULT_LOG_FILE: &str = "worldgen.log";

impl Default for ConfigFile {
    fn default() -> Self {
        let config_dir = super::file::config_directory();

        Self {
            run: RunSettings {
                tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
                work_budget_ms: DEFAULT_WORK_BUDGET_MS,
                log_interval_secs: DEFAULT_LOG_INTERVAL_SECS,
            },
            markers: MarkerSettings {
                database: config_dir.join(DEFAULT_DATABASE_DIR),
                strategy: MarkerStrategy::default(),
            },
            throttle: ThrottleSettings {
                enabled: true,
                threshold_ratio: DEFAULT_THRESHOLD_RATIO,
                poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
                window_secs: DEFAULT_WINDOW_SECS,
                ceilings: default_ceilings().into_iter().collect(),
            },
            logging: LoggingSettings {
                file: config_dir.join(DEFAULT_LOG_FILE),
            },
        }
    }
}
