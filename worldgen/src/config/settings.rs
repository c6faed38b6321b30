//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::marker::MarkerStrategy;
use crate::orchestrator::OrchestratorConfig;
use crate::throttle::ThrottleConfig;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Tick pacing
    pub run: RunSettings,
    /// Marker database
    pub markers: MarkerSettings,
    /// Credit throttle
    pub throttle: ThrottleSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Run pacing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    /// Time between ticks in milliseconds
    pub tick_interval_ms: u64,
    /// Work budget of one tick in milliseconds
    pub work_budget_ms: u64,
    /// Time between progress lines in seconds
    pub log_interval_secs: u64,
}

/// Marker database configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerSettings {
    /// Root directory holding `{version}/{dimension id}` marker directories
    pub database: PathBuf,
    /// How markers are read during inspection
    pub strategy: MarkerStrategy,
}

/// Credit throttle configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ThrottleSettings {
    /// Gate generation on the host's credit balance
    pub enabled: bool,
    /// Fraction of the ceiling the balance must exceed
    pub threshold_ratio: f64,
    /// Minimum seconds between telemetry polls
    pub poll_interval_secs: u64,
    /// Telemetry lookback in seconds
    pub window_secs: u64,
    /// Maximum credit balance per instance class
    pub ceilings: BTreeMap<String, f64>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}

impl ConfigFile {
    /// Time between ticks.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.run.tick_interval_ms)
    }

    /// Pacing for the orchestrator.
    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            work_budget: Duration::from_millis(self.run.work_budget_ms),
            log_interval: Duration::from_secs(self.run.log_interval_secs),
        }
    }

    /// Throttle configuration.
    pub fn throttle_config(&self) -> ThrottleConfig {
        ThrottleConfig {
            ceilings: self
                .throttle
                .ceilings
                .iter()
                .map(|(class, ceiling)| (class.clone(), *ceiling))
                .collect(),
            threshold_ratio: self.throttle.threshold_ratio,
            poll_interval: Duration::from_secs(self.throttle.poll_interval_secs),
            window: Duration::from_secs(self.throttle.window_secs),
        }
    }
}
