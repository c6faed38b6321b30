//! Generation throttling against a burst-credit balance.
//!
//! Generation is expensive and, left unattended on a burstable cloud
//! instance, drains the instance's CPU credit balance. The throttle polls
//! that balance and closes the gate while it is low, so generation pauses
//! itself until credits replenish.
//!
//! # Gate rule
//!
//! ```text
//! allowed = balance > ceiling(instance class) * threshold_ratio
//! ```
//!
//! - No resolvable host identity: always allowed (fails open).
//! - Unknown instance class: ceiling 0, so allowed only while the balance
//!   is positive.
//! - No sample obtained yet: allowed.
//! - Telemetry failures keep the last polled balance.
//!
//! Generation consults the gate once per tick; a closed gate skips the
//! whole tick.

mod config;
mod credit;
mod host;
mod telemetry;

pub use config::{
    default_ceilings, ThrottleConfig, DEFAULT_POLL_INTERVAL, DEFAULT_THRESHOLD_RATIO, DEFAULT_WINDOW,
};
pub use credit::CreditThrottle;
pub use host::{Ec2MetadataResolver, HostIdentity, HostResolver, DEFAULT_METADATA_URL};
pub use telemetry::{latest_sample, CloudWatchCli, CreditSample, CreditTelemetry};

use std::fmt;
use std::io;

use thiserror::Error;

/// Decides, once per tick, whether generation may run.
pub trait GenerationGate: Send {
    /// Returns true if generation work is permitted right now.
    fn allowed(&mut self) -> bool;

    /// Current gate state for progress reporting.
    fn reading(&mut self) -> ThrottleReading;
}

impl<G: GenerationGate + ?Sized> GenerationGate for Box<G> {
    fn allowed(&mut self) -> bool {
        (**self).allowed()
    }

    fn reading(&mut self) -> ThrottleReading {
        (**self).reading()
    }
}

/// A gate that never closes. Used when throttling is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysAllow;

impl GenerationGate for AlwaysAllow {
    fn allowed(&mut self) -> bool {
        true
    }

    fn reading(&mut self) -> ThrottleReading {
        ThrottleReading {
            allowed: true,
            balance: 0.0,
            ceiling: 0.0,
        }
    }
}

/// Snapshot of the throttle signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrottleReading {
    /// Whether the gate is open.
    pub allowed: bool,
    /// Last polled credit balance.
    pub balance: f64,
    /// Maximum balance for the instance class.
    pub ceiling: f64,
}

impl fmt::Display for ThrottleReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.allowed { "active" } else { "paused" };
        write!(
            f,
            "credits {:.1}/{:.1} ({})",
            self.balance, self.ceiling, state
        )
    }
}

/// Errors resolving the host or querying telemetry.
///
/// None of these are fatal to a run; the throttle logs them and degrades.
#[derive(Debug, Error)]
pub enum ThrottleError {
    /// Instance metadata request failed.
    #[error("Instance metadata request failed: {0}")]
    Metadata(#[from] reqwest::Error),

    /// Instance metadata returned a non-success status.
    #[error("Instance metadata returned HTTP {status} for {path}")]
    MetadataStatus { path: String, status: u16 },

    /// Instance metadata returned an empty value.
    #[error("Instance metadata returned an empty value for {0}")]
    EmptyMetadata(String),

    /// The telemetry command could not be started.
    #[error("Failed to run '{program}': {source}")]
    TelemetrySpawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The telemetry command exited unsuccessfully.
    #[error("Telemetry query exited with {status}: {stderr}")]
    TelemetryExit { status: String, stderr: String },

    /// The telemetry output was not valid JSON.
    #[error("Failed to parse telemetry output: {0}")]
    TelemetryParse(#[from] serde_json::Error),
}
