//! Credit balance telemetry.

use std::process::Command;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use serde::Deserialize;

use super::{HostIdentity, ThrottleError};

/// Aggregation period of each telemetry datapoint, in seconds.
const PERIOD_SECS: u64 = 300;

/// One credit balance datapoint.
#[derive(Debug, Clone, PartialEq)]
pub struct CreditSample {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// Source of credit balance samples for a host.
pub trait CreditTelemetry: Send {
    /// Samples within the last `window`, in any order.
    fn samples(&self, host: &HostIdentity, window: Duration) -> Result<Vec<CreditSample>, ThrottleError>;
}

/// Most recent sample by timestamp.
pub fn latest_sample(samples: &[CreditSample]) -> Option<&CreditSample> {
    samples.iter().max_by_key(|s| s.timestamp)
}

/// Queries CloudWatch through the `aws` command line client.
#[derive(Debug, Clone)]
pub struct CloudWatchCli {
    program: String,
}

impl CloudWatchCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for CloudWatchCli {
    fn default() -> Self {
        Self::new("aws")
    }
}

impl CreditTelemetry for CloudWatchCli {
    fn samples(&self, host: &HostIdentity, window: Duration) -> Result<Vec<CreditSample>, ThrottleError> {
        let end = Utc::now();
        let lookback = TimeDelta::from_std(window).unwrap_or(TimeDelta::MAX);
        let start = end.checked_sub_signed(lookback).unwrap_or(DateTime::<Utc>::MIN_UTC);

        let output = Command::new(&self.program)
            .args(["cloudwatch", "get-metric-statistics"])
            .args(["--namespace", "AWS/EC2"])
            .args(["--metric-name", "CPUCreditBalance"])
            .arg("--start-time")
            .arg(start.to_rfc3339_opts(SecondsFormat::Secs, true))
            .arg("--end-time")
            .arg(end.to_rfc3339_opts(SecondsFormat::Secs, true))
            .arg("--period")
            .arg(PERIOD_SECS.to_string())
            .args(["--statistics", "Maximum"])
            .arg("--dimensions")
            .arg(format!("Name=InstanceId,Value={}", host.instance_id))
            .args(["--output", "json"])
            .output()
            .map_err(|source| ThrottleError::TelemetrySpawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ThrottleError::TelemetryExit {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_statistics(&output.stdout)
    }
}

#[derive(Debug, Deserialize)]
struct Statistics {
    #[serde(rename = "Datapoints", default)]
    datapoints: Vec<Datapoint>,
}

#[derive(Debug, Deserialize)]
struct Datapoint {
    #[serde(rename = "Timestamp")]
    timestamp: String,
    #[serde(rename = "Maximum")]
    maximum: f64,
}

/// Parses `get-metric-statistics` JSON output.
///
/// Datapoints with unparseable timestamps are skipped.
fn parse_statistics(bytes: &[u8]) -> Result<Vec<CreditSample>, ThrottleError> {
    let stats: Statistics = serde_json::from_slice(bytes)?;
    Ok(stats
        .datapoints
        .into_iter()
        .filter_map(|point| {
            let timestamp = DateTime::parse_from_rfc3339(&point.timestamp).ok()?;
            Some(CreditSample {
                timestamp: timestamp.with_timezone(&Utc),
                value: point.maximum,
            })
        })
        .collect())
}
