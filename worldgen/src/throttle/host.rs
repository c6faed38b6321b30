//! Resolving which instance we are running on.

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;

use super::ThrottleError;

/// Base URL of the EC2 instance metadata service.
pub const DEFAULT_METADATA_URL: &str = "http://169.254.169.254/latest";

/// Identity of the host whose credit balance gates generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostIdentity {
    /// Instance id used to query telemetry, e.g. `i-0abc...`.
    pub instance_id: String,
    /// Instance class used to look up the ceiling, e.g. `t2.small`.
    pub instance_class: String,
}

/// Resolves the current host's identity.
pub trait HostResolver {
    fn resolve(&self) -> Result<HostIdentity, ThrottleError>;
}

/// Reads identity from the EC2 instance metadata service.
///
/// Tries an IMDSv2 session token first and falls back to unauthenticated
/// IMDSv1 requests. Off EC2 the link-local address does not answer, so the
/// short timeout keeps start-up fast.
#[derive(Debug, Clone)]
pub struct Ec2MetadataResolver {
    base_url: String,
    timeout: Duration,
}

impl Ec2MetadataResolver {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(2),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn session_token(&self, client: &Client) -> Option<String> {
        let response = client
            .put(format!("{}/api/token", self.base_url))
            .header("X-aws-ec2-metadata-token-ttl-seconds", "60")
            .send()
            .ok()?;
        if !response.status().is_success() {
            return None;
        }
        response.text().ok().filter(|t| !t.trim().is_empty())
    }

    fn fetch(&self, client: &Client, token: Option<&str>, path: &str) -> Result<String, ThrottleError> {
        let mut request = client.get(format!("{}/meta-data/{}", self.base_url, path));
        if let Some(token) = token {
            request = request.header("X-aws-ec2-metadata-token", token);
        }
        let response = request.send()?;
        if !response.status().is_success() {
            return Err(ThrottleError::MetadataStatus {
                path: path.to_string(),
                status: response.status().as_u16(),
            });
        }
        let value = response.text()?.trim().to_string();
        if value.is_empty() {
            return Err(ThrottleError::EmptyMetadata(path.to_string()));
        }
        Ok(value)
    }
}

impl Default for Ec2MetadataResolver {
    fn default() -> Self {
        Self::new(DEFAULT_METADATA_URL)
    }
}

impl HostResolver for Ec2MetadataResolver {
    fn resolve(&self) -> Result<HostIdentity, ThrottleError> {
        let client = Client::builder().timeout(self.timeout).build()?;
        let token = self.session_token(&client);
        debug!(imdsv2 = token.is_some(), "Querying instance metadata");

        Ok(HostIdentity {
            instance_id: self.fetch(&client, token.as_deref(), "instance-id")?,
            instance_class: self.fetch(&client, token.as_deref(), "instance-type")?,
        })
    }
}
