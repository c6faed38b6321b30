//! Credit-balance circuit breaker.

use std::time::Instant;

use tracing::{debug, info, warn};

use super::{
    latest_sample, CreditTelemetry, GenerationGate, HostIdentity, HostResolver, ThrottleConfig,
    ThrottleReading,
};

/// Gate that closes while the host's credit balance is low.
pub struct CreditThrottle {
    config: ThrottleConfig,
    host: Option<HostIdentity>,
    telemetry: Box<dyn CreditTelemetry>,
    ceiling: f64,
    balance: Option<f64>,
    last_polled: Option<Instant>,
}

impl CreditThrottle {
    /// Resolves the host and takes an initial reading.
    ///
    /// If the host cannot be resolved the throttle fails open for the rest
    /// of its life.
    pub fn new(
        config: ThrottleConfig,
        resolver: &dyn HostResolver,
        telemetry: Box<dyn CreditTelemetry>,
    ) -> Self {
        let host = match resolver.resolve() {
            Ok(host) => {
                info!(
                    instance_id = %host.instance_id,
                    instance_class = %host.instance_class,
                    "Throttling generation on credit balance"
                );
                Some(host)
            }
            Err(e) => {
                warn!(error = %e, "Could not resolve host identity, throttling disabled");
                None
            }
        };
        Self::with_host(config, host, telemetry)
    }

    /// Builds a throttle for a known (or absent) host and polls once.
    pub fn with_host(
        config: ThrottleConfig,
        host: Option<HostIdentity>,
        telemetry: Box<dyn CreditTelemetry>,
    ) -> Self {
        let ceiling = host
            .as_ref()
            .map(|h| config.ceiling_for(&h.instance_class))
            .unwrap_or(0.0);
        let mut throttle = Self {
            config,
            host,
            telemetry,
            ceiling,
            balance: None,
            last_polled: None,
        };
        throttle.poll();
        throttle
    }

    /// Host the throttle is watching, if any.
    pub fn host(&self) -> Option<&HostIdentity> {
        self.host.as_ref()
    }

    /// Last polled balance, `None` until a sample has been seen.
    pub fn balance(&self) -> Option<f64> {
        self.balance
    }

    /// Ceiling for the host's instance class.
    pub fn ceiling(&self) -> f64 {
        self.ceiling
    }

    /// Open without a host or without any sample yet.
    fn is_open(&self) -> bool {
        if self.host.is_none() {
            return true;
        }
        match self.balance {
            Some(balance) => balance > self.ceiling * self.config.threshold_ratio,
            None => true,
        }
    }

    /// Polls telemetry if the poll interval has elapsed.
    fn poll(&mut self) {
        let Some(host) = &self.host else {
            return;
        };
        if let Some(last) = self.last_polled {
            if last.elapsed() < self.config.poll_interval {
                return;
            }
        }
        self.last_polled = Some(Instant::now());

        match self.telemetry.samples(host, self.config.window) {
            Ok(samples) => match latest_sample(&samples) {
                Some(sample) => {
                    debug!(balance = sample.value, at = %sample.timestamp, "Credit balance polled");
                    self.balance = Some(sample.value);
                }
                None => debug!("No credit samples in window, keeping last balance"),
            },
            Err(e) => warn!(error = %e, "Credit balance query failed, keeping last balance"),
        }
    }
}

impl GenerationGate for CreditThrottle {
    fn allowed(&mut self) -> bool {
        self.poll();
        self.is_open()
    }

    fn reading(&mut self) -> ThrottleReading {
        ThrottleReading {
            allowed: self.is_open(),
            // No sample yet reads as a full balance.
            balance: self.balance.unwrap_or(self.ceiling),
            ceiling: self.ceiling,
        }
    }
}
