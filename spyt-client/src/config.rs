//! Polling configuration
//!
//! Defaults mirror a fixed two-second status loop with five tolerated
//! consecutive transport failures.

use std::time::Duration;

use crate::cancel::CancellationToken;
use crate::error::{ClientError, Result};

/// Policy for [`StatusPoller`](crate::StatusPoller)
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay between status requests while the job is not terminal
    pub interval: Duration,

    /// Consecutive failed requests tolerated; the request that reaches this
    /// count ends polling with `PollingExhausted`
    pub max_retries: u32,

    /// Growth factor of the delay after consecutive transport failures
    pub backoff_multiplier: f64,

    /// Wall-clock budget measured from the first request
    pub timeout: Option<Duration>,

    /// Checked before every request
    pub cancellation: Option<CancellationToken>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_retries: 5,
            backoff_multiplier: 2.0,
            timeout: None,
            cancellation: None,
        }
    }
}

impl PollConfig {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Delay before the next request after `failures` consecutive failures
    ///
    /// delay = interval * backoff_multiplier^failures, saturating at
    /// `Duration::MAX`. Zero failures gives the plain interval.
    pub fn retry_delay(&self, failures: u32) -> Duration {
        let exponent = i32::try_from(failures).unwrap_or(i32::MAX);
        let secs = self.interval.as_secs_f64() * self.backoff_multiplier.powi(exponent);
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.interval.is_zero() {
            return Err(ClientError::InvalidConfig(
                "interval must be greater than 0".to_string(),
            ));
        }

        if self.max_retries == 0 {
            return Err(ClientError::InvalidConfig(
                "max_retries must be at least 1".to_string(),
            ));
        }

        if !self.backoff_multiplier.is_finite() || self.backoff_multiplier < 1.0 {
            return Err(ClientError::InvalidConfig(format!(
                "backoff_multiplier must be a finite value >= 1.0, got {}",
                self.backoff_multiplier
            )));
        }

        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err(ClientError::InvalidConfig(
                "timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
