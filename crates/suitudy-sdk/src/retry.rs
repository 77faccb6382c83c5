//! Exponential backoff for read-side ledger queries.
//!
//! Only queries go through [`RetryExecutor`]. Transaction execution is never
//! retried automatically: a submitted transaction may already have consumed
//! the coin objects it references.
//!
//! # Example
//!
//! ```rust
//! use suitudy_sdk::retry::RetryConfig;
//!
//! let config = RetryConfig::builder()
//!     .max_retries(5)
//!     .initial_delay_ms(100)
//!     .max_delay_ms(10_000)
//!     .jitter(false)
//!     .build();
//! assert_eq!(config.delay_for_attempt(2).as_millis(), 200);
//! ```

use crate::error::{RETRYABLE_STATUS_CODES, SuitudyError, SuitudyResult};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// Configuration for retry behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (0 = no retries).
    pub max_retries: u32,
    /// Delay before the first retry, in milliseconds.
    pub initial_delay_ms: u64,
    /// Upper bound for any single delay, in milliseconds.
    pub max_delay_ms: u64,
    /// Growth factor between consecutive delays.
    pub exponential_base: f64,
    /// Whether to randomize delays.
    pub jitter: bool,
    /// Fraction of the delay that jitter may add or remove (0.0 to 1.0).
    pub jitter_factor: f64,
    /// HTTP status codes that trigger a retry.
    pub retryable_status_codes: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 100,
            max_delay_ms: 10_000,
            exponential_base: 2.0,
            jitter: true,
            jitter_factor: 0.5,
            retryable_status_codes: RETRYABLE_STATUS_CODES.to_vec(),
        }
    }
}

impl RetryConfig {
    /// Creates a new builder.
    pub fn builder() -> RetryConfigBuilder {
        RetryConfigBuilder::default()
    }

    /// A config that fails on the first error.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Short, frequent retries for local development nodes.
    pub fn aggressive() -> Self {
        Self {
            max_retries: 5,
            initial_delay_ms: 50,
            max_delay_ms: 5_000,
            exponential_base: 1.5,
            jitter_factor: 0.3,
            ..Default::default()
        }
    }

    /// Longer waits for shared public endpoints.
    pub fn conservative() -> Self {
        Self {
            initial_delay_ms: 500,
            max_delay_ms: 30_000,
            ..Default::default()
        }
    }

    /// Returns the delay to wait before retry number `attempt` (1-based).
    #[allow(clippy::cast_possible_truncation)] // bounded by max_delay_ms
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let exponent = i32::try_from(attempt - 1).unwrap_or(i32::MAX);
        let base = self.initial_delay_ms as f64 * self.exponential_base.powi(exponent);
        let capped = base.min(self.max_delay_ms as f64);

        let delay = if self.jitter {
            let range = capped * self.jitter_factor;
            (capped + rand::random::<f64>() * range * 2.0 - range).max(0.0)
        } else {
            capped
        };

        Duration::from_millis(delay as u64)
    }

    /// Returns true if `error` should be retried under this config.
    ///
    /// HTTP statuses are checked against this config's list; every other
    /// error defers to [`SuitudyError::is_retryable`].
    pub fn is_retryable_error(&self, error: &SuitudyError) -> bool {
        match error {
            SuitudyError::Api { status_code, .. } => {
                self.retryable_status_codes.contains(status_code)
            }
            other => other.is_retryable(),
        }
    }
}

/// Builder for [`RetryConfig`].
#[derive(Debug, Clone, Default)]
pub struct RetryConfigBuilder {
    max_retries: Option<u32>,
    initial_delay_ms: Option<u64>,
    max_delay_ms: Option<u64>,
    exponential_base: Option<f64>,
    jitter: Option<bool>,
    jitter_factor: Option<f64>,
    retryable_status_codes: Option<Vec<u16>>,
}

impl RetryConfigBuilder {
    /// Sets the maximum number of retry attempts.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Sets the delay before the first retry.
    pub fn initial_delay_ms(mut self, ms: u64) -> Self {
        self.initial_delay_ms = Some(ms);
        self
    }

    /// Sets the maximum delay.
    pub fn max_delay_ms(mut self, ms: u64) -> Self {
        self.max_delay_ms = Some(ms);
        self
    }

    /// Sets the growth factor.
    pub fn exponential_base(mut self, base: f64) -> Self {
        self.exponential_base = Some(base);
        self
    }

    /// Enables or disables jitter.
    pub fn jitter(mut self, jitter: bool) -> Self {
        self.jitter = Some(jitter);
        self
    }

    /// Sets the jitter factor, clamped to 0.0..=1.0.
    pub fn jitter_factor(mut self, factor: f64) -> Self {
        self.jitter_factor = Some(factor.clamp(0.0, 1.0));
        self
    }

    /// Sets the HTTP status codes that are retried.
    pub fn retryable_status_codes(mut self, codes: Vec<u16>) -> Self {
        self.retryable_status_codes = Some(codes);
        self
    }

    /// Builds the config, filling unset fields from the default.
    pub fn build(self) -> RetryConfig {
        let default = RetryConfig::default();
        RetryConfig {
            max_retries: self.max_retries.unwrap_or(default.max_retries),
            initial_delay_ms: self.initial_delay_ms.unwrap_or(default.initial_delay_ms),
            max_delay_ms: self.max_delay_ms.unwrap_or(default.max_delay_ms),
            exponential_base: self.exponential_base.unwrap_or(default.exponential_base),
            jitter: self.jitter.unwrap_or(default.jitter),
            jitter_factor: self.jitter_factor.unwrap_or(default.jitter_factor),
            retryable_status_codes: self
                .retryable_status_codes
                .unwrap_or(default.retryable_status_codes),
        }
    }
}

/// Runs async operations under a [`RetryConfig`].
#[derive(Debug, Clone)]
pub struct RetryExecutor {
    config: RetryConfig,
}

impl RetryExecutor {
    /// Creates an executor for `config`.
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Runs `operation`, retrying retryable failures with backoff.
    pub async fn execute<F, Fut, T>(&self, operation: F) -> SuitudyResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = SuitudyResult<T>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    if attempt >= self.config.max_retries
                        || !self.config.is_retryable_error(&error)
                    {
                        return Err(error);
                    }
                    attempt += 1;
                    let delay = self.config.delay_for_attempt(attempt);
                    debug!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %error.sanitized_message(),
                        "Retrying ledger query"
                    );
                    if !delay.is_zero() {
                        sleep(delay).await;
                    }
                }
            }
        }
    }
}
