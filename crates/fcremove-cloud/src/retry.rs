//! Exponential backoff for read calls
//!
//! Only [`ErrorKind::Transient`](crate::ErrorKind::Transient) failures are
//! retried. Not-found, unauthorized and fatal errors return immediately.

use crate::error::Result;
use crate::provider::ResourceKind;
use rand::Rng;
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

/// Retry configuration for provider operations
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one
    pub max_attempts: u32,

    /// Delay before the second attempt
    pub initial_delay: Duration,

    /// Upper bound for a single delay
    pub max_delay: Duration,

    /// Backoff multiplier
    pub backoff_multiplier: f64,

    /// Multiply each delay by a random factor in [1, 2)
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// A single attempt, no retries
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay after the given zero-based failed attempt, without jitter
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self.initial_delay.as_secs_f64() * self.backoff_multiplier.powi(attempt as i32);
        let capped = base.min(self.max_delay.as_secs_f64());
        Duration::from_secs_f64(capped.max(0.0))
    }

    /// Delay after the given attempt with jitter applied (if enabled)
    pub fn jittered_delay(&self, attempt: u32) -> Duration {
        let delay = self.delay_for_attempt(attempt);
        if !self.jitter {
            return delay;
        }
        let factor: f64 = rand::thread_rng().gen_range(1.0..2.0);
        delay.mul_f64(factor).min(self.max_delay)
    }
}

/// Per-resource-kind retry configuration
#[derive(Debug, Clone, Default)]
pub struct RetryPolicy {
    default: RetryConfig,
    overrides: HashMap<ResourceKind, RetryConfig>,
}

impl RetryPolicy {
    pub fn new(default: RetryConfig) -> Self {
        Self {
            default,
            overrides: HashMap::new(),
        }
    }

    /// Policy that never retries
    pub fn none() -> Self {
        Self::new(RetryConfig::none())
    }

    pub fn with_override(mut self, kind: ResourceKind, config: RetryConfig) -> Self {
        self.overrides.insert(kind, config);
        self
    }

    pub fn for_kind(&self, kind: ResourceKind) -> &RetryConfig {
        self.overrides.get(&kind).unwrap_or(&self.default)
    }
}

/// Run `op` until it succeeds, fails with a non-transient error, or the
/// attempts are used up. The last error is returned.
pub async fn retry<T, F, Fut>(config: &RetryConfig, operation: &str, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt + 1 < max_attempts => {
                let delay = config.jittered_delay(attempt);
                attempt += 1;
                tracing::debug!(
                    operation,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Transient failure, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}
