//! Bounded retry with exponential backoff and full jitter for provider calls.
//!
//! Only failures reported as transient by [`AdvisorError::is_transient`] are
//! retried. "Not found" and other client errors return immediately.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::{future::Future, time::Duration};

use crate::error::AdvisorError;

pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_INITIAL_DELAY_MS: u64 = 200;
pub const DEFAULT_MAX_DELAY_MS: u64 = 2000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Attempts after the first one.
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay_ms: DEFAULT_INITIAL_DELAY_MS,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self { max_retries: 0, ..Self::default() }
    }

    /// Upper bound of the backoff before retry number `attempt` (0-based):
    /// `initial * 2^attempt`, capped at `max_delay_ms`.
    pub fn ceiling_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt);
        let delay_ms = self.initial_delay_ms.saturating_mul(factor);
        Duration::from_millis(delay_ms.min(self.max_delay_ms))
    }

    /// Random delay in `0..=ceiling_for_attempt(attempt)`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let ceiling = self.ceiling_for_attempt(attempt).as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(0..=ceiling))
    }
}

/// Run `operation` until it succeeds, fails permanently, or the policy runs out.
/// The last error is returned on exhaustion.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, operation: F) -> Result<T, AdvisorError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, AdvisorError>>,
{
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    tracing::info!("Request succeeded after {} retries", attempt);
                }
                return Ok(value);
            }
            Err(e) if e.is_transient() && attempt < policy.max_retries => {
                let delay = policy.delay_for_attempt(attempt);
                attempt += 1;
                tracing::warn!(
                    "Transient error on attempt {} of {}: {}; retrying in {:?}",
                    attempt,
                    policy.max_retries + 1,
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                if e.is_transient() {
                    tracing::error!("All {} attempts exhausted: {}", policy.max_retries + 1, e);
                }
                return Err(e);
            }
        }
    }
}
