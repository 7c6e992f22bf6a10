//! Retry logic.
//!
//! # Responsibilities
//! - Run a fallible async operation up to a fixed number of attempts
//! - Wait between attempts according to a `Backoff`
//! - Report every failed attempt without aborting the loop
//!
//! # Design Decisions
//! - Attempts run strictly one after another, never concurrently
//! - No sleep after the final attempt; the last error is handed back
//! - Used at startup only; the request path never retries

use std::fmt::Display;
use std::future::Future;

use thiserror::Error;

use crate::config::BootstrapConfig;
use crate::resilience::backoff::Backoff;

/// Returned when every attempt failed.
#[derive(Debug, Error)]
#[error("gave up after {attempts} attempts: {last}")]
pub struct RetryError<E: Display> {
    pub attempts: u32,
    pub last: E,
}

/// Attempt budget plus delay schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Backoff,
}

impl RetryPolicy {
    /// `max_attempts` is clamped to at least one.
    pub fn new(max_attempts: u32, backoff: Backoff) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    pub fn from_config(config: &BootstrapConfig) -> Self {
        let base = std::time::Duration::from_millis(config.backoff_ms);
        let backoff = if config.exponential {
            Backoff::Exponential {
                base,
                max: std::time::Duration::from_millis(config.max_backoff_ms),
            }
        } else {
            Backoff::Fixed(base)
        };
        Self::new(config.max_attempts, backoff)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Run `op` until it succeeds or the attempt budget is spent.
    ///
    /// `op` receives the 1-based attempt number.
    pub async fn run<T, E, F, Fut>(&self, what: &str, mut op: F) -> Result<T, RetryError<E>>
    where
        E: Display,
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match op(attempt).await {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::info!(operation = what, attempt, "Succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(e) if attempt < self.max_attempts => {
                    let delay = self.backoff.delay(attempt);
                    tracing::warn!(
                        operation = what,
                        attempt,
                        max_attempts = self.max_attempts,
                        delay = ?delay,
                        error = %e,
                        "Attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    tracing::warn!(
                        operation = what,
                        attempt,
                        error = %e,
                        "Final attempt failed"
                    );
                    return Err(RetryError { attempts: attempt, last: e });
                }
            }
        }
    }
}
