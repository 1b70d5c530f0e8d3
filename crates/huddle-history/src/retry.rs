//! Bounded optimistic read-merge-write with randomized backoff.

use crate::document::Versioned;
use crate::error::HistoryError;
use huddle_config::HistoryConfig;
use log::{debug, warn};
use rand::Rng;
use std::future::Future;
use std::time::Duration;

/// How many times to attempt a mutation and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_min: Duration,
    pub backoff_max: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_min: Duration::from_millis(50),
            backoff_max: Duration::from_millis(150),
        }
    }
}

impl From<&HistoryConfig> for RetryPolicy {
    fn from(config: &HistoryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            backoff_min: Duration::from_millis(config.backoff_min_ms),
            backoff_max: Duration::from_millis(config.backoff_max_ms),
        }
    }
}

impl RetryPolicy {
    /// Policy with no wait between attempts.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            backoff_min: Duration::ZERO,
            backoff_max: Duration::ZERO,
        }
    }

    /// Uniformly random delay within the backoff window.
    pub fn backoff_delay(&self) -> Duration {
        let min = self.backoff_min.as_millis() as u64;
        let max = self.backoff_max.as_millis() as u64;
        if max <= min {
            return self.backoff_min;
        }
        Duration::from_millis(rand::rng().random_range(min..=max))
    }
}

/// Reusable optimistic-append loop.
///
/// Each attempt reads the current value fresh, hands it to `merge`, and writes
/// the merged value back conditioned on the version that was read. Retryable
/// failures wait [`RetryPolicy::backoff_delay`] and start over from the read.
/// After `max_attempts` failures the last error is wrapped in
/// [`HistoryError::RetriesExhausted`].
#[derive(Debug, Clone, Copy, Default)]
pub struct OptimisticAppend {
    policy: RetryPolicy,
}

impl OptimisticAppend {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Run the loop.
    ///
    /// `merge` returning `None` ends the loop without writing and yields
    /// `Ok(None)`. On success the written value and its new version are
    /// returned.
    pub async fn run<T, R, RFut, M, W, WFut>(
        &self,
        label: &str,
        mut read: R,
        mut merge: M,
        mut write: W,
    ) -> Result<Option<Versioned<T>>, HistoryError>
    where
        T: Clone,
        R: FnMut() -> RFut,
        RFut: Future<Output = Result<Option<Versioned<T>>, HistoryError>>,
        M: FnMut(Option<&T>) -> Option<T>,
        W: FnMut(T, Option<u64>) -> WFut,
        WFut: Future<Output = Result<u64, HistoryError>>,
    {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            let err = match self.attempt(&mut read, &mut merge, &mut write).await {
                Ok(outcome) => {
                    debug!(
                        "optimistic write finished (op={}, attempt={}, written={})",
                        label,
                        attempt,
                        outcome.is_some()
                    );
                    return Ok(outcome);
                }
                Err(err) if err.is_retryable() => err,
                Err(err) => return Err(err),
            };
            if attempt >= max_attempts {
                warn!(
                    "optimistic write exhausted retries (op={}, attempts={}, error={})",
                    label, attempt, err
                );
                return Err(HistoryError::RetriesExhausted {
                    attempts: attempt,
                    last: Box::new(err),
                });
            }
            let delay = self.policy.backoff_delay();
            warn!(
                "optimistic write failed, retrying (op={}, attempt={}, delay_ms={}, error={})",
                label,
                attempt,
                delay.as_millis(),
                err
            );
            tokio::time::sleep(delay).await;
        }
    }

    async fn attempt<T, R, RFut, M, W, WFut>(
        &self,
        read: &mut R,
        merge: &mut M,
        write: &mut W,
    ) -> Result<Option<Versioned<T>>, HistoryError>
    where
        T: Clone,
        R: FnMut() -> RFut,
        RFut: Future<Output = Result<Option<Versioned<T>>, HistoryError>>,
        M: FnMut(Option<&T>) -> Option<T>,
        W: FnMut(T, Option<u64>) -> WFut,
        WFut: Future<Output = Result<u64, HistoryError>>,
    {
        let current = read().await?;
        let expected = current.as_ref().map(|stored| stored.version);
        let Some(next) = merge(current.as_ref().map(|stored| &stored.value)) else {
            return Ok(None);
        };
        let version = write(next.clone(), expected).await?;
        Ok(Some(Versioned {
            version,
            value: next,
        }))
    }
}
