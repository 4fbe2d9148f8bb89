//! Bounded retry with exponential backoff and per-attempt timeouts for calls
//! to external collaborators (embedding endpoints, LLM APIs).

use std::future::Future;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::{debug, warn};

/// Errors that know whether another attempt might succeed.
pub trait Transient: std::fmt::Display {
    /// Network blips, rate limits, 5xx, timeouts.
    fn is_transient(&self) -> bool;

    /// The error to report when an attempt exceeds its timeout.
    fn timed_out(after: Duration) -> Self;
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt (0 = single attempt).
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_factor: f64,
    /// Upper bound on a single attempt.
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_millis(2000),
            backoff_factor: 1.5,
            attempt_timeout: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Single attempt, still bounded by `attempt_timeout`.
    pub fn no_retry(attempt_timeout: Duration) -> Self {
        Self {
            max_retries: 0,
            attempt_timeout,
            ..Self::default()
        }
    }

    /// Run `op` until it succeeds, fails permanently, or retries run out.
    pub async fn run<T, E, F, Fut>(&self, what: &str, mut op: F) -> Result<T, E>
    where
        E: Transient,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut delay = self.initial_delay;
        let mut attempt: u32 = 0;

        loop {
            let outcome = match tokio::time::timeout(self.attempt_timeout, op()).await {
                Ok(result) => result,
                Err(_) => Err(E::timed_out(self.attempt_timeout)),
            };

            let err = match outcome {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if !err.is_transient() || attempt >= self.max_retries {
                if attempt > 0 {
                    warn!(what, attempts = attempt + 1, error = %err, "giving up");
                }
                return Err(err);
            }

            attempt += 1;
            let sleep = delay + jitter();
            warn!(
                what,
                attempt,
                max_retries = self.max_retries,
                delay_ms = sleep.as_millis() as u64,
                error = %err,
                "transient failure, retrying"
            );
            tokio::time::sleep(sleep).await;

            delay = Duration::from_millis((delay.as_millis() as f64 * self.backoff_factor) as u64)
                .min(self.max_delay);
            debug!(what, next_delay_ms = delay.as_millis() as u64, "backoff advanced");
        }
    }
}

/// Up to 100ms of jitter taken from the clock's nanosecond fraction.
fn jitter() -> Duration {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos();
    Duration::from_millis((nanos % 100) as u64)
}
