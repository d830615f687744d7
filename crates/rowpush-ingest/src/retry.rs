//! Bounded exponential-backoff retry
//!
//! An attempt function is called at most `max_retries + 1` times. After
//! failed attempt `k` (1-based), if another attempt is allowed, the caller
//! sleeps `base_delay * 2^(k-1)` first. There is no jitter and no cap on the
//! delay other than the retry bound.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

use crate::report::ChunkOutcome;
use crate::sink::SinkResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Total number of calls the attempt function may receive
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Sleep inserted after failed attempt `attempt` (1-based)
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let nanos = 2u128
            .checked_pow(attempt.saturating_sub(1))
            .and_then(|factor| self.base_delay.as_nanos().checked_mul(factor));
        match nanos {
            Some(nanos) if nanos <= Duration::MAX.as_nanos() => from_nanos(nanos),
            _ if self.base_delay.is_zero() => Duration::ZERO,
            _ => Duration::MAX,
        }
    }

    /// Drive `attempt_fn` until it succeeds or attempts run out.
    ///
    /// `attempt_fn` receives the 1-based attempt number.
    pub async fn run<F, Fut, E>(&self, mut attempt_fn: F) -> ChunkOutcome
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<SinkResponse, E>>,
        E: Display,
    {
        let max_attempts = self.max_attempts();
        let mut attempt = 1;

        loop {
            match attempt_fn(attempt).await {
                Ok(response) => {
                    if attempt > 1 {
                        info!(attempt, status = response.status, "Succeeded after retry");
                    }
                    return ChunkOutcome::Success {
                        status_code: response.status,
                        response_excerpt: response.body_excerpt,
                        attempts: attempt,
                    };
                },
                Err(err) if attempt < max_attempts => {
                    let delay = self.delay_after(attempt);
                    warn!(
                        attempt,
                        max_attempts,
                        error = %err,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "Attempt failed, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                },
                Err(err) => {
                    warn!(attempt, error = %err, "Attempts exhausted");
                    return ChunkOutcome::Failure {
                        last_error: err.to_string(),
                        attempts_made: attempt,
                    };
                },
            }
        }
    }
}

fn from_nanos(nanos: u128) -> Duration {
    const NANOS_PER_SEC: u128 = 1_000_000_000;
    let secs = u64::try_from(nanos / NANOS_PER_SEC).unwrap_or(u64::MAX);
    // remainder is always below one second
    Duration::new(secs, (nanos % NANOS_PER_SEC) as u32)
}
