//! Retry policy for network operations
//!
//! Implements a bounded retry loop with a fixed inter-attempt delay. Every
//! failure consumes one attempt from the budget; once the budget is spent the
//! final error is returned to the caller unchanged.

use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Attempt budget and spacing for a retried operation
///
/// `max_attempts` is the total number of tries including the first. The delay
/// is constant between attempts, not exponential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first (always at least 1)
    pub max_attempts: u32,
    /// Fixed wait between attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Creates a policy; a zero attempt budget is clamped to one attempt
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }
}

/// Runs `op` until it succeeds or the attempt budget is spent
///
/// The operation receives the 1-based attempt number. Failures are retried
/// indiscriminately; no distinction is made between transient and permanent
/// errors. The error from the final attempt is the one surfaced.
pub async fn with_retry<T, E, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let budget = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) if attempt >= budget => return Err(err),
            Err(err) => {
                warn!(attempt, budget, error = %err, "attempt failed, retrying");
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
        }
    }
}
