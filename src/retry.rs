use std::future::Future;
use std::time::Duration;

use crate::error::Result;
use tracing::warn;

/// Attempt budget and backoff unit for [`with_retry`].
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one.
    pub attempts: u32,
    pub unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            unit: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Linear backoff: one unit after the first failure, two after the second, and so on.
    pub fn delay(&self, failed_attempts: u32) -> Duration {
        self.unit * failed_attempts
    }
}

/// Execute an async operation, retrying retryable errors with linear backoff.
///
/// Non-retryable errors are returned straight away. Once the budget is spent the
/// error from the last attempt is returned.
pub async fn with_retry<F, Fut, T>(operation_name: &str, policy: &RetryPolicy, mut factory: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = policy.attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        let err = match factory().await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        let classification = err.classify();
        if !classification.retryable {
            warn!(
                operation = operation_name,
                error_type = classification.error_type,
                "Non-retryable error, failing immediately"
            );
            return Err(err);
        }
        if attempt >= max_attempts {
            warn!(
                operation = operation_name,
                attempt,
                max = max_attempts,
                error = %err,
                "Max retries exhausted"
            );
            return Err(err);
        }

        let delay = policy.delay(attempt);
        warn!(
            operation = operation_name,
            attempt,
            max = max_attempts,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "Retrying after error"
        );
        tokio::time::sleep(delay).await;
    }
}
