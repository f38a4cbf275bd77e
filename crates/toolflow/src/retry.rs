//! Retry with exponential backoff.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use toolflow_core::{RetryConfig, RetryOutcome};
use tracing::warn;

/// Re-invokes a failing operation with exponential backoff.
///
/// The operation is assumed to be safe to call repeatedly; side effects of
/// failed attempts are not undone.
///
/// # Examples
///
/// ```
/// use toolflow::{RetryConfig, RetryOutcome, RetryPolicy};
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() {
/// let config = RetryConfig::new(3, Duration::from_millis(1), Duration::from_millis(10))
///     .expect("valid retry config");
/// let policy = RetryPolicy::new(config);
///
/// let outcome = policy.retry(|| async { Ok::<_, String>(42) }).await;
/// assert_eq!(outcome, RetryOutcome::Success { value: 42, attempts_used: 0 });
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    /// Creates a policy from validated settings.
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Returns the underlying settings.
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Delay to wait after the given failed attempt (1-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        self.config.delay_for_attempt(attempt)
    }

    /// Runs `operation` up to the configured number of attempts.
    pub async fn retry<T, E, F, Fut>(&self, operation: F) -> RetryOutcome<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        self.retry_with_attempts(self.config.max_attempts(), operation)
            .await
    }

    /// Runs `operation` up to `max_attempts` times, sleeping between
    /// attempts. A value of 0 still makes one attempt.
    pub async fn retry_with_attempts<T, E, F, Fut>(
        &self,
        max_attempts: u32,
        mut operation: F,
    ) -> RetryOutcome<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let max_attempts = max_attempts.max(1);
        let mut attempts = 0;

        loop {
            match operation().await {
                Ok(value) => {
                    return RetryOutcome::Success {
                        value,
                        attempts_used: attempts,
                    };
                }
                Err(e) => {
                    attempts += 1;
                    if attempts >= max_attempts {
                        return RetryOutcome::Failure {
                            last_error: e,
                            attempts_used: attempts,
                        };
                    }

                    let backoff = self.delay(attempts);
                    warn!(
                        attempt = attempts,
                        max_attempts,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %e,
                        "Attempt failed, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }
}

impl From<RetryConfig> for RetryPolicy {
    fn from(config: RetryConfig) -> Self {
        Self::new(config)
    }
}
