//! Retry configuration and outcomes.

use std::fmt;
use std::time::Duration;

/// Exponential backoff settings shared by every retry-eligible step.
///
/// The delay after the `n`th failed attempt is
/// `min(base_delay * 2^(n - 1), max_delay)`.
///
/// # Examples
///
/// ```
/// use toolflow_core::RetryConfig;
/// use std::time::Duration;
///
/// let config = RetryConfig::new(3, Duration::from_millis(100), Duration::from_secs(1))?;
///
/// assert_eq!(config.delay_for_attempt(1), Duration::from_millis(100));
/// assert_eq!(config.delay_for_attempt(2), Duration::from_millis(200));
/// assert_eq!(config.delay_for_attempt(3), Duration::from_millis(400));
/// # Ok::<(), toolflow_core::RetryConfigError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
}

/// Error returned when [`RetryConfig`] settings are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfigError(pub &'static str);

impl fmt::Display for RetryConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for RetryConfigError {}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryConfig {
    /// Creates a validated retry configuration.
    ///
    /// # Errors
    ///
    /// - `max_attempts` is 0
    /// - `max_delay` is less than `base_delay`
    pub fn new(
        max_attempts: u32,
        base_delay: Duration,
        max_delay: Duration,
    ) -> Result<Self, RetryConfigError> {
        if max_attempts == 0 {
            return Err(RetryConfigError("max_attempts must be at least 1"));
        }
        if max_delay < base_delay {
            return Err(RetryConfigError("max_delay must be >= base_delay"));
        }
        Ok(Self {
            max_attempts,
            base_delay,
            max_delay,
        })
    }

    /// Maximum number of times an operation is invoked.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay after the first failed attempt.
    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Upper bound for any single delay.
    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// Calculates the delay to wait after the given failed attempt.
    ///
    /// `attempt` is 1-based and counts the attempt that just failed. An
    /// attempt of 0 is treated as 1.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1);
        2u32.checked_pow(exponent)
            .and_then(|factor| self.base_delay.checked_mul(factor))
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }
}

/// Terminal result of retrying an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryOutcome<T, E> {
    /// An attempt succeeded.
    Success {
        /// The produced value.
        value: T,
        /// Attempts made before the successful one (0-based index).
        attempts_used: u32,
    },
    /// Every attempt failed.
    Failure {
        /// The error from the final attempt.
        last_error: E,
        /// Total number of attempts made.
        attempts_used: u32,
    },
}

impl<T, E> RetryOutcome<T, E> {
    /// Returns the attempt count carried by either variant.
    pub fn attempts_used(&self) -> u32 {
        match self {
            RetryOutcome::Success { attempts_used, .. }
            | RetryOutcome::Failure { attempts_used, .. } => *attempts_used,
        }
    }

    /// Returns `true` for [`RetryOutcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, RetryOutcome::Success { .. })
    }

    /// Converts the outcome into a `Result`, dropping the attempt count.
    pub fn into_result(self) -> Result<T, E> {
        match self {
            RetryOutcome::Success { value, .. } => Ok(value),
            RetryOutcome::Failure { last_error, .. } => Err(last_error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_delay_doubles() {
        let config = RetryConfig::new(3, ms(100), ms(1000)).unwrap();
        assert_eq!(config.delay_for_attempt(1), ms(100));
        assert_eq!(config.delay_for_attempt(2), ms(200));
        assert_eq!(config.delay_for_attempt(3), ms(400));
    }

    #[test]
    fn test_delay_is_capped() {
        let config = RetryConfig::new(5, ms(500), ms(1000)).unwrap();
        assert_eq!(config.delay_for_attempt(4), ms(1000));
        // exponent overflow falls back to the cap
        assert_eq!(config.delay_for_attempt(200), ms(1000));
    }

    #[test]
    fn test_attempt_zero_uses_base_delay() {
        let config = RetryConfig::new(3, ms(100), ms(1000)).unwrap();
        assert_eq!(config.delay_for_attempt(0), ms(100));
    }

    #[test]
    fn test_validation() {
        let result = RetryConfig::new(0, ms(100), ms(1000));
        assert_eq!(
            result.unwrap_err(),
            RetryConfigError("max_attempts must be at least 1")
        );

        let result = RetryConfig::new(3, ms(1000), ms(100));
        assert_eq!(
            result.unwrap_err().0,
            "max_delay must be >= base_delay"
        );

        assert!(RetryConfig::new(1, Duration::ZERO, Duration::ZERO).is_ok());
    }

    #[test]
    fn test_default_config() {
        let config = RetryConfig::default();
        assert_eq!(config.max_attempts(), 3);
        assert_eq!(config.base_delay(), ms(100));
        assert_eq!(config.max_delay(), Duration::from_secs(5));
    }

    #[test]
    fn test_outcome_accessors() {
        let ok: RetryOutcome<u8, String> = RetryOutcome::Success {
            value: 7,
            attempts_used: 2,
        };
        assert!(ok.is_success());
        assert_eq!(ok.attempts_used(), 2);
        assert_eq!(ok.into_result(), Ok(7));

        let failed: RetryOutcome<u8, String> = RetryOutcome::Failure {
            last_error: "down".to_string(),
            attempts_used: 3,
        };
        assert!(!failed.is_success());
        assert_eq!(failed.into_result(), Err("down".to_string()));
    }
}
