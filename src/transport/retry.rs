//! Bounded retry with linear backoff.
//!
//! Every transport failure (non-2xx status or network error) is retried the
//! same way: the `n`th retry waits `base_delay * n`. Once `max_retries`
//! retries have been spent the caller gets the last error unchanged.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use media_download_client::transport::{RetryContext, RetryDecision, RetryPolicy};
//!
//! let policy = RetryPolicy::new(3, Duration::from_secs(1));
//! let mut context = RetryContext::default();
//!
//! match policy.should_retry(&mut context) {
//!     RetryDecision::Retry { delay, attempt } => {
//!         assert_eq!(delay, Duration::from_secs(1));
//!         assert_eq!(attempt, 1);
//!     }
//!     RetryDecision::DoNotRetry { reason } => panic!("{reason}"),
//! }
//! ```

use std::time::Duration;

use tracing::{debug, instrument};

use crate::catalog::{DEFAULT_RETRIES, DEFAULT_RETRY_DELAY_MS};

/// Per-request retry bookkeeping.
///
/// Lives for one logical request, including all of its retries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryContext {
    /// Retries performed so far.
    pub retries: u32,
    /// Set while a retry attempt is in flight.
    pub is_retry: bool,
}

/// Decision on whether to resubmit a failed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Resubmit after `delay`.
    Retry {
        delay: Duration,
        /// 1-indexed retry number this resubmission will be.
        attempt: u32,
    },

    /// Surface the failure.
    DoNotRetry {
        /// Human-readable reason.
        reason: String,
    },
}

/// Retry limits for one transport.
///
/// # Default Values
///
/// - `max_retries`: 3
/// - `base_delay`: 1 second
///
/// With defaults, delays are 1s, 2s, 3s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_RETRIES,
            base_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    /// Creates a policy allowing `max_retries` retries after the first attempt.
    #[must_use]
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// A policy that never retries.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(0, Duration::ZERO)
    }

    #[must_use]
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    #[must_use]
    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Decides whether the request tracked by `context` gets another attempt.
    ///
    /// On [`RetryDecision::Retry`] the context is advanced and flagged as a
    /// retry.
    #[instrument(skip(self), fields(max_retries = self.max_retries))]
    pub fn should_retry(&self, context: &mut RetryContext) -> RetryDecision {
        if context.retries >= self.max_retries {
            debug!(retries = context.retries, "retry limit reached");
            return RetryDecision::DoNotRetry {
                reason: format!("retry limit ({}) reached", self.max_retries),
            };
        }

        context.retries += 1;
        context.is_retry = true;
        let delay = self.delay_for(context.retries);
        debug!(
            attempt = context.retries,
            delay_ms = delay.as_millis(),
            "will retry"
        );

        RetryDecision::Retry {
            delay,
            attempt: context.retries,
        }
    }

    /// Linear backoff: `base_delay * attempt`.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_values() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries(), 3);
        assert_eq!(policy.base_delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_linear_backoff_delays() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for(2), Duration::from_secs(2));
        assert_eq!(policy.delay_for(3), Duration::from_secs(3));
    }

    #[test]
    fn test_should_retry_until_limit() {
        let policy = RetryPolicy::new(3, Duration::from_millis(100));
        let mut context = RetryContext::default();

        for expected in 1..=3 {
            match policy.should_retry(&mut context) {
                RetryDecision::Retry { delay, attempt } => {
                    assert_eq!(attempt, expected);
                    assert_eq!(delay, Duration::from_millis(100) * expected);
                }
                RetryDecision::DoNotRetry { reason } => panic!("stopped early: {reason}"),
            }
        }

        assert!(matches!(
            policy.should_retry(&mut context),
            RetryDecision::DoNotRetry { .. }
        ));
        assert_eq!(context.retries, 3);
        assert!(context.is_retry);
    }

    #[test]
    fn test_disabled_policy_never_retries() {
        let policy = RetryPolicy::disabled();
        let mut context = RetryContext::default();
        assert!(matches!(
            policy.should_retry(&mut context),
            RetryDecision::DoNotRetry { .. }
        ));
        assert_eq!(context, RetryContext::default());
    }
}
