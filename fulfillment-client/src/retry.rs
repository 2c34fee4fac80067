//! Retry policy for transport failures
//!
//! Only connection-level errors go through a policy; HTTP error responses
//! are surfaced immediately. The policy is injected into
//! [`FulfillmentClient`](crate::FulfillmentClient) so retry behavior is
//! testable independently of the transport.

use std::fmt;
use std::time::Duration;

/// Decides whether (and after how long) a failed attempt is retried
pub trait RetryPolicy: fmt::Debug + Send + Sync {
    /// Delay before retry number `attempt` (1-based). `None` means give up
    /// and surface the last transport error.
    fn backoff(&self, attempt: u32) -> Option<Duration>;
}

/// Exponential backoff with a fixed retry bound
///
/// Doubles the delay on each retry, capped at `max_delay`.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    /// Extra attempts after the initial one
    pub extra_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self {
            extra_attempts: 2,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy for ExponentialBackoff {
    fn backoff(&self, attempt: u32) -> Option<Duration> {
        if attempt > self.extra_attempts {
            return None;
        }
        let delay = self
            .base_delay
            .checked_mul(1 << (attempt - 1).min(16))
            .unwrap_or(self.max_delay);
        Some(delay.min(self.max_delay))
    }
}

/// Never retry; every failure is surfaced immediately
#[derive(Debug, Clone, Default)]
pub struct NoRetry;

impl RetryPolicy for NoRetry {
    fn backoff(&self, _attempt: u32) -> Option<Duration> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_allows_two_extra_attempts() {
        let policy = ExponentialBackoff::default();
        assert_eq!(policy.backoff(1), Some(Duration::from_millis(500)));
        assert_eq!(policy.backoff(2), Some(Duration::from_millis(1000)));
        assert_eq!(policy.backoff(3), None);
    }

    #[test]
    fn backoff_is_capped() {
        let policy = ExponentialBackoff {
            extra_attempts: 10,
            base_delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(10),
        };
        assert_eq!(policy.backoff(1), Some(Duration::from_secs(5)));
        assert_eq!(policy.backoff(2), Some(Duration::from_secs(10)));
        assert_eq!(policy.backoff(8), Some(Duration::from_secs(10)));
    }

    #[test]
    fn no_retry_always_gives_up() {
        assert_eq!(NoRetry.backoff(1), None);
    }
}
