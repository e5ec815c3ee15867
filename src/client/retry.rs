//! Retry configuration for SNMP requests.

use std::time::Duration;

/// Retry configuration for SNMP requests.
///
/// Only timeouts are retried. Each retry resends the same request with the
/// same request-id, so a late answer to an earlier attempt still matches.
///
/// # Examples
///
/// ```rust
/// use snmp_get::Retry;
/// use std::time::Duration;
///
/// // No retries
/// let retry = Retry::none();
///
/// // Two retries, 200ms apart
/// let retry = Retry::fixed(2, Duration::from_millis(200));
///
/// // The command line's RETRIES argument
/// let retry = Retry::from(3);
/// assert_eq!(retry.max_attempts, 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Retry {
    /// Maximum number of retry attempts (0 = no retries, request sent once)
    pub max_attempts: u32,
    /// Backoff strategy between retries
    pub backoff: Backoff,
}

/// Delay between retry attempts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Backoff {
    /// Resend as soon as an attempt times out.
    #[default]
    None,

    /// Fixed delay between each retry attempt.
    Fixed {
        /// Delay before each retry
        delay: Duration,
    },
}

impl Default for Retry {
    /// Default: 3 retries with no delay between attempts.
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Backoff::None,
        }
    }
}

impl Retry {
    /// No retries - request is sent once and fails on timeout.
    pub fn none() -> Self {
        Self {
            max_attempts: 0,
            backoff: Backoff::None,
        }
    }

    /// Fixed delay between retries.
    pub fn fixed(attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: attempts,
            backoff: Backoff::Fixed { delay },
        }
    }

    /// Compute the delay before the next retry attempt.
    pub fn compute_delay(&self, _attempt: u32) -> Duration {
        match &self.backoff {
            Backoff::None => Duration::ZERO,
            Backoff::Fixed { delay } => *delay,
        }
    }
}

impl From<u32> for Retry {
    /// `attempts` retries with no delay.
    fn from(attempts: u32) -> Self {
        Self {
            max_attempts: attempts,
            backoff: Backoff::None,
        }
    }
}
