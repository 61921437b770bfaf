//! Bounded exponential backoff for failed queries and mutations.
//!
//! The host's query runtime owns the failure count; this module only maps
//! a count to a decision. The delay formula is `base × 2^(count − 1)`
//! capped at `max_delay` — including the negative exponent at count 0,
//! which yields half the base delay.

use std::time::Duration;
use tokio::time::sleep;

/// Failure count at which automatic retries stop.
pub const DEFAULT_MAX_FAILURES: u32 = 3;
/// Rate-limited (429) responses get their own, smaller retry budget,
/// independent of the generic ceiling.
pub const RATE_LIMIT_MAX_RETRIES: u32 = 2;

/// Outcome of a retry decision for one failure count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryDecision {
    /// Give up; the caller should surface the failure.
    Stop,
    /// Retry after waiting this long.
    After(Duration),
}

/// Bounded retry policy for query/mutation callers.
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    /// Failure count at which retrying stops.
    pub max_failures: u32,
    /// Base delay for the backoff formula.
    pub base_delay: Duration,
    /// Maximum allowed delay between attempts.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_failures: DEFAULT_MAX_FAILURES,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(30_000),
        }
    }
}

impl RetryPolicy {
    /// Decide whether to retry after `failure_count` consecutive failures.
    pub fn decide(&self, failure_count: u32) -> RetryDecision {
        if failure_count >= self.max_failures {
            return RetryDecision::Stop;
        }
        RetryDecision::After(self.delay_for(failure_count))
    }

    /// Delay from the backoff formula, capped at `max_delay`.
    ///
    /// A failure count of 0 maps to an exponent of −1, i.e. half the base
    /// delay (500 ms with the defaults). That is the formula applied
    /// exactly, whatever count base the host runtime starts from.
    pub fn delay_for(&self, failure_count: u32) -> Duration {
        let millis = if failure_count == 0 {
            self.base_delay.as_millis() / 2
        } else {
            let pow = 2u128.saturating_pow(failure_count - 1);
            self.base_delay.as_millis().saturating_mul(pow)
        };
        Duration::from_millis(millis.min(self.max_delay.as_millis()) as u64)
    }

    /// Retry delay that prefers a server-supplied `Retry-After` hint.
    ///
    /// The hint (whole seconds, as produced by [`crate::retry_after`]) is
    /// clamped to `max_delay`; without one the local formula applies.
    pub fn retry_delay(&self, failure_count: u32, server_hint_secs: Option<u64>) -> Duration {
        if let Some(seconds) = server_hint_secs {
            return Duration::from_secs(seconds).min(self.max_delay);
        }
        self.delay_for(failure_count)
    }

    /// Awaitable form of [`Self::decide`]: suspends for the computed delay
    /// and then signals `true`; signals `false` immediately once the
    /// ceiling is reached.
    ///
    /// The wait is not cancellable from inside; a caller that needs early
    /// exit races it against its own signal.
    pub async fn wait_for_retry(&self, failure_count: u32) -> bool {
        match self.decide(failure_count) {
            RetryDecision::Stop => false,
            RetryDecision::After(delay) => {
                tracing::debug!(
                    failure_count,
                    delay_ms = delay.as_millis() as u64,
                    "backing off before retry"
                );
                sleep(delay).await;
                true
            }
        }
    }

    /// Status-code gate applied before the generic backoff decision.
    ///
    /// Authentication failures (401) and precondition failures (412) are
    /// never retried. Rate-limit responses (429) get a fixed budget of
    /// [`RATE_LIMIT_MAX_RETRIES`] regardless of `max_failures`.
    pub fn should_retry_status(&self, status: u16, failure_count: u32) -> bool {
        match status {
            401 | 412 => false,
            429 => failure_count < RATE_LIMIT_MAX_RETRIES,
            _ => failure_count < self.max_failures,
        }
    }
}
