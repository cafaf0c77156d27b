//! Retry policy for the request pipeline
//!
//! The policy is a pure function of the attempt number and what that attempt
//! produced. The async loop in [`RequestBuilder::send`](super::RequestBuilder::send)
//! only sleeps and logs; every decision is made here.
//!
//! # Rules
//!
//! - Network failures are retried after `base_delay * 2^(attempt-1)` until
//!   the last attempt.
//! - Responses with status 429, 502, 503 or 504 are retried until the last
//!   attempt, waiting for the server's `Retry-After` seconds when it is a
//!   plain integer and falling back to the same exponential schedule.
//! - Everything else is final.

use octadesk_transport::{HttpResponse, TransportError};
use std::time::Duration;

/// Default total number of attempts per request.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default unit of the exponential backoff schedule.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Statuses worth another attempt.
pub const TRANSIENT_STATUSES: [u16; 4] = [429, 502, 503, 504];

/// What a single attempt produced.
#[derive(Debug, Clone, Copy)]
pub enum Outcome<'a> {
    /// No response was received
    Network(&'a TransportError),
    /// A response with some status was received
    Response(&'a HttpResponse),
}

/// What to do after an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Wait this long, then send the request again
    Retry(Duration),
    /// Stop and hand the outcome to the caller
    Done,
}

/// Attempt budget and backoff schedule.
///
/// # Examples
///
/// ```rust
/// use octadesk::http::retry::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::builder()
///     .max_attempts(5)
///     .base_delay(Duration::from_millis(200))
///     .build();
///
/// assert_eq!(policy.backoff(3), Duration::from_millis(800));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with `max_attempts` total attempts and the default schedule.
    ///
    /// A budget of zero is raised to one: every request is sent at least once.
    pub fn new(max_attempts: u32) -> Self {
        Self::builder().max_attempts(max_attempts).build()
    }

    /// Create a new builder for configuring the retry policy.
    pub fn builder() -> RetryPolicyBuilder {
        RetryPolicyBuilder::default()
    }

    /// Total attempts allowed, the first one included.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Unit of the exponential schedule.
    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Exponential delay after the given (1-based) attempt.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32
            .checked_pow(attempt.saturating_sub(1))
            .unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    /// Decide what happens after the given (1-based) attempt.
    pub fn decide(&self, attempt: u32, outcome: Outcome<'_>) -> RetryDecision {
        let has_budget = attempt < self.max_attempts;
        match outcome {
            Outcome::Network(err) if err.is_network() && has_budget => {
                RetryDecision::Retry(self.backoff(attempt))
            }
            Outcome::Network(_) => RetryDecision::Done,
            Outcome::Response(response) if is_transient_status(response.status) && has_budget => {
                let delay = response
                    .get_header("retry-after")
                    .and_then(parse_retry_after)
                    .map(Duration::from_secs)
                    .unwrap_or_else(|| self.backoff(attempt));
                RetryDecision::Retry(delay)
            }
            Outcome::Response(_) => RetryDecision::Done,
        }
    }
}

/// Check whether a status code signals a transient failure.
pub fn is_transient_status(status: u16) -> bool {
    TRANSIENT_STATUSES.contains(&status)
}

/// Parse a `Retry-After` value given as whole seconds.
///
/// Only plain ASCII digits are accepted; HTTP dates, signs, fractions and
/// surrounding whitespace all yield `None`.
pub fn parse_retry_after(value: &str) -> Option<u64> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

/// Builder for retry policies.
#[derive(Debug, Clone)]
pub struct RetryPolicyBuilder {
    max_attempts: u32,
    base_delay: Duration,
}

impl Default for RetryPolicyBuilder {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl RetryPolicyBuilder {
    /// Set the total number of attempts, the first one included.
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the unit of the exponential schedule.
    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Build the retry policy.
    pub fn build(self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay: self.base_delay,
        }
    }
}
