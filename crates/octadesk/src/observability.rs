//! Structured logging for the request pipeline
//!
//! Every attempt, retry and final outcome goes through these helpers so the
//! field names stay consistent across the crate. Credentials never appear in
//! any event.

use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Request metadata for structured logging
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// HTTP method (GET, POST, etc.)
    pub method: String,
    /// Request path (no query string)
    pub path: String,
    /// Request body size in bytes (optional)
    pub body_size: Option<usize>,
}

impl RequestMetadata {
    /// Create new request metadata
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            body_size: None,
        }
    }

    /// Set the request body size
    pub fn with_body_size(mut self, size: usize) -> Self {
        self.body_size = Some(size);
        self
    }

    /// Log one attempt being sent
    pub fn log_attempt(&self, attempt: u32, max_attempts: u32) {
        debug!(
            method = %self.method,
            path = %self.path,
            body_size = self.body_size,
            attempt,
            max_attempts,
            "Sending HTTP request"
        );
    }

    /// Log a transient failure that will be retried
    pub fn log_retry(&self, attempt: u32, delay: Duration, reason: &str) {
        warn!(
            method = %self.method,
            path = %self.path,
            attempt,
            delay_ms = delay.as_millis(),
            reason = %reason,
            "Transient failure, retrying"
        );
    }
}

/// Response metadata for structured logging
#[derive(Debug, Clone)]
pub struct ResponseMetadata {
    /// HTTP status code, 0 when no response was received
    pub status: u16,
    /// Time elapsed across all attempts
    pub elapsed: Duration,
    /// Number of attempts made
    pub attempts: u32,
}

impl ResponseMetadata {
    /// Create new response metadata
    pub fn new(status: u16, elapsed: Duration) -> Self {
        Self {
            status,
            elapsed,
            attempts: 1,
        }
    }

    /// Set the number of attempts
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    /// Log a final 2xx outcome
    pub fn log_success(&self, request: &RequestMetadata) {
        info!(
            method = %request.method,
            path = %request.path,
            status = self.status,
            elapsed_ms = self.elapsed.as_millis(),
            attempts = self.attempts,
            "HTTP request succeeded"
        );
    }

    /// Log a final failure
    pub fn log_error(&self, request: &RequestMetadata, error: &str) {
        warn!(
            method = %request.method,
            path = %request.path,
            status = self.status,
            elapsed_ms = self.elapsed.as_millis(),
            attempts = self.attempts,
            error = %error,
            "HTTP request failed"
        );
    }
}

/// Timer for measuring request duration
pub struct RequestTimer {
    start: Instant,
}

impl RequestTimer {
    /// Start a new timer
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
