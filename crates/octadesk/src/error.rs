//! Error types for the Octadesk client
//!
//! HTTP failures are classified once, when a response is final, into a small
//! fixed taxonomy. Local failures (configuration, serialization, decoding)
//! share the same enum so callers deal with a single `Result`.

use std::time::Duration;
use thiserror::Error;

use crate::http::{Payload, retry::parse_retry_after};
use octadesk_transport::{HttpResponse, TransportError};

/// Result type alias for operations that can fail with an Octadesk client error.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Octadesk client.
#[derive(Debug, Error)]
pub enum Error {
    /// Authentication failed (401).
    #[error("Authentication failed")]
    Authentication {
        /// Decoded response body
        body: Payload,
    },

    /// Resource not found (404).
    #[error("Resource not found")]
    NotFound {
        /// Decoded response body
        body: Payload,
    },

    /// The API rejected the request payload (400).
    #[error("Validation failed: {body}")]
    Validation {
        /// Decoded response body, kept verbatim
        body: Payload,
    },

    /// Rate limit exceeded (429).
    #[error("Rate limit exceeded")]
    RateLimit {
        /// Positive `Retry-After` hint sent by the server, if any
        retry_after: Option<Duration>,
        /// Decoded response body
        body: Payload,
    },

    /// Server-side failure (any 5xx).
    #[error("Server error ({status})")]
    Server {
        /// HTTP status code
        status: u16,
        /// Decoded response body
        body: Payload,
    },

    /// Any other outcome. Status 0 means no response was ever received.
    #[error("{message}")]
    Api {
        /// HTTP status code, or 0 for network failures
        status: u16,
        /// Human-readable description
        message: String,
        /// Decoded response body, absent for network failures
        body: Option<Payload>,
    },

    /// Failed to decode a successful response into the expected type.
    #[error("Failed to parse API response: {0}")]
    ResponseValidation(String),

    /// Invalid request parameters.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP client configuration or initialization error.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Missing required configuration.
    #[error("Missing required configuration: {0}")]
    MissingConfig(String),
}

impl Error {
    /// Classify a final, non-2xx HTTP response.
    pub fn from_response(response: &HttpResponse) -> Self {
        let body = Payload::from_bytes(&response.body);
        match response.status {
            401 => Error::Authentication { body },
            404 => Error::NotFound { body },
            400 => Error::Validation { body },
            429 => Error::RateLimit {
                retry_after: response
                    .get_header("retry-after")
                    .and_then(|value| parse_retry_after(value.trim()))
                    .filter(|secs| *secs > 0)
                    .map(Duration::from_secs),
                body,
            },
            status @ 500..=599 => Error::Server { status, body },
            status => Error::Api {
                status,
                message: format!("API returned status {}", status),
                body: Some(body),
            },
        }
    }

    /// Wrap a network failure that exhausted the retry budget.
    pub fn network(err: &TransportError) -> Self {
        Error::Api {
            status: 0,
            message: err.to_string(),
            body: None,
        }
    }

    /// HTTP status this error was classified from, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Authentication { .. } => Some(401),
            Error::NotFound { .. } => Some(404),
            Error::Validation { .. } => Some(400),
            Error::RateLimit { .. } => Some(429),
            Error::Server { status, .. } | Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Response body attached to a classified error.
    pub fn body(&self) -> Option<&Payload> {
        match self {
            Error::Authentication { body }
            | Error::NotFound { body }
            | Error::Validation { body }
            | Error::RateLimit { body, .. }
            | Error::Server { body, .. } => Some(body),
            Error::Api { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Check if this error describes a transient condition.
    ///
    /// The client has already retried these up to its budget by the time the
    /// caller sees them; this is for callers layering their own retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::RateLimit { .. } => true,
            Error::Server { status, .. } => matches!(status, 502..=504),
            Error::Api { status, .. } => *status == 0,
            _ => false,
        }
    }

    /// Get the server's retry hint if this is a rate limit error.
    pub fn retry_after(&self) -> Option<Duration> {
        if let Error::RateLimit { retry_after, .. } = self {
            *retry_after
        } else {
            None
        }
    }
}
