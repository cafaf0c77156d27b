//! Transport error types

use std::fmt;

/// Result type for transport operations
pub type Result<T> = std::result::Result<T, TransportError>;

/// Errors that can occur before a response status is known
#[derive(Debug)]
pub enum TransportError {
    /// The request did not complete within the configured timeout
    Timeout,

    /// Connection could not be established (refused, DNS, TLS)
    Connection(String),

    /// The request was sent but failed mid-flight (reset, truncated body)
    Request(String),

    /// The request could not be built at all
    InvalidRequest(String),
}

impl TransportError {
    /// Whether this failure happened on the network and may resolve on retry.
    pub fn is_network(&self) -> bool {
        match self {
            Self::Timeout | Self::Connection(_) | Self::Request(_) => true,
            Self::InvalidRequest(_) => false,
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "Timeout"),
            Self::Connection(msg) => write!(f, "Connection error: {}", msg),
            Self::Request(msg) => write!(f, "Request error: {}", msg),
            Self::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connection(err.to_string())
        } else if err.is_builder() {
            Self::InvalidRequest(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}
