//! HTTP response handling

use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;

use crate::error::{Error, Result};
use octadesk_transport::HttpResponse;

/// A decoded response body.
///
/// Bodies that parse as JSON become [`Payload::Json`]; anything else,
/// including an empty body, is kept as text. The choice is made once here
/// and never re-inferred downstream.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Body parsed as JSON
    Json(serde_json::Value),
    /// Body that was not valid JSON (lossy UTF-8)
    Text(String),
}

impl Payload {
    /// Decode raw body bytes.
    pub fn from_bytes(body: &[u8]) -> Self {
        match serde_json::from_slice(body) {
            Ok(value) => Payload::Json(value),
            Err(_) => Payload::Text(String::from_utf8_lossy(body).into_owned()),
        }
    }

    /// The JSON value, if the body was JSON.
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Payload::Json(value) => Some(value),
            Payload::Text(_) => None,
        }
    }

    /// The raw text, if the body was not JSON.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text),
            Payload::Json(_) => None,
        }
    }

    /// Check whether the body was JSON.
    pub fn is_json(&self) -> bool {
        matches!(self, Payload::Json(_))
    }

    /// Deserialize a JSON payload into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResponseValidation`] if the body was text or does not
    /// match the shape of `T`.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T> {
        match self {
            Payload::Json(value) => {
                serde_json::from_value(value).map_err(|e| Error::ResponseValidation(e.to_string()))
            }
            Payload::Text(text) => Err(Error::ResponseValidation(format!(
                "expected a JSON body, got text: {}",
                truncate(&text, 200)
            ))),
        }
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Json(value) => write!(f, "{}", value),
            Payload::Text(text) => f.write_str(text),
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Final response of a request, after retries.
#[derive(Debug)]
pub struct Response {
    inner: HttpResponse,
    attempts: u32,
    elapsed: Duration,
}

impl Response {
    /// Create a new response.
    pub fn new(inner: HttpResponse, attempts: u32, elapsed: Duration) -> Self {
        Self {
            inner,
            attempts,
            elapsed,
        }
    }

    /// Get the status code.
    pub fn status(&self) -> u16 {
        self.inner.status
    }

    /// Get a header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.get_header(name)
    }

    /// Get the raw body bytes.
    pub fn body(&self) -> &[u8] {
        &self.inner.body
    }

    /// Number of attempts it took to get this response.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Time spent across all attempts, backoff included.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Check if the response is successful (2xx status).
    pub fn is_success(&self) -> bool {
        self.inner.is_success()
    }

    /// Decode a successful response, converting anything else to a classified error.
    pub fn into_payload(self) -> Result<Payload> {
        if self.is_success() {
            Ok(Payload::from_bytes(&self.inner.body))
        } else {
            Err(Error::from_response(&self.inner))
        }
    }

    /// Decode a successful JSON response into `T`.
    pub fn parse_result<T: DeserializeOwned>(self) -> Result<T> {
        self.into_payload()?.into_typed()
    }
}
