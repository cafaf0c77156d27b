//! Transport trait and wire types
//!
//! Requests and responses are plain owned data so that any transport (the
//! reqwest one, or an in-memory fake in tests) can produce and consume them.

use crate::error::{Result, TransportError};
use async_trait::async_trait;
use std::collections::HashMap;

/// One outgoing HTTP request
///
/// Represents one attempt. The retry layer clones it for every attempt so
/// headers and body are identical across retries.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method
    pub method: http::Method,

    /// Absolute request URL, query string included
    pub url: String,

    /// Request headers
    pub headers: HashMap<String, String>,

    /// Request body (optional)
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Create a new HTTP request
    pub fn new(method: http::Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Add a header to the request
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the request body
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Serialize `value` as the JSON request body
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidRequest`] if the value cannot be serialized.
    pub fn with_json_body<T: serde::Serialize + ?Sized>(self, value: &T) -> Result<Self> {
        let body =
            serde_json::to_vec(value).map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
        Ok(self.with_body(body))
    }

    /// Get a header value by name (case-insensitive)
    pub fn get_header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// HTTP response
///
/// Any status code, including 4xx and 5xx, is a successful transport outcome.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,

    /// Response headers
    pub headers: HashMap<String, String>,

    /// Response body
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Create a new HTTP response
    pub fn new(status: u16, headers: HashMap<String, String>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check if response is an error (4xx or 5xx)
    pub fn is_error(&self) -> bool {
        self.status >= 400
    }

    /// Get the response body as text, replacing invalid UTF-8
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parse response body as JSON
    ///
    /// # Errors
    ///
    /// Returns the serde error if the body is not valid JSON for `T`
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.body)
    }

    /// Get a header value by name (case-insensitive)
    pub fn get_header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// A mechanism that can perform one HTTP round-trip.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send an HTTP request and receive a response
    ///
    /// Implementations must not retry; the caller owns the retry policy.
    async fn send_http(&self, request: HttpRequest) -> Result<HttpResponse>;

    /// Short name used in logs
    fn name(&self) -> &'static str {
        "custom"
    }
}
