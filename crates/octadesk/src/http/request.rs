//! HTTP request builder

use super::Response;
use super::retry::{Outcome, RetryDecision, RetryPolicy};
use crate::error::{Error, Result};
use crate::observability::{RequestMetadata, RequestTimer, ResponseMetadata};
use http::Method;
use octadesk_transport::{HttpRequest, Transport};
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

/// Builder for one logical request.
///
/// Describes the endpoint (method, URL, query, body) and carries the
/// transport and retry policy it will be executed with. Nothing is retained
/// after [`send`](Self::send) returns.
#[derive(Clone)]
pub struct RequestBuilder {
    method: Method,
    url: Url,
    headers: HashMap<String, String>,
    body: Option<Vec<u8>>,
    policy: RetryPolicy,
    transport: Arc<dyn Transport>,
}

impl RequestBuilder {
    /// Create a new request builder.
    pub fn new(method: Method, url: Url, transport: Arc<dyn Transport>) -> Self {
        Self {
            method,
            url,
            headers: HashMap::new(),
            body: None,
            policy: RetryPolicy::default(),
            transport,
        }
    }

    /// Set a header, replacing any value already set under the same name.
    ///
    /// Names are stored lowercased so a name never appears twice on the wire.
    pub(crate) fn header(mut self, key: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers.insert(key.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    /// Append query parameters, keeping any already on the URL.
    pub fn query<K, V>(mut self, pairs: &[(K, V)]) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        if !pairs.is_empty() {
            self.url
                .query_pairs_mut()
                .extend_pairs(pairs.iter().map(|(k, v)| (k.as_ref(), v.as_ref())));
        }
        self
    }

    /// Serialize `body` as the JSON request body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] if the value cannot be serialized.
    pub fn json<T: serde::Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_vec(body)?);
        Ok(self)
    }

    /// Set the retry policy.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Send the request, retrying transient failures.
    ///
    /// Returns the final response whatever its status; use
    /// [`Response::into_payload`] to classify it. Fails only when no response
    /// was ever received, with an [`Error::Api`] of status 0.
    pub async fn send(self) -> Result<Response> {
        let Self {
            method,
            url,
            headers,
            body,
            policy,
            transport,
        } = self;

        let mut metadata = RequestMetadata::new(method.as_str(), url.path());
        if let Some(body) = &body {
            metadata = metadata.with_body_size(body.len());
        }

        let request = HttpRequest {
            method,
            url: url.into(),
            headers,
            body,
        };

        let timer = RequestTimer::start();
        let max_attempts = policy.max_attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;
            metadata.log_attempt(attempt, max_attempts);

            match transport.send_http(request.clone()).await {
                Ok(response) => match policy.decide(attempt, Outcome::Response(&response)) {
                    RetryDecision::Retry(delay) => {
                        metadata.log_retry(attempt, delay, &format!("status {}", response.status));
                        tokio::time::sleep(delay).await;
                    }
                    RetryDecision::Done => {
                        let outcome = ResponseMetadata::new(response.status, timer.elapsed())
                            .with_attempts(attempt);
                        if response.is_success() {
                            outcome.log_success(&metadata);
                        } else {
                            outcome.log_error(&metadata, &format!("status {}", response.status));
                        }
                        return Ok(Response::new(response, attempt, timer.elapsed()));
                    }
                },
                Err(err) => match policy.decide(attempt, Outcome::Network(&err)) {
                    RetryDecision::Retry(delay) => {
                        metadata.log_retry(attempt, delay, &err.to_string());
                        tokio::time::sleep(delay).await;
                    }
                    RetryDecision::Done => {
                        ResponseMetadata::new(0, timer.elapsed())
                            .with_attempts(attempt)
                            .log_error(&metadata, &err.to_string());
                        return Err(Error::network(&err));
                    }
                },
            }
        }
    }

    /// Get the method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Get the URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Get the headers, keyed by lowercased name.
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Get the serialized body, if any.
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

impl std::fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Headers carry the API key.
        f.debug_struct("RequestBuilder")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("body_size", &self.body.as_ref().map(Vec::len))
            .field("policy", &self.policy)
            .field("transport", &self.transport.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use octadesk_transport::{HttpResponse, TransportError};
    use std::sync::Mutex;

    /// Replays canned outcomes and records every request it receives.
    struct Scripted {
        outcomes: Mutex<Vec<std::result::Result<u16, TransportError>>>,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl Scripted {
        fn new(mut outcomes: Vec<std::result::Result<u16, TransportError>>) -> Arc<Self> {
            outcomes.reverse();
            Arc::new(Self {
                outcomes: Mutex::new(outcomes),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    #[async_trait::async_trait]
    impl Transport for Scripted {
        async fn send_http(
            &self,
            request: HttpRequest,
        ) -> octadesk_transport::Result<HttpResponse> {
            self.seen.lock().unwrap().push(request);
            let next = self.outcomes.lock().unwrap().pop().expect("script exhausted");
            next.map(|status| HttpResponse::new(status, HashMap::new(), b"{}".to_vec()))
        }
    }

    fn builder(transport: Arc<Scripted>, attempts: u32) -> RequestBuilder {
        RequestBuilder::new(
            Method::GET,
            Url::parse("https://api.octadesk.test/contacts").unwrap(),
            transport,
        )
        .retry_policy(
            RetryPolicy::builder()
                .max_attempts(attempts)
                .base_delay(std::time::Duration::from_millis(1))
                .build(),
        )
    }

    #[test]
    fn test_query_pairs_are_appended() {
        let transport = Scripted::new(vec![]);
        let request = builder(transport, 1).query(&[("page", "2"), ("limit", "10")]);
        assert_eq!(request.url().query(), Some("page=2&limit=10"));
    }

    #[test]
    fn test_empty_query_leaves_url_untouched() {
        let transport = Scripted::new(vec![]);
        let request = builder(transport, 1).query::<&str, &str>(&[]);
        assert_eq!(request.url().as_str(), "https://api.octadesk.test/contacts");
    }

    #[test]
    fn test_json_body() {
        let transport = Scripted::new(vec![]);
        let request = builder(transport, 1)
            .json(&serde_json::json!({"name": "x"}))
            .unwrap();
        assert_eq!(request.body(), Some(br#"{"name":"x"}"#.as_slice()));
    }

    #[test]
    fn test_header_names_are_case_insensitive() {
        let transport = Scripted::new(vec![]);
        let request = builder(transport, 1)
            .header("X-Api-Key", "first")
            .header("x-api-key", "second");

        assert_eq!(request.headers().len(), 1);
        assert_eq!(request.headers()["x-api-key"], "second");
    }

    #[test]
    fn test_debug_hides_headers() {
        let transport = Scripted::new(vec![]);
        let request = builder(transport, 1).header("x-api-key", "secret-key");
        assert!(!format!("{request:?}").contains("secret-key"));
    }

    #[tokio::test]
    async fn test_transient_then_success() {
        let transport = Scripted::new(vec![Ok(503), Ok(429), Ok(200)]);
        let response = builder(transport.clone(), 3).send().await.unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(response.attempts(), 3);
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test]
    async fn test_budget_exhausted_returns_last_response() {
        let transport = Scripted::new(vec![Ok(503), Ok(503), Ok(503)]);
        let response = builder(transport.clone(), 3).send().await.unwrap();
        assert_eq!(response.status(), 503);
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test]
    async fn test_network_failure_then_success() {
        let transport = Scripted::new(vec![Err(TransportError::Timeout), Ok(200)]);
        let response = builder(transport.clone(), 3).send().await.unwrap();
        assert_eq!(response.attempts(), 2);
    }

    #[tokio::test]
    async fn test_network_failure_exhausts_budget() {
        let transport = Scripted::new(vec![
            Err(TransportError::Connection("refused".to_string())),
            Err(TransportError::Connection("refused".to_string())),
        ]);
        let err = builder(transport.clone(), 2).send().await.unwrap_err();
        match err {
            Error::Api { status, message, body } => {
                assert_eq!(status, 0);
                assert!(message.contains("refused"));
                assert!(body.is_none());
            }
            other => panic!("Expected Api error, got {other:?}"),
        }
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_non_transient_status_is_not_retried() {
        let transport = Scripted::new(vec![Ok(404)]);
        let response = builder(transport.clone(), 3).send().await.unwrap();
        assert_eq!(response.status(), 404);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_follow_backoff_schedule() {
        let transport = Scripted::new(vec![Ok(502), Ok(502), Ok(200)]);
        let request = builder(transport, 3).retry_policy(RetryPolicy::default());

        let start = tokio::time::Instant::now();
        let response = request.send().await.unwrap();

        assert_eq!(response.status(), 200);
        // 1s after the first attempt, 2s after the second
        let waited = start.elapsed();
        assert!(waited >= std::time::Duration::from_secs(3), "waited {waited:?}");
        assert!(waited < std::time::Duration::from_secs(4), "waited {waited:?}");
    }
}
