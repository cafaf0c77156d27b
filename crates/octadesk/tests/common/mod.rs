//! Common test utilities and helpers

use std::collections::VecDeque;
use std::net::TcpListener;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use octadesk::async_trait;
use octadesk::{Client, HttpRequest, HttpResponse, Transport, TransportError};
use wiremock::MockServer;

/// Load a response fixture
#[allow(dead_code)]
pub fn load_response_fixture(name: &str) -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let path = Path::new(manifest_dir)
        .join("tests")
        .join("fixtures")
        .join("responses")
        .join(format!("{}.json", name));

    std::fs::read_to_string(&path).unwrap_or_else(|e| {
        panic!(
            "Failed to load response fixture '{}' from {:?}: {}",
            name, path, e
        )
    })
}

/// Create a test API key
#[allow(dead_code)]
pub fn test_api_key() -> String {
    "octa-test-key-0123456789abcdef".to_string()
}

/// Create a test agent email
#[allow(dead_code)]
pub fn test_agent_email() -> String {
    "agent@example.com".to_string()
}

/// Client against `base_url` with a fast backoff schedule
#[allow(dead_code)]
pub fn client_for_url(base_url: &str) -> Client {
    Client::builder()
        .api_key(test_api_key())
        .agent_email(test_agent_email())
        .base_url(base_url)
        .retry_base_delay(Duration::from_millis(5))
        .build()
        .expect("Failed to build client")
}

/// Client pointing to a mock server
#[allow(dead_code)]
pub fn client_for(server: &MockServer) -> Client {
    client_for_url(&server.uri())
}

/// Number of requests the mock server has seen
#[allow(dead_code)]
pub async fn received(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .expect("request recording is enabled")
        .len()
}

/// A base URL nothing listens on
#[allow(dead_code)]
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

/// In-memory transport replaying a fixed script of outcomes
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Mutex<VecDeque<Result<HttpResponse, TransportError>>>>,
    seen: Arc<Mutex<Vec<HttpRequest>>>,
}

#[allow(dead_code)]
impl ScriptedTransport {
    pub fn new(script: Vec<Result<HttpResponse, TransportError>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            seen: Arc::default(),
        }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn client(&self) -> Client {
        Client::builder()
            .api_key(test_api_key())
            .agent_email(test_agent_email())
            .base_url("https://octadesk.test")
            .retry_base_delay(Duration::from_millis(1))
            .transport(Arc::new(self.clone()))
            .build()
            .expect("Failed to build client")
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send_http(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.seen.lock().unwrap().push(request);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Request("script exhausted".to_string())))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// A JSON response with the given status
#[allow(dead_code)]
pub fn json_response(status: u16, body: &str) -> HttpResponse {
    HttpResponse::new(status, Default::default(), body.as_bytes().to_vec())
}
