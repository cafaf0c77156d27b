//! Main client implementation for the Octadesk API

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use http::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use url::Url;

use octadesk_transport::{HttpTransport, HttpTransportConfig, Transport};

use crate::{
    config::{ClientConfig, Credentials},
    error::{Error, Result},
    http::{Endpoint, Payload, RequestBuilder, RetryPolicy},
    resources::Contacts,
};

/// Path probed by [`Client::health_check`].
pub const HEALTH_CHECK_PATH: &str = "/auth/check";

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Header carrying the acting agent's email.
pub const AGENT_EMAIL_HEADER: &str = "octa-agent-email";

/// Main client for interacting with the Octadesk API.
///
/// Every call authenticates with the configured credentials, retries
/// transient failures with backoff and classifies the final response.
/// Cloning is cheap; clones share the connection pool and nothing else.
///
/// # Example
///
/// ```rust,no_run
/// use octadesk::Client;
///
/// # async fn example() -> octadesk::Result<()> {
/// let client = Client::new(
///     "api-key",
///     "agent@example.com",
///     "https://o000.api001.octadesk.services",
/// )?;
///
/// let contact = client.contacts().get("abc-1").await?;
/// println!("{:?}", contact.name);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    transport: Arc<dyn Transport>,
    credentials: Credentials,
    base_url: String,
    policy: RetryPolicy,
}

impl Client {
    /// Create a client with the default transport and retry settings.
    ///
    /// # Errors
    ///
    /// Returns an error if a credential is empty, the base URL is invalid or
    /// the HTTP client cannot be built.
    pub fn new(
        api_key: impl Into<String>,
        agent_email: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        Self::builder()
            .api_key(api_key)
            .agent_email(agent_email)
            .base_url(base_url)
            .build()
    }

    /// Create a client from `X_API_KEY`, `OCTA_AGENT_EMAIL` and `OCTA_BASE_URL`.
    ///
    /// See [`ClientConfig::from_env`].
    #[cfg(feature = "env")]
    pub fn from_env() -> Result<Self> {
        Self::from_config(ClientConfig::from_env()?)
    }

    /// Create a new client builder for advanced configuration.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Create a client from a configuration object.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        Self::builder().config(config).build()
    }

    /// Access the contacts endpoints.
    pub fn contacts(&self) -> Contacts<'_> {
        Contacts::new(self)
    }

    /// Base URL requests are resolved against, without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Email of the agent requests act as.
    pub fn agent_email(&self) -> &str {
        self.inner.credentials.agent_email()
    }

    /// Retry policy applied to every call.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.inner.policy
    }

    /// Name of the underlying transport, for diagnostics.
    pub fn transport_name(&self) -> &'static str {
        self.inner.transport.name()
    }

    /// Create an authenticated request builder for `path`.
    ///
    /// The builder already carries the client's retry policy and the
    /// credential and content headers. Those headers are set here only and
    /// cannot be changed through the returned builder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the URL cannot be constructed from
    /// the base URL and path.
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.resolve(path)?;
        let credentials = &self.inner.credentials;

        let builder = RequestBuilder::new(method, url, Arc::clone(&self.inner.transport))
            .header(API_KEY_HEADER, credentials.api_key().expose_secret())
            .header(AGENT_EMAIL_HEADER, credentials.agent_email())
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .retry_policy(self.inner.policy);

        Ok(builder)
    }

    /// Execute one logical request.
    ///
    /// Transient failures are retried within the attempt budget. A 2xx
    /// response yields its decoded payload; anything else yields the
    /// classified [`Error`].
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use octadesk::{Client, http::Endpoint};
    ///
    /// # async fn example(client: Client) -> octadesk::Result<()> {
    /// let payload = client
    ///     .execute(Endpoint::get("/tickets").query("page", 1))
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn execute(&self, endpoint: Endpoint) -> Result<Payload> {
        let mut builder = self
            .request(endpoint.method().clone(), endpoint.path())?
            .query(endpoint.query_pairs());

        if let Some(body) = endpoint.body() {
            builder = builder.json(body)?;
        }

        builder.send().await?.into_payload()
    }

    /// `GET path`
    pub async fn get(&self, path: &str) -> Result<Payload> {
        self.execute(Endpoint::get(path)).await
    }

    /// `POST path` with a JSON body.
    pub async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Payload> {
        self.execute(Endpoint::post(path).json(body)?).await
    }

    /// `PUT path` with a JSON body.
    pub async fn put<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Payload> {
        self.execute(Endpoint::put(path).json(body)?).await
    }

    /// `PATCH path` with a JSON body.
    pub async fn patch<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Payload> {
        self.execute(Endpoint::patch(path).json(body)?).await
    }

    /// `DELETE path`
    pub async fn delete(&self, path: &str) -> Result<Payload> {
        self.execute(Endpoint::delete(path)).await
    }

    /// Check that the API is reachable and the credentials are accepted.
    ///
    /// Returns `Ok(false)` when the API rejects the credentials. Any other
    /// failure, network errors included, is returned as is.
    pub async fn health_check(&self) -> Result<bool> {
        match self.get(HEALTH_CHECK_PATH).await {
            Ok(_) => Ok(true),
            Err(Error::Authentication { .. }) => {
                tracing::warn!(agent = %self.agent_email(), "Health check rejected credentials");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    fn resolve(&self, path: &str) -> Result<Url> {
        let raw = if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}/{}", self.inner.base_url, path.trim_start_matches('/'))
        };

        Url::parse(&raw).map_err(|e| Error::InvalidUrl(format!("{}: {}", raw, e)))
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.inner.base_url)
            .field("agent_email", &self.inner.credentials.agent_email())
            .field("transport", &self.inner.transport.name())
            .field("max_attempts", &self.inner.policy.max_attempts())
            .finish_non_exhaustive()
    }
}

/// Builder for creating a configured [`Client`].
#[derive(Default)]
pub struct ClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
}

impl ClientBuilder {
    /// Start from an existing configuration, replacing what was set so far.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the API key for authentication.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = Some(SecretString::new(api_key.into().into_boxed_str()));
        self
    }

    /// Set the email of the agent requests act as.
    pub fn agent_email(mut self, agent_email: impl Into<String>) -> Self {
        self.config.agent_email = Some(agent_email.into());
        self
    }

    /// Set the base URL for the API.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = Some(base_url.into());
        self
    }

    /// Set the per-attempt timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the total number of attempts per request.
    ///
    /// A value of 0 is treated as 1: every request is sent at least once.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.config.max_retries = max_retries;
        self
    }

    /// Set the unit of the exponential backoff schedule.
    pub fn retry_base_delay(mut self, delay: Duration) -> Self {
        self.config.retry_base_delay = delay;
        self
    }

    /// Use a custom transport instead of the default reqwest one.
    ///
    /// The configured timeout is not applied to custom transports.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client with the configured options.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingConfig`] if a credential or the base URL is missing
    /// - [`Error::InvalidUrl`] if the base URL is not an http(s) URL
    /// - [`Error::HttpClient`] if the default transport cannot be built
    pub fn build(self) -> Result<Client> {
        let credentials = self.config.credentials()?;
        let base_url = self.config.base_url()?;
        let policy = self.config.retry_policy();

        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let transport = HttpTransport::with_config(HttpTransportConfig {
                    timeout: self.config.timeout,
                    ..Default::default()
                })
                .map_err(|e| Error::HttpClient(e.to_string()))?;
                Arc::new(transport) as Arc<dyn Transport>
            }
        };

        tracing::debug!(
            base_url = %base_url,
            transport = transport.name(),
            max_attempts = policy.max_attempts(),
            "Octadesk client configured"
        );

        Ok(Client {
            inner: Arc::new(ClientInner {
                transport,
                credentials,
                base_url,
                policy,
            }),
        })
    }
}
