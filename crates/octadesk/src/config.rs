//! Configuration for the Octadesk client

use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use url::Url;

use crate::error::{Error, Result};
use crate::http::RetryPolicy;
use crate::http::retry::{DEFAULT_BASE_DELAY, DEFAULT_MAX_RETRIES};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "X_API_KEY";
/// Environment variable holding the agent email.
pub const ENV_AGENT_EMAIL: &str = "OCTA_AGENT_EMAIL";
/// Environment variable holding the API base URL.
pub const ENV_BASE_URL: &str = "OCTA_BASE_URL";
/// Environment variable holding the request timeout in seconds.
pub const ENV_TIMEOUT: &str = "OCTA_TIMEOUT";
/// Environment variable holding the attempt budget.
pub const ENV_MAX_RETRIES: &str = "OCTA_MAX_RETRIES";

/// API key and acting agent, fixed for the lifetime of a client.
///
/// `Debug` output redacts the key.
#[derive(Debug, Clone)]
pub struct Credentials {
    api_key: SecretString,
    agent_email: String,
}

impl Credentials {
    /// Create credentials, rejecting empty values.
    pub fn new(api_key: impl Into<String>, agent_email: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        let agent_email = agent_email.into();

        if api_key.trim().is_empty() {
            return Err(Error::MissingConfig("api_key".to_string()));
        }
        if agent_email.trim().is_empty() {
            return Err(Error::MissingConfig("agent_email".to_string()));
        }

        Ok(Self {
            api_key: SecretString::new(api_key.into_boxed_str()),
            agent_email,
        })
    }

    /// The API key sent as `x-api-key`.
    pub fn api_key(&self) -> &SecretString {
        &self.api_key
    }

    /// The agent identity sent as `octa-agent-email`.
    pub fn agent_email(&self) -> &str {
        &self.agent_email
    }
}

/// Configuration for the Octadesk client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API key for authentication
    pub api_key: Option<SecretString>,

    /// Email of the agent the requests act as
    pub agent_email: Option<String>,

    /// Base URL for the API, e.g. `https://o123.api001.octadesk.services`
    pub base_url: Option<String>,

    /// Timeout for each attempt
    pub timeout: Duration,

    /// Total attempts per request, the first one included
    pub max_retries: u32,

    /// Unit of the exponential backoff schedule
    pub retry_base_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            agent_email: None,
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl ClientConfig {
    /// Create a configuration with the required fields set.
    pub fn new(
        api_key: impl Into<String>,
        agent_email: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        ClientConfigBuilder::new()
            .api_key(api_key)
            .agent_email(agent_email)
            .base_url(base_url)
            .build()
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    /// This will look for:
    /// - `X_API_KEY` for the API key
    /// - `OCTA_AGENT_EMAIL` for the agent identity
    /// - `OCTA_BASE_URL` for the API base URL
    /// - `OCTA_TIMEOUT` for request timeout (in seconds)
    /// - `OCTA_MAX_RETRIES` for the attempt budget
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingConfig`] naming the first required variable
    /// that is not set.
    #[cfg(feature = "env")]
    pub fn from_env() -> Result<Self> {
        use std::env;

        if let Err(e) = dotenvy::dotenv()
            && !e.not_found()
        {
            tracing::warn!(error = %e, "Ignoring unreadable .env file");
        }

        let required = |name: &str| {
            env::var(name)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| Error::MissingConfig(name.to_string()))
        };

        let mut config = Self::new(
            required(ENV_API_KEY)?,
            required(ENV_AGENT_EMAIL)?,
            required(ENV_BASE_URL)?,
        );

        if let Ok(timeout_str) = env::var(ENV_TIMEOUT)
            && let Ok(timeout_secs) = timeout_str.parse::<u64>()
        {
            config.timeout = Duration::from_secs(timeout_secs);
        }

        if let Ok(max_retries_str) = env::var(ENV_MAX_RETRIES)
            && let Ok(max_retries) = max_retries_str.parse::<u32>()
        {
            config.max_retries = max_retries;
        }

        Ok(config)
    }

    /// Validated credentials.
    pub fn credentials(&self) -> Result<Credentials> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| Error::MissingConfig("api_key".to_string()))?;
        let agent_email = self
            .agent_email
            .as_deref()
            .ok_or_else(|| Error::MissingConfig("agent_email".to_string()))?;

        Credentials::new(api_key.expose_secret(), agent_email)
    }

    /// Validated base URL with any trailing slash removed.
    pub fn base_url(&self) -> Result<String> {
        let raw = self
            .base_url
            .as_deref()
            .ok_or_else(|| Error::MissingConfig("base_url".to_string()))?;

        let trimmed = raw.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(Error::InvalidUrl("Base URL cannot be empty".to_string()));
        }

        let url =
            Url::parse(trimmed).map_err(|e| Error::InvalidUrl(format!("{}: {}", trimmed, e)))?;
        match url.scheme() {
            "http" | "https" => Ok(trimmed.to_string()),
            scheme => Err(Error::InvalidUrl(format!(
                "Invalid URL scheme '{}'. Only 'http' and 'https' are supported.",
                scheme
            ))),
        }
    }

    /// Retry policy described by this configuration.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::builder()
            .max_attempts(self.max_retries)
            .base_delay(self.retry_base_delay)
            .build()
    }
}

/// Builder for creating ClientConfig with a fluent API.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = Some(SecretString::new(api_key.into().into_boxed_str()));
        self
    }

    /// Set the agent email.
    pub fn agent_email(mut self, agent_email: impl Into<String>) -> Self {
        self.config.agent_email = Some(agent_email.into());
        self
    }

    /// Set the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = Some(base_url.into());
        self
    }

    /// Set the request timeout.
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

    /// Build the configuration.
    pub fn build(self) -> ClientConfig {
        self.config
    }
}
