//! Blocking client
//!
//! Wraps the async [`Client`](crate::Client) and drives each call to
//! completion on a private current-thread tokio runtime. The calling thread
//! is blocked for the whole call, backoff waits included.
//!
//! Do not use this client from inside an async runtime; blocking a runtime
//! worker panics. Use the async client there instead.
//!
//! ```rust,no_run
//! use octadesk::blocking::Client;
//!
//! # fn main() -> octadesk::Result<()> {
//! let client = Client::new(
//!     "api-key",
//!     "agent@example.com",
//!     "https://o000.api001.octadesk.services",
//! )?;
//!
//! if client.health_check()? {
//!     let contacts = client.contacts().list(&Default::default())?;
//!     println!("{} contacts", contacts.len());
//! }
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use tokio::runtime::{Builder, Runtime};

use crate::{
    ClientBuilder,
    error::{Error, Result},
    http::{Endpoint, Payload},
    resources::ListContactsParams,
    types::Contact,
};

/// Synchronous Octadesk client.
///
/// Cloning is cheap; clones share the runtime and the connection pool.
#[derive(Clone)]
pub struct Client {
    inner: crate::Client,
    runtime: Arc<Runtime>,
}

impl Client {
    /// Create a client with the default transport and retry settings.
    ///
    /// # Errors
    ///
    /// Same as [`crate::Client::new`], plus [`Error::HttpClient`] if the
    /// runtime cannot be started.
    pub fn new(
        api_key: impl Into<String>,
        agent_email: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        Self::from_async(crate::Client::new(api_key, agent_email, base_url)?)
    }

    /// Create a client from the environment, see [`crate::ClientConfig::from_env`].
    #[cfg(feature = "env")]
    pub fn from_env() -> Result<Self> {
        Self::from_async(crate::Client::from_env()?)
    }

    /// Build from a configured [`ClientBuilder`].
    pub fn from_builder(builder: ClientBuilder) -> Result<Self> {
        Self::from_async(builder.build()?)
    }

    /// Wrap an existing async client.
    pub fn from_async(inner: crate::Client) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::HttpClient(format!("failed to start runtime: {}", e)))?;

        Ok(Self {
            inner,
            runtime: Arc::new(runtime),
        })
    }

    /// The wrapped async client.
    pub fn as_async(&self) -> &crate::Client {
        &self.inner
    }

    /// Access the contacts endpoints.
    pub fn contacts(&self) -> Contacts<'_> {
        Contacts { client: self }
    }

    /// Execute one logical request, see [`crate::Client::execute`].
    pub fn execute(&self, endpoint: Endpoint) -> Result<Payload> {
        self.block_on(self.inner.execute(endpoint))
    }

    /// `GET path`
    pub fn get(&self, path: &str) -> Result<Payload> {
        self.block_on(self.inner.get(path))
    }

    /// `POST path` with a JSON body.
    pub fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Payload> {
        self.block_on(self.inner.post(path, body))
    }

    /// `PUT path` with a JSON body.
    pub fn put<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Payload> {
        self.block_on(self.inner.put(path, body))
    }

    /// `PATCH path` with a JSON body.
    pub fn patch<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Payload> {
        self.block_on(self.inner.patch(path, body))
    }

    /// `DELETE path`
    pub fn delete(&self, path: &str) -> Result<Payload> {
        self.block_on(self.inner.delete(path))
    }

    /// See [`crate::Client::health_check`].
    pub fn health_check(&self) -> Result<bool> {
        self.block_on(self.inner.health_check())
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("blocking::Client")
            .field("inner", &self.inner)
            .finish()
    }
}

/// Blocking view of the contacts endpoints.
#[derive(Clone, Copy)]
pub struct Contacts<'a> {
    client: &'a Client,
}

impl Contacts<'_> {
    /// See [`crate::resources::Contacts::get`].
    pub fn get(&self, id: &str) -> Result<Contact> {
        self.client.block_on(self.client.inner.contacts().get(id))
    }

    /// See [`crate::resources::Contacts::list`].
    pub fn list(&self, params: &ListContactsParams) -> Result<Vec<Contact>> {
        self.client.block_on(self.client.inner.contacts().list(params))
    }

    /// See [`crate::resources::Contacts::create`].
    pub fn create(&self, contact: &Contact) -> Result<Contact> {
        self.client.block_on(self.client.inner.contacts().create(contact))
    }

    /// See [`crate::resources::Contacts::update`].
    pub fn update(&self, contact: &Contact) -> Result<Contact> {
        self.client.block_on(self.client.inner.contacts().update(contact))
    }

    /// See [`crate::resources::Contacts::replace`].
    pub fn replace(&self, contact: &Contact) -> Result<Contact> {
        self.client.block_on(self.client.inner.contacts().replace(contact))
    }
}
