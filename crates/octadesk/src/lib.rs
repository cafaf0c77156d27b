//! # Octadesk Rust client
//!
//! A typed client for the Octadesk CRM/helpdesk REST API.
//!
//! Every call goes through the same pipeline:
//! - authenticate with the API key and the acting agent's email
//! - retry network failures and transient statuses (429, 502, 503, 504)
//!   with `Retry-After` or exponential backoff
//! - classify the final response into a typed [`Error`] or decode the body
//!   into a [`Payload`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use octadesk::{Client, Contact};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new(
//!         "your-api-key",
//!         "agent@example.com",
//!         "https://o000.api001.octadesk.services",
//!     )?;
//!
//!     let created = client.contacts()
//!         .create(&Contact::named("Jane Doe"))
//!         .await?;
//!
//!     println!("created {:?}", created.id);
//!     Ok(())
//! }
//! ```
//!
//! With the default `blocking` feature, [`blocking::Client`] offers the same
//! calls without an async runtime.

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Re-export commonly used types
pub use client::{Client, ClientBuilder};
pub use config::{ClientConfig, ClientConfigBuilder, Credentials};
pub use error::{Error, Result};
pub use http::{Endpoint, Payload, Response};
pub use resources::{Contacts, ListContactsParams};
pub use types::*;

// Module declarations
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod observability;
pub mod resources;
pub mod types;

// Optional blocking client
#[cfg(feature = "blocking")]
#[cfg_attr(docsrs, doc(cfg(feature = "blocking")))]
pub mod blocking;

// Re-export the transport seam for custom transports
pub use octadesk_transport::{HttpRequest, HttpResponse, Transport, TransportError};

// Re-export key dependencies for convenience
pub use async_trait::async_trait;
pub use serde_json::Value as JsonValue;

/// Client version, automatically updated from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install a `tracing` subscriber honouring `RUST_LOG`.
///
/// Convenience for binaries and examples; libraries embedding this client
/// should configure their own subscriber instead. Does nothing if a global
/// subscriber is already set.
#[cfg(feature = "trace")]
#[cfg_attr(docsrs, doc(cfg(feature = "trace")))]
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("octadesk=info")),
        )
        .try_init();
}

#[cfg(test)]
mod property_tests;
