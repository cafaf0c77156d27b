//! Wire-level transport for the Octadesk client
//!
//! This crate performs exactly one HTTP round-trip per call. It knows nothing
//! about retries, credentials or the shape of Octadesk errors: every status
//! code comes back as data and only network-level failures are reported as
//! errors. The `octadesk` crate layers retry and classification on top.
//!
//! # Architecture
//!
//! - **Transport trait**: seam between the client pipeline and the network
//! - **HTTP transport**: pooled reqwest implementation
//! - **Error handling**: network failures split by kind so callers can decide
//!   what is worth retrying

//!
//! # Usage
//!
//! ```ignore
//! use octadesk_transport::{HttpRequest, HttpTransport, Transport};
//!
//! let transport = HttpTransport::new()?;
//! let request = HttpRequest::new(http::Method::GET, "https://api.octadesk.test/contacts");
//! let response = transport.send_http(request).await?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod http;
pub mod traits;

// Re-export commonly used types
pub use error::{Result, TransportError};
pub use http::{HttpTransport, HttpTransportConfig};
pub use traits::{HttpRequest, HttpResponse, Transport};
