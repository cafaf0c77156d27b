//! HTTP layer: request building, the retry loop and response decoding
//!
//! The wire itself lives in `octadesk-transport`; this module decides how
//! many times to use it and what the outcome means.

pub use endpoint::Endpoint;
pub use request::RequestBuilder;
pub use response::{Payload, Response};
pub use retry::{RetryDecision, RetryPolicy};

mod endpoint;
mod request;
mod response;
pub mod retry;

// Re-export HTTP types from the http crate for convenience
pub use http::Method;
