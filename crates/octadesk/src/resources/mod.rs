//! API resource endpoints
//!
//! Each resource is a borrowed view over a [`Client`](crate::Client) grouping
//! the calls of one API area.

pub mod contacts;

pub use contacts::{Contacts, ListContactsParams};
