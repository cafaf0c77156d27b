//! Core types for the Octadesk API
//!
//! Models are permissive: every field the API may omit is optional and
//! unknown fields are kept so a record survives a read-modify-write cycle.

pub use contact::*;

pub mod contact;
