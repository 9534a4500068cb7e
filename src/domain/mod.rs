//! Domain layer for credswitch
//!
//! Credential models, the error vocabulary, and the port traits that
//! infrastructure adapters implement.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{CredentialError, CredentialResult, ErrorKind};
