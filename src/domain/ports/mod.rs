//! Port trait definitions (Hexagonal Architecture)
//!
//! Async trait interfaces that infrastructure adapters implement:
//! - SecretStore: credential set records and the active pointer
//! - TokenCache: derived access tokens keyed by credential set
//! - ClientSignalSink: delivery of client invalidation signals

pub mod client_signal;
pub mod secret_store;
pub mod token_cache;

pub use client_signal::{ClientSignalSink, SignalError};
pub use secret_store::SecretStore;
pub use token_cache::{TokenCache, TokenCacheError};
