//! credswitch - credential registry with safe active-set switching
//!
//! Stores named API credential sets (client id, client secret, environment),
//! keeps exactly zero or one of them active, and makes sure that switching
//! never leaves a token minted for the previous set servable.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, errors and the port traits
//! - **Adapters** (`adapters`): `SQLite`, moka and in-memory port implementations
//! - **Service Layer** (`services`): registry, cache coordinator, status reporter
//! - **Infrastructure Layer** (`infrastructure`): config, logging, service wiring
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use credswitch::adapters::{cache::MokaTokenCache, memory::InMemorySecretStore, signal::RecordingSignalSink};
//! use credswitch::services::{CacheCoordinator, CredentialRegistry, NewCredential};
//!
//! let coordinator = Arc::new(CacheCoordinator::new(
//!     Arc::new(MokaTokenCache::new()),
//!     Arc::new(RecordingSignalSink::new()),
//! ));
//! let registry = CredentialRegistry::open(
//!     Arc::new(InMemorySecretStore::new()),
//!     coordinator,
//!     &Default::default(),
//! )
//! .await?;
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{CredentialError, CredentialResult, ErrorKind};
pub use domain::models::{
    ActiveCredential, AuthStatus, CachedToken, ClientInvalidation, Config, CredentialSet,
    Environment, EvictionReport, InvalidationReason,
};
pub use domain::ports::{ClientSignalSink, SecretStore, TokenCache};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{AuthStatusReporter, CacheCoordinator, CredentialRegistry, NewCredential};
