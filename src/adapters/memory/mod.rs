//! In-memory adapters.

pub mod secret_store;

pub use secret_store::InMemorySecretStore;
