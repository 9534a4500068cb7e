pub mod auth_status;
pub mod config;
pub mod credential;
pub mod signal;
pub mod token;

pub use auth_status::{mask_client_id, mask_client_secret, AuthStatus};
pub use config::{
    Config, DatabaseConfig, LoggingConfig, RegistryConfig, TokenCacheBackend, TokenCacheConfig,
};
pub use credential::{ActiveCredential, ClientSecret, CredentialSet, Environment, ListedCredential};
pub use signal::{ClientInvalidation, ClientStateKey, InvalidationReason};
pub use token::{CachedToken, EvictionReport};
