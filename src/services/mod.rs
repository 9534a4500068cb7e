//! Service layer: credential registry, cache invalidation, status reporting.

pub mod auth_status;
pub mod cache_coordinator;
pub mod credential_registry;

pub use auth_status::AuthStatusReporter;
pub use cache_coordinator::{
    CacheCoordinator, ClearOutcome, EnvironmentHint, InvalidationScope, DEFAULT_INVALIDATION_TIMEOUT,
};
pub use credential_registry::{CredentialRegistry, NewCredential, SwitchOutcome};
