//! Secret store port.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::CredentialResult;
use crate::domain::models::CredentialSet;

/// Durable storage for credential set records and the active pointer.
///
/// Implementations own the physical layout. They must return field values
/// exactly as written and keep ids stable. Consistency between the records
/// and the pointer is enforced by the registry, not by the store.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Persist a new credential set.
    async fn insert(&self, credential: &CredentialSet) -> CredentialResult<()>;

    /// Get a credential set by ID.
    async fn get(&self, id: Uuid) -> CredentialResult<Option<CredentialSet>>;

    /// List all credential sets ordered by creation time, then id.
    async fn list(&self) -> CredentialResult<Vec<CredentialSet>>;

    /// Remove a credential set. Returns `false` if nothing was stored under `id`.
    async fn delete(&self, id: Uuid) -> CredentialResult<bool>;

    /// Load the persisted active pointer.
    async fn load_active(&self) -> CredentialResult<Option<Uuid>>;

    /// Persist the active pointer (`None` clears it).
    async fn save_active(&self, id: Option<Uuid>) -> CredentialResult<()>;
}
