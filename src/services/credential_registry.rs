//! Credential Registry
//!
//! Enforces the invariant that at most one stored credential set is active.
//! The pointer itself lives in the secret store and is re-read on every call,
//! so registries in separate processes sharing one database agree on it.
//! All mutations, and reads that need a consistent snapshot, go through one
//! mutex. `switch_to` holds that mutex across the server-side cache
//! invalidation, so no reader can see the new pointer while a token minted
//! for the old one is still servable.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::cache_coordinator::{CacheCoordinator, ClearOutcome, InvalidationScope};
use crate::domain::errors::{CredentialError, CredentialResult};
use crate::domain::models::{
    ActiveCredential, ClientInvalidation, CredentialSet, Environment, EvictionReport,
    InvalidationReason, ListedCredential, RegistryConfig,
};
use crate::domain::ports::SecretStore;

/// Input for [`CredentialRegistry::create`].
#[derive(Debug, Clone)]
pub struct NewCredential {
    pub name: String,
    pub client_id: String,
    pub client_secret: String,
    pub environment: Environment,
}

/// Result of a successful switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchOutcome {
    /// Pointer value before the switch
    pub previous: Option<Uuid>,
    /// Newly active credential set
    pub active: CredentialSet,
    /// Server-side tokens removed as part of the switch
    pub eviction: EvictionReport,
    /// Instruction for the client tier
    pub signal: ClientInvalidation,
}

pub struct CredentialRegistry {
    store: Arc<dyn SecretStore>,
    coordinator: Arc<CacheCoordinator>,
    allowed_environments: Vec<Environment>,
    lock: Mutex<()>,
}

impl CredentialRegistry {
    /// Open a registry over `store`, restoring the persisted active pointer.
    ///
    /// A pointer that references a record no longer in the store is cleared
    /// rather than trusted.
    pub async fn open(
        store: Arc<dyn SecretStore>,
        coordinator: Arc<CacheCoordinator>,
        config: &RegistryConfig,
    ) -> CredentialResult<Self> {
        if let Some(id) = store.load_active().await? {
            if store.get(id).await?.is_none() {
                warn!(credential_id = %id, "persisted active pointer references a missing credential set; clearing");
                store.save_active(None).await?;
            }
        }

        Ok(Self {
            store,
            coordinator,
            allowed_environments: config.allowed_environments.clone(),
            lock: Mutex::new(()),
        })
    }

    pub fn coordinator(&self) -> &Arc<CacheCoordinator> {
        &self.coordinator
    }

    /// Save a new credential set. Never changes the active pointer.
    #[instrument(skip(self, input), fields(name = %input.name, environment = %input.environment))]
    pub async fn create(&self, input: NewCredential) -> CredentialResult<CredentialSet> {
        if !self.allowed_environments.contains(&input.environment) {
            return Err(CredentialError::Validation(format!(
                "environment '{}' is not allowed",
                input.environment
            )));
        }

        let credential = CredentialSet::new(
            input.name,
            input.client_id,
            input.client_secret,
            input.environment,
        )?;

        let _guard = self.lock.lock().await;
        self.store.insert(&credential).await?;

        info!(credential_id = %credential.id, "credential set created");
        Ok(credential)
    }

    /// Every stored credential set in insertion order, annotated with its active flag.
    pub async fn list(&self) -> CredentialResult<Vec<ListedCredential>> {
        let _guard = self.lock.lock().await;
        let active = self.store.load_active().await?;
        let credentials = self.store.list().await?;

        Ok(credentials
            .into_iter()
            .map(|credential| ListedCredential {
                is_active: active == Some(credential.id),
                credential,
            })
            .collect())
    }

    /// Look up one credential set.
    pub async fn get(&self, id: Uuid) -> CredentialResult<CredentialSet> {
        self.store.get(id).await?.ok_or(CredentialError::NotFound(id))
    }

    /// The active credential set, or [`ActiveCredential::NotConfigured`].
    pub async fn get_active(&self) -> CredentialResult<ActiveCredential> {
        let _guard = self.lock.lock().await;
        let Some(id) = self.store.load_active().await? else {
            return Ok(ActiveCredential::NotConfigured);
        };

        match self.store.get(id).await? {
            Some(credential) => Ok(ActiveCredential::Configured(credential)),
            None => {
                warn!(credential_id = %id, "active credential set vanished from the store");
                Ok(ActiveCredential::NotConfigured)
            }
        }
    }

    /// Current value of the persisted active pointer.
    pub async fn active_id(&self) -> CredentialResult<Option<Uuid>> {
        let _guard = self.lock.lock().await;
        self.store.load_active().await
    }

    /// Make `id` the active credential set.
    ///
    /// Tokens for the previous and the target set are evicted before the new
    /// pointer is persisted or published. If eviction fails the switch fails
    /// with [`CredentialError::CacheUnavailable`] and the pointer keeps its
    /// prior value. Switching to the already-active set is allowed and still
    /// invalidates, so callers can use it to force a refresh.
    #[instrument(skip(self))]
    pub async fn switch_to(&self, id: Uuid) -> CredentialResult<SwitchOutcome> {
        let (previous, active, eviction) = {
            let _guard = self.lock.lock().await;
            let target = self.store.get(id).await?.ok_or(CredentialError::NotFound(id))?;
            let previous = self.store.load_active().await?;

            let eviction = self
                .coordinator
                .invalidate_server_cache(&InvalidationScope::for_switch(previous, id))
                .await?;

            self.store.save_active(Some(id)).await?;
            self.coordinator.environment_hint().clear();

            (previous, target, eviction)
        };

        let signal = self
            .coordinator
            .request_client_invalidation(InvalidationReason::CredentialSwitched {
                previous,
                current: id,
            })
            .await;

        info!(
            previous = ?previous,
            active = %active.id,
            environment = %active.environment,
            evicted = eviction.entries(),
            "active credential switched"
        );

        Ok(SwitchOutcome {
            previous,
            active,
            eviction,
            signal,
        })
    }

    /// Permanently remove a credential set. The active set cannot be deleted.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> CredentialResult<()> {
        let _guard = self.lock.lock().await;
        if self.store.load_active().await? == Some(id) {
            return Err(CredentialError::ActiveCredential(id));
        }

        if !self.store.delete(id).await? {
            return Err(CredentialError::NotFound(id));
        }

        info!(credential_id = %id, "credential set deleted");
        Ok(())
    }

    /// Clear every dependent cache without changing the active pointer.
    ///
    /// Serialized with switches so a clear cannot interleave with one.
    pub async fn clear_caches(&self) -> CredentialResult<ClearOutcome> {
        let _guard = self.lock.lock().await;
        self.coordinator.clear_all().await
    }
}
