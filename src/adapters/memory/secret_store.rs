//! In-memory SecretStore, insertion ordered.
//!
//! Useful for embedding the registry in a process that persists elsewhere,
//! and as the default store in tests.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::errors::{CredentialError, CredentialResult};
use crate::domain::models::CredentialSet;
use crate::domain::ports::SecretStore;

#[derive(Default)]
struct StoreState {
    records: Vec<CredentialSet>,
    active: Option<Uuid>,
}

#[derive(Default)]
pub struct InMemorySecretStore {
    state: RwLock<StoreState>,
}

impl InMemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SecretStore for InMemorySecretStore {
    async fn insert(&self, credential: &CredentialSet) -> CredentialResult<()> {
        let mut state = self.state.write().await;
        if state.records.iter().any(|c| c.id == credential.id) {
            return Err(CredentialError::Storage(format!(
                "duplicate credential id {}",
                credential.id
            )));
        }
        state.records.push(credential.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> CredentialResult<Option<CredentialSet>> {
        let state = self.state.read().await;
        Ok(state.records.iter().find(|c| c.id == id).cloned())
    }

    async fn list(&self) -> CredentialResult<Vec<CredentialSet>> {
        Ok(self.state.read().await.records.clone())
    }

    async fn delete(&self, id: Uuid) -> CredentialResult<bool> {
        let mut state = self.state.write().await;
        let before = state.records.len();
        state.records.retain(|c| c.id != id);
        Ok(state.records.len() != before)
    }

    async fn load_active(&self) -> CredentialResult<Option<Uuid>> {
        Ok(self.state.read().await.active)
    }

    async fn save_active(&self, id: Option<Uuid>) -> CredentialResult<()> {
        self.state.write().await.active = id;
        Ok(())
    }
}
