//! Common test utilities for integration tests
//!
//! Provides shared fixtures, a fault-injecting token cache and helpers used
//! across multiple integration test files.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;
use uuid::Uuid;

use credswitch::adapters::cache::MokaTokenCache;
use credswitch::adapters::memory::InMemorySecretStore;
use credswitch::adapters::signal::RecordingSignalSink;
use credswitch::domain::errors::{CredentialError, CredentialResult};
use credswitch::domain::models::{CachedToken, CredentialSet, Environment, RegistryConfig};
use credswitch::domain::ports::{SecretStore, TokenCache, TokenCacheError};
use credswitch::services::{AuthStatusReporter, CacheCoordinator, CredentialRegistry, NewCredential};

/// Create a temporary directory for test isolation
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Create a temporary test database path
pub fn temp_db_path() -> (TempDir, PathBuf) {
    let dir = temp_dir();
    let db_path = dir.path().join("test.db");
    (dir, db_path)
}

/// Setup test logging
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Token cache whose availability and latency can be changed mid-test.
#[derive(Default)]
pub struct FlakyTokenCache {
    inner: MokaTokenCache,
    down: AtomicBool,
    delay_ms: AtomicU64,
    evict_calls: AtomicU64,
}

impl FlakyTokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_available(&self, available: bool) {
        self.down.store(!available, Ordering::SeqCst);
    }

    /// Make every call sleep for `delay` before answering.
    pub fn set_delay(&self, delay: Duration) {
        self.delay_ms
            .store(u64::try_from(delay.as_millis()).unwrap_or(u64::MAX), Ordering::SeqCst);
    }

    pub fn evict_calls(&self) -> u64 {
        self.evict_calls.load(Ordering::SeqCst)
    }

    async fn gate(&self) -> Result<(), TokenCacheError> {
        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.down.load(Ordering::SeqCst) {
            return Err(TokenCacheError::Unreachable("injected outage".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl TokenCache for FlakyTokenCache {
    async fn get(&self, credential_id: Uuid) -> Result<Option<CachedToken>, TokenCacheError> {
        self.gate().await?;
        self.inner.get(credential_id).await
    }

    async fn put(&self, token: CachedToken) -> Result<(), TokenCacheError> {
        self.gate().await?;
        self.inner.put(token).await
    }

    async fn evict(&self, credential_id: Uuid) -> Result<u64, TokenCacheError> {
        self.evict_calls.fetch_add(1, Ordering::SeqCst);
        self.gate().await?;
        self.inner.evict(credential_id).await
    }

    async fn evict_all(&self) -> Result<u64, TokenCacheError> {
        self.evict_calls.fetch_add(1, Ordering::SeqCst);
        self.gate().await?;
        self.inner.evict_all().await
    }
}

/// In-memory secret store whose pointer writes can be made to fail.
#[derive(Default)]
pub struct FlakySecretStore {
    inner: InMemorySecretStore,
    fail_saves: AtomicBool,
}

impl FlakySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_save_failing(&self, failing: bool) {
        self.fail_saves.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl SecretStore for FlakySecretStore {
    async fn insert(&self, credential: &CredentialSet) -> CredentialResult<()> {
        self.inner.insert(credential).await
    }

    async fn get(&self, id: Uuid) -> CredentialResult<Option<CredentialSet>> {
        self.inner.get(id).await
    }

    async fn list(&self) -> CredentialResult<Vec<CredentialSet>> {
        self.inner.list().await
    }

    async fn delete(&self, id: Uuid) -> CredentialResult<bool> {
        self.inner.delete(id).await
    }

    async fn load_active(&self) -> CredentialResult<Option<Uuid>> {
        self.inner.load_active().await
    }

    async fn save_active(&self, id: Option<Uuid>) -> CredentialResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(CredentialError::Storage("injected write failure".to_string()));
        }
        self.inner.save_active(id).await
    }
}

/// A registry wired to in-memory adapters, with handles to every fake.
pub struct Harness {
    pub registry: Arc<CredentialRegistry>,
    pub reporter: AuthStatusReporter,
    pub cache: Arc<FlakyTokenCache>,
    pub signals: Arc<RecordingSignalSink>,
    pub store: Arc<FlakySecretStore>,
}

impl Harness {
    pub async fn new() -> Self {
        Self::with_timeout(Duration::from_millis(200)).await
    }

    pub async fn with_timeout(timeout: Duration) -> Self {
        let store = Arc::new(FlakySecretStore::new());
        let cache = Arc::new(FlakyTokenCache::new());
        let signals = Arc::new(RecordingSignalSink::new());
        let coordinator = Arc::new(CacheCoordinator::with_timeout(
            cache.clone(),
            signals.clone(),
            timeout,
        ));
        let registry = Arc::new(
            CredentialRegistry::open(
                store.clone() as Arc<dyn SecretStore>,
                coordinator,
                &RegistryConfig::default(),
            )
            .await
            .expect("registry should open"),
        );
        let reporter = AuthStatusReporter::new(registry.clone());

        Self {
            registry,
            reporter,
            cache,
            signals,
            store,
        }
    }

    /// Cache a token for `credential_id` as the token-acquisition path would.
    pub async fn mint_token(&self, credential_id: Uuid, environment: Environment) -> CachedToken {
        let token = CachedToken::new(
            credential_id,
            format!("tok-{credential_id}"),
            environment,
            chrono::Duration::minutes(30),
        );
        self.cache.put(token.clone()).await.expect("put token");
        token
    }
}

pub fn new_credential(name: &str, environment: Environment) -> NewCredential {
    NewCredential {
        name: name.to_string(),
        client_id: format!("{name}-client-id"),
        client_secret: format!("{name}-client-secret"),
        environment,
    }
}
