//! Cache Invalidation Coordinator
//!
//! Guarantees that after any credential change no stale derived state can be
//! served. Server-side tokens are evicted synchronously and their failure is
//! fatal to the surrounding operation. The client tier only receives an
//! advisory [`ClientInvalidation`]; failing to deliver it is logged and
//! otherwise ignored.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::domain::errors::{CredentialError, CredentialResult};
use crate::domain::models::{ClientInvalidation, Environment, EvictionReport, InvalidationReason};
use crate::domain::ports::{ClientSignalSink, TokenCache, TokenCacheError};

/// Default upper bound for one server-side invalidation.
pub const DEFAULT_INVALIDATION_TIMEOUT: Duration = Duration::from_secs(2);

/// Last environment reported to operators.
///
/// Shared between the coordinator, which clears it, and the auth status
/// reporter, which fills it.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentHint(Arc<RwLock<Option<Environment>>>);

impl EnvironmentHint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Environment> {
        *self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set(&self, environment: Option<Environment>) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = environment;
    }

    pub fn clear(&self) {
        self.set(None);
    }
}

/// Which cached tokens a server-side invalidation covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidationScope {
    /// Tokens bound to these credential sets
    Credentials(Vec<Uuid>),
    /// Every cached token
    All,
}

impl InvalidationScope {
    /// Scope for a switch from `previous` to `target`.
    ///
    /// A token still cached for `target` was minted under an earlier
    /// activation and is stale too.
    pub fn for_switch(previous: Option<Uuid>, target: Uuid) -> Self {
        let mut ids: Vec<Uuid> = previous.into_iter().collect();
        if !ids.contains(&target) {
            ids.push(target);
        }
        Self::Credentials(ids)
    }
}

/// Result of a successful [`CacheCoordinator::clear_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearOutcome {
    pub eviction: EvictionReport,
    pub signal: ClientInvalidation,
}

pub struct CacheCoordinator {
    token_cache: Arc<dyn TokenCache>,
    signals: Arc<dyn ClientSignalSink>,
    environment_hint: EnvironmentHint,
    timeout: Duration,
}

impl CacheCoordinator {
    pub fn new(token_cache: Arc<dyn TokenCache>, signals: Arc<dyn ClientSignalSink>) -> Self {
        Self::with_timeout(token_cache, signals, DEFAULT_INVALIDATION_TIMEOUT)
    }

    pub fn with_timeout(
        token_cache: Arc<dyn TokenCache>,
        signals: Arc<dyn ClientSignalSink>,
        timeout: Duration,
    ) -> Self {
        Self {
            token_cache,
            signals,
            environment_hint: EnvironmentHint::new(),
            timeout,
        }
    }

    /// Handle to the hint this coordinator clears.
    pub fn environment_hint(&self) -> EnvironmentHint {
        self.environment_hint.clone()
    }

    /// Evict server-side tokens in `scope`.
    ///
    /// An empty cache is a success ([`EvictionReport::NothingToClear`]). A
    /// backend error or a call exceeding the configured timeout becomes
    /// [`CredentialError::CacheUnavailable`]; the call is idempotent and may be
    /// retried.
    #[instrument(skip(self), fields(timeout_ms = self.timeout.as_millis() as u64))]
    pub async fn invalidate_server_cache(&self, scope: &InvalidationScope) -> CredentialResult<EvictionReport> {
        let eviction = async {
            match scope {
                InvalidationScope::All => self.token_cache.evict_all().await,
                InvalidationScope::Credentials(ids) => {
                    let mut removed = 0;
                    for id in ids {
                        removed += self.token_cache.evict(*id).await?;
                    }
                    Ok::<u64, TokenCacheError>(removed)
                }
            }
        };

        let removed = match tokio::time::timeout(self.timeout, eviction).await {
            Ok(Ok(removed)) => removed,
            Ok(Err(err)) => {
                warn!(error = %err, "token cache invalidation failed");
                return Err(CredentialError::CacheUnavailable(err.to_string()));
            }
            Err(_) => {
                warn!("token cache invalidation timed out");
                return Err(CredentialError::CacheUnavailable(format!(
                    "invalidation did not complete within {}ms",
                    self.timeout.as_millis()
                )));
            }
        };

        let report = EvictionReport::from_count(removed);
        debug!(?report, "server token cache invalidated");
        Ok(report)
    }

    /// Tell the client tier to drop its cached environment and shop state.
    ///
    /// Never fails: delivery problems are logged and the signal is still
    /// returned so the caller can relay it another way.
    pub async fn request_client_invalidation(&self, reason: InvalidationReason) -> ClientInvalidation {
        let signal = ClientInvalidation::new(reason);
        match self.signals.publish(&signal).await {
            Ok(()) => debug!(signal_id = %signal.id, "client invalidation published"),
            Err(err) => warn!(signal_id = %signal.id, error = %err, "client invalidation not delivered"),
        }
        signal
    }

    /// Clear every dependent cache.
    ///
    /// The client signal is always emitted and the environment hint always
    /// cleared, whatever happens server-side. The returned result reflects
    /// the server-side outcome only.
    #[instrument(skip(self))]
    pub async fn clear_all(&self) -> CredentialResult<ClearOutcome> {
        let server = self.invalidate_server_cache(&InvalidationScope::All).await;
        self.environment_hint.clear();
        let signal = self.request_client_invalidation(InvalidationReason::CacheCleared).await;

        let eviction = server?;
        info!(evicted = eviction.entries(), "all caches cleared");
        Ok(ClearOutcome { eviction, signal })
    }
}
