//! Token cache port.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::models::CachedToken;

/// Failure talking to the token cache backend.
#[derive(Debug, Error)]
pub enum TokenCacheError {
    #[error("token cache backend unreachable: {0}")]
    Unreachable(String),
}

impl From<sqlx::Error> for TokenCacheError {
    fn from(err: sqlx::Error) -> Self {
        TokenCacheError::Unreachable(err.to_string())
    }
}

/// Store of derived access tokens, keyed by the credential set they were minted for.
///
/// The coordinator only calls the eviction methods. `put` exists for the
/// token-acquisition collaborator.
#[async_trait]
pub trait TokenCache: Send + Sync {
    /// Fetch the live token for a credential set, if any.
    async fn get(&self, credential_id: Uuid) -> Result<Option<CachedToken>, TokenCacheError>;

    /// Store a freshly minted token, replacing any previous one for the same set.
    async fn put(&self, token: CachedToken) -> Result<(), TokenCacheError>;

    /// Evict the token bound to `credential_id`. Returns how many entries were removed.
    async fn evict(&self, credential_id: Uuid) -> Result<u64, TokenCacheError>;

    /// Evict every cached token. Returns how many entries were removed.
    async fn evict_all(&self) -> Result<u64, TokenCacheError>;
}
