//! Process-local TokenCache backed by moka.
//!
//! Entries expire after the configured TTL or at the token's own
//! `expires_at`, whichever comes first.

use async_trait::async_trait;
use chrono::Utc;
use moka::future::Cache;
use std::time::Duration;
use uuid::Uuid;

use crate::domain::models::CachedToken;
use crate::domain::ports::{TokenCache, TokenCacheError};

/// Default TTL for cached tokens.
const TOKEN_CACHE_TTL_SECS: u64 = 3600;

/// Default maximum number of cached tokens.
const TOKEN_CACHE_MAX_CAPACITY: u64 = 64;

pub struct MokaTokenCache {
    tokens: Cache<Uuid, CachedToken>,
}

impl MokaTokenCache {
    /// Create a token cache with default TTL and capacity.
    pub fn new() -> Self {
        Self::with_limits(Duration::from_secs(TOKEN_CACHE_TTL_SECS), TOKEN_CACHE_MAX_CAPACITY)
    }

    pub fn with_limits(ttl: Duration, max_capacity: u64) -> Self {
        let tokens = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();

        Self { tokens }
    }
}

impl Default for MokaTokenCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenCache for MokaTokenCache {
    async fn get(&self, credential_id: Uuid) -> Result<Option<CachedToken>, TokenCacheError> {
        let token = self.tokens.get(&credential_id).await;
        Ok(token.filter(|t| !t.is_expired_at(Utc::now())))
    }

    async fn put(&self, token: CachedToken) -> Result<(), TokenCacheError> {
        self.tokens.insert(token.credential_id, token).await;
        Ok(())
    }

    async fn evict(&self, credential_id: Uuid) -> Result<u64, TokenCacheError> {
        Ok(u64::from(self.tokens.remove(&credential_id).await.is_some()))
    }

    async fn evict_all(&self) -> Result<u64, TokenCacheError> {
        let keys: Vec<Uuid> = self.tokens.iter().map(|(key, _)| *key).collect();
        let mut removed = 0;
        for key in keys {
            if self.tokens.remove(&key).await.is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Environment;

    fn token(id: Uuid) -> CachedToken {
        CachedToken::new(id, format!("tok-{id}"), Environment::Sandbox, chrono::Duration::hours(1))
    }

    #[tokio::test]
    async fn test_evict_single_entry() {
        let cache = MokaTokenCache::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        cache.put(token(a)).await.unwrap();
        cache.put(token(b)).await.unwrap();

        assert_eq!(cache.evict(a).await.unwrap(), 1);
        assert!(cache.get(a).await.unwrap().is_none());
        assert!(cache.get(b).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_evict_on_empty_cache_is_zero() {
        let cache = MokaTokenCache::new();
        assert_eq!(cache.evict(Uuid::new_v4()).await.unwrap(), 0);
        assert_eq!(cache.evict_all().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_evict_all_counts_entries() {
        let cache = MokaTokenCache::new();
        for _ in 0..3 {
            cache.put(token(Uuid::new_v4())).await.unwrap();
        }

        assert_eq!(cache.evict_all().await.unwrap(), 3);
        assert_eq!(cache.evict_all().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_expired_token_is_hidden() {
        let cache = MokaTokenCache::new();
        let id = Uuid::new_v4();
        cache
            .put(CachedToken::new(id, "old", Environment::Live, chrono::Duration::seconds(-5)))
            .await
            .unwrap();

        assert!(cache.get(id).await.unwrap().is_none());
    }
}
