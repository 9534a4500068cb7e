//! SQLite implementation of the TokenCache.
//!
//! Lets separate processes (CLI invocations, a web worker) share one view
//! of which tokens are live. A row reads as absent once it passes its own
//! `expires_at` or once it is older than the cache TTL, whichever is first.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::domain::models::{CachedToken, Environment};
use crate::domain::ports::{TokenCache, TokenCacheError};

const TOKEN_CACHE_TTL_SECS: u64 = 3600;

pub struct SqliteTokenCache {
    pool: SqlitePool,
    ttl: chrono::Duration,
}

impl SqliteTokenCache {
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_ttl(pool, Duration::from_secs(TOKEN_CACHE_TTL_SECS))
    }

    /// Cache whose rows stop being served `ttl` after they were issued.
    pub fn with_ttl(pool: SqlitePool, ttl: Duration) -> Self {
        // out-of-range TTLs only ever mean "longer than any token lives"
        let ttl = chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::days(36_500));
        Self { pool, ttl }
    }

    fn is_stale(&self, token: &CachedToken, now: chrono::DateTime<Utc>) -> bool {
        let ttl_deadline = token
            .issued_at
            .checked_add_signed(self.ttl)
            .unwrap_or(token.expires_at);
        token.is_expired_at(now) || now >= ttl_deadline
    }
}

#[async_trait]
impl TokenCache for SqliteTokenCache {
    async fn get(&self, credential_id: Uuid) -> Result<Option<CachedToken>, TokenCacheError> {
        let row: Option<TokenRow> = sqlx::query_as(
            "SELECT credential_id, access_token, environment, issued_at, expires_at FROM token_cache WHERE credential_id = ?"
        )
        .bind(credential_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let token = CachedToken::try_from(row)?;
        if self.is_stale(&token, Utc::now()) {
            return Ok(None);
        }
        Ok(Some(token))
    }

    async fn put(&self, token: CachedToken) -> Result<(), TokenCacheError> {
        sqlx::query(
            r#"INSERT INTO token_cache (credential_id, access_token, environment, issued_at, expires_at)
               VALUES (?, ?, ?, ?, ?)
               ON CONFLICT(credential_id) DO UPDATE SET
                   access_token = excluded.access_token,
                   environment = excluded.environment,
                   issued_at = excluded.issued_at,
                   expires_at = excluded.expires_at"#
        )
        .bind(token.credential_id.to_string())
        .bind(&token.access_token)
        .bind(token.environment.as_str())
        .bind(token.issued_at.to_rfc3339())
        .bind(token.expires_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn evict(&self, credential_id: Uuid) -> Result<u64, TokenCacheError> {
        let result = sqlx::query("DELETE FROM token_cache WHERE credential_id = ?")
            .bind(credential_id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn evict_all(&self) -> Result<u64, TokenCacheError> {
        let result = sqlx::query("DELETE FROM token_cache")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[derive(sqlx::FromRow)]
struct TokenRow {
    credential_id: String,
    access_token: String,
    environment: String,
    issued_at: String,
    expires_at: String,
}

impl TryFrom<TokenRow> for CachedToken {
    type Error = TokenCacheError;

    fn try_from(row: TokenRow) -> Result<Self, Self::Error> {
        let corrupt = |what: &str, value: &str| {
            TokenCacheError::Unreachable(format!("corrupt token cache row: invalid {what} '{value}'"))
        };

        let credential_id = Uuid::parse_str(&row.credential_id)
            .map_err(|_| corrupt("credential_id", row.credential_id.as_str()))?;
        let environment = Environment::from_str(&row.environment)
            .ok_or_else(|| corrupt("environment", row.environment.as_str()))?;
        let issued_at = chrono::DateTime::parse_from_rfc3339(&row.issued_at)
            .map_err(|_| corrupt("issued_at", row.issued_at.as_str()))?
            .with_timezone(&Utc);
        let expires_at = chrono::DateTime::parse_from_rfc3339(&row.expires_at)
            .map_err(|_| corrupt("expires_at", row.expires_at.as_str()))?
            .with_timezone(&Utc);

        Ok(CachedToken {
            credential_id,
            access_token: row.access_token,
            environment,
            issued_at,
            expires_at,
        })
    }
}
