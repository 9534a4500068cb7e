//! Cached OAuth token model.
//!
//! Tokens are derived artifacts: they are minted elsewhere from the active
//! credential set and only ever evicted by the cache coordinator.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::credential::Environment;

/// An access token bound to the credential set it was minted for.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedToken {
    /// Credential set that was active when the token was minted
    pub credential_id: Uuid,
    /// Bearer token value
    pub access_token: String,
    /// Endpoint the token is valid against
    pub environment: Environment,
    /// When the token was issued
    pub issued_at: DateTime<Utc>,
    /// When the token stops being accepted upstream
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    pub fn new(
        credential_id: Uuid,
        access_token: impl Into<String>,
        environment: Environment,
        lifetime: Duration,
    ) -> Self {
        let issued_at = Utc::now();
        Self {
            credential_id,
            access_token: access_token.into(),
            environment,
            issued_at,
            expires_at: issued_at + lifetime,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

impl std::fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedToken")
            .field("credential_id", &self.credential_id)
            .field("access_token", &"[REDACTED]")
            .field("environment", &self.environment)
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// What a server-side invalidation actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EvictionReport {
    /// The cache held nothing for the requested scope
    NothingToClear,
    /// This many entries were removed
    Evicted { entries: u64 },
}

impl EvictionReport {
    pub fn from_count(entries: u64) -> Self {
        if entries == 0 {
            Self::NothingToClear
        } else {
            Self::Evicted { entries }
        }
    }

    pub fn entries(&self) -> u64 {
        match self {
            Self::NothingToClear => 0,
            Self::Evicted { entries } => *entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_boundary() {
        let token = CachedToken::new(Uuid::new_v4(), "tok", Environment::Sandbox, Duration::seconds(60));
        assert!(!token.is_expired_at(token.issued_at));
        assert!(token.is_expired_at(token.expires_at));
    }

    #[test]
    fn test_debug_hides_access_token() {
        let token = CachedToken::new(Uuid::new_v4(), "very-secret-token", Environment::Live, Duration::hours(1));
        assert!(!format!("{token:?}").contains("very-secret-token"));
    }

    #[test]
    fn test_eviction_report_from_count() {
        assert_eq!(EvictionReport::from_count(0), EvictionReport::NothingToClear);
        assert_eq!(EvictionReport::from_count(2), EvictionReport::Evicted { entries: 2 });
        assert_eq!(EvictionReport::from_count(2).entries(), 2);
    }
}
