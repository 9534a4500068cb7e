//! Client invalidation signal.
//!
//! The core cannot reach into a browser or other client tier. Instead it
//! hands back a value describing what the client should forget; the
//! transport layer decides how to deliver it (response flag, push message,
//! forced reload). Delivery is advisory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Why the client is being told to drop its local state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InvalidationReason {
    /// The active credential set changed (or was re-selected)
    CredentialSwitched {
        previous: Option<Uuid>,
        current: Uuid,
    },
    /// An operator asked for every cache to be cleared
    CacheCleared,
}

/// Client-side keys the instruction covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientStateKey {
    /// Cached environment label shown in the client
    Environment,
    /// Cached shop / account identifiers
    ShopIdentifiers,
}

/// Instruction for the client tier to discard locally cached state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInvalidation {
    pub id: Uuid,
    pub reason: InvalidationReason,
    /// Keys the client should drop
    pub drop_keys: Vec<ClientStateKey>,
    /// Whether the client should reload after dropping its state
    pub reload: bool,
    pub issued_at: DateTime<Utc>,
}

impl ClientInvalidation {
    pub fn new(reason: InvalidationReason) -> Self {
        Self {
            id: Uuid::new_v4(),
            reason,
            drop_keys: vec![ClientStateKey::Environment, ClientStateKey::ShopIdentifiers],
            reload: true,
            issued_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_covers_environment_and_shop() {
        let signal = ClientInvalidation::new(InvalidationReason::CacheCleared);
        assert!(signal.drop_keys.contains(&ClientStateKey::Environment));
        assert!(signal.drop_keys.contains(&ClientStateKey::ShopIdentifiers));
        assert!(signal.reload);
    }

    #[test]
    fn test_reason_serializes_with_tag() {
        let current = Uuid::new_v4();
        let value = serde_json::to_value(InvalidationReason::CredentialSwitched {
            previous: None,
            current,
        })
        .unwrap();

        assert_eq!(value["type"], "credential_switched");
        assert_eq!(value["current"], current.to_string());
        assert!(value["previous"].is_null());
    }
}
