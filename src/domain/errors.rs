//! Domain errors for the credential registry.

use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by registry and coordinator operations.
///
/// Every variant maps to a stable [`ErrorKind`] so boundary layers can pick
/// a message per kind without matching on display strings.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Credential set not found: {0}")]
    NotFound(Uuid),

    #[error("Credential set {0} is active and cannot be deleted; switch to another set first")]
    ActiveCredential(Uuid),

    #[error("Token cache unavailable: {0}")]
    CacheUnavailable(String),

    #[error("Secret store error: {0}")]
    Storage(String),
}

/// Stable, machine-readable error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ValidationError,
    NotFound,
    ActiveCredential,
    CacheUnavailable,
    StorageError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "validation_error",
            Self::NotFound => "not_found",
            Self::ActiveCredential => "active_credential",
            Self::CacheUnavailable => "cache_unavailable",
            Self::StorageError => "storage_error",
        }
    }
}

impl CredentialError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::ValidationError,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::ActiveCredential(_) => ErrorKind::ActiveCredential,
            Self::CacheUnavailable(_) => ErrorKind::CacheUnavailable,
            Self::Storage(_) => ErrorKind::StorageError,
        }
    }

    /// Whether retrying the same call may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::CacheUnavailable(_))
    }
}

pub type CredentialResult<T> = Result<T, CredentialError>;

impl From<sqlx::Error> for CredentialError {
    fn from(err: sqlx::Error) -> Self {
        CredentialError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for CredentialError {
    fn from(err: serde_json::Error) -> Self {
        CredentialError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_are_distinct() {
        let id = Uuid::new_v4();
        let errors = [
            CredentialError::Validation("x".into()),
            CredentialError::NotFound(id),
            CredentialError::ActiveCredential(id),
            CredentialError::CacheUnavailable("down".into()),
            CredentialError::Storage("io".into()),
        ];
        let kinds: std::collections::HashSet<_> = errors.iter().map(CredentialError::kind).collect();
        assert_eq!(kinds.len(), errors.len());
    }

    #[test]
    fn test_only_cache_unavailable_is_transient() {
        assert!(CredentialError::CacheUnavailable("timeout".into()).is_transient());
        assert!(!CredentialError::NotFound(Uuid::new_v4()).is_transient());
    }
}
