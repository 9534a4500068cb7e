//! Credential set domain model.
//!
//! A credential set is a named (client id, client secret, environment) tuple
//! used to mint OAuth tokens against an external API. Records are immutable
//! after creation; the only thing that changes is which one is active, and
//! that is owned by the registry rather than the record itself.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

use crate::domain::errors::{CredentialError, CredentialResult};

/// Target endpoint a credential set authenticates against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    /// Test endpoint
    Sandbox,
    /// Production endpoint
    Live,
}

impl Environment {
    /// Every environment the system knows about.
    pub const ALL: [Self; 2] = [Self::Sandbox, Self::Live];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sandbox => "sandbox",
            Self::Live => "live",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "sandbox" => Some(Self::Sandbox),
            "live" => Some(Self::Live),
            _ => None,
        }
    }

    /// Parse an environment name, reporting unknown values as validation errors.
    pub fn parse(s: &str) -> CredentialResult<Self> {
        Self::from_str(s).ok_or_else(|| {
            CredentialError::Validation(format!(
                "unknown environment '{}': expected one of sandbox, live",
                s.trim()
            ))
        })
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sensitive client secret.
///
/// The plaintext is only reachable through [`ClientSecret::expose`]. `Debug`,
/// `Display` and `Serialize` all emit `[REDACTED]`, so a boundary layer that
/// forwards a [`CredentialSet`] without thinking cannot leak the secret.
/// There is no `Deserialize`: a redacted value must never be read back as a
/// secret. Stores rebuild it from their own columns with [`ClientSecret::new`].
#[derive(Clone, PartialEq, Eq)]
pub struct ClientSecret(String);

impl ClientSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Plaintext secret for explicit use sites (token minting, persistence).
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Serialize for ClientSecret {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("[REDACTED]")
    }
}

/// A stored set of API credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredentialSet {
    /// Unique identifier, assigned at creation
    pub id: Uuid,
    /// Display label (not unique)
    pub name: String,
    /// OAuth client identifier
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: ClientSecret,
    /// Target endpoint
    pub environment: Environment,
    /// When the record was saved
    pub created_at: DateTime<Utc>,
}

impl CredentialSet {
    /// Build a new credential set, validating every required field.
    pub fn new(
        name: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        environment: Environment,
    ) -> CredentialResult<Self> {
        let name = name.into();
        let client_id = client_id.into();
        let client_secret = ClientSecret::new(client_secret);

        if name.trim().is_empty() {
            return Err(CredentialError::Validation("name cannot be empty".to_string()));
        }
        if client_id.trim().is_empty() {
            return Err(CredentialError::Validation("client_id cannot be empty".to_string()));
        }
        if client_secret.is_blank() {
            return Err(CredentialError::Validation(
                "client_secret cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            client_id: client_id.trim().to_string(),
            client_secret,
            environment,
            created_at: Utc::now(),
        })
    }
}

/// A credential set as returned by `list`, annotated with its active flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListedCredential {
    #[serde(flatten)]
    pub credential: CredentialSet,
    pub is_active: bool,
}

/// Result of looking up the active credential set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveCredential {
    Configured(CredentialSet),
    NotConfigured,
}

impl ActiveCredential {
    pub fn is_configured(&self) -> bool {
        matches!(self, Self::Configured(_))
    }

    pub fn credential(&self) -> Option<&CredentialSet> {
        match self {
            Self::Configured(credential) => Some(credential),
            Self::NotConfigured => None,
        }
    }
}
