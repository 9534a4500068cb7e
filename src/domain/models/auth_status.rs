//! Display-oriented summary of the active credential set.

use serde::{Serialize, Serializer};

use super::credential::Environment;

const MASK: &str = "****";
const FULL_MASK: &str = "********";
const VISIBLE_ID_CHARS: usize = 4;
const VISIBLE_SECRET_CHARS: usize = 4;
const MIN_SECRET_LEN_FOR_HINT: usize = 8;

/// Read-only auth status shown to operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthStatus {
    /// Active environment, `"unknown"` when nothing is configured
    #[serde(serialize_with = "serialize_environment")]
    pub environment: Option<Environment>,
    pub configured: bool,
    pub client_id_masked: String,
    pub client_secret_masked: String,
}

impl AuthStatus {
    pub fn not_configured() -> Self {
        Self {
            environment: None,
            configured: false,
            client_id_masked: String::new(),
            client_secret_masked: String::new(),
        }
    }

    pub fn environment_label(&self) -> &'static str {
        self.environment.map_or("unknown", |env| env.as_str())
    }
}

fn serialize_environment<S: Serializer>(
    environment: &Option<Environment>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(environment.map_or("unknown", |env| env.as_str()))
}

/// Mask a client id, keeping its first few characters.
pub fn mask_client_id(client_id: &str) -> String {
    let visible: String = client_id.chars().take(VISIBLE_ID_CHARS).collect();
    if client_id.chars().count() <= VISIBLE_ID_CHARS {
        return MASK.to_string();
    }
    format!("{visible}{MASK}")
}

/// Mask a client secret. Only long secrets reveal their last characters.
pub fn mask_client_secret(secret: &str) -> String {
    let len = secret.chars().count();
    if len <= MIN_SECRET_LEN_FOR_HINT {
        return FULL_MASK.to_string();
    }
    let tail: String = secret.chars().skip(len - VISIBLE_SECRET_CHARS).collect();
    format!("{MASK}{tail}")
}
