//! Auth Status Reporter
//!
//! Read-only projection of the registry's active credential set for
//! display. Every call recomputes from the registry; the environment hint
//! it leaves behind is only a convenience for callers that cannot await.

use std::sync::Arc;

use super::cache_coordinator::EnvironmentHint;
use super::credential_registry::CredentialRegistry;
use crate::domain::errors::CredentialResult;
use crate::domain::models::{mask_client_id, mask_client_secret, ActiveCredential, AuthStatus, Environment};

pub struct AuthStatusReporter {
    registry: Arc<CredentialRegistry>,
    hint: EnvironmentHint,
}

impl AuthStatusReporter {
    pub fn new(registry: Arc<CredentialRegistry>) -> Self {
        let hint = registry.coordinator().environment_hint();
        Self { registry, hint }
    }

    /// Current auth status. Never reports a stale environment: when nothing
    /// is configured the environment is unknown.
    pub async fn status(&self) -> CredentialResult<AuthStatus> {
        let status = match self.registry.get_active().await? {
            ActiveCredential::Configured(credential) => AuthStatus {
                environment: Some(credential.environment),
                configured: true,
                client_id_masked: mask_client_id(&credential.client_id),
                client_secret_masked: mask_client_secret(credential.client_secret.expose()),
            },
            ActiveCredential::NotConfigured => AuthStatus::not_configured(),
        };

        self.hint.set(status.environment);
        Ok(status)
    }

    /// Environment from the most recent [`status`](Self::status) call, unless
    /// a switch or clear has happened since.
    pub fn last_known_environment(&self) -> Option<Environment> {
        self.hint.get()
    }
}
