//! Client signal sink port.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::models::ClientInvalidation;

/// Failure relaying a signal to the client tier.
#[derive(Debug, Error)]
pub enum SignalError {
    #[error("no client is listening for invalidation signals")]
    NoListeners,

    #[error("signal delivery failed: {0}")]
    Delivery(String),
}

/// Relays client invalidation instructions to whatever transport reaches the client.
///
/// Delivery is best-effort; callers log failures and move on.
#[async_trait]
pub trait ClientSignalSink: Send + Sync {
    async fn publish(&self, signal: &ClientInvalidation) -> Result<(), SignalError>;
}
