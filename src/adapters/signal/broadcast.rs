//! Broadcast-based signal sink.
//!
//! Transport layers (websocket handlers, SSE streams) subscribe and forward
//! each [`ClientInvalidation`] to their connected clients.

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::domain::models::ClientInvalidation;
use crate::domain::ports::{ClientSignalSink, SignalError};

const DEFAULT_CHANNEL_CAPACITY: usize = 64;

#[derive(Clone)]
pub struct BroadcastSignalSink {
    sender: broadcast::Sender<ClientInvalidation>,
}

impl BroadcastSignalSink {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ClientInvalidation> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastSignalSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClientSignalSink for BroadcastSignalSink {
    async fn publish(&self, signal: &ClientInvalidation) -> Result<(), SignalError> {
        self.sender
            .send(signal.clone())
            .map(|_| ())
            .map_err(|_| SignalError::NoListeners)
    }
}
