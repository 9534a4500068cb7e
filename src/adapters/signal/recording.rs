//! Signal sink that keeps published signals in memory.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::domain::models::ClientInvalidation;
use crate::domain::ports::{ClientSignalSink, SignalError};

/// Records published signals, optionally keeping only the newest `limit`.
#[derive(Default)]
pub struct RecordingSignalSink {
    signals: Mutex<VecDeque<ClientInvalidation>>,
    limit: Option<usize>,
}

impl RecordingSignalSink {
    /// Unbounded sink, for tests.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink that drops the oldest signal once `limit` are held.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            signals: Mutex::default(),
            limit: Some(limit),
        }
    }

    /// Signals still held, oldest first.
    pub fn signals(&self) -> Vec<ClientInvalidation> {
        self.signals
            .lock()
            .map(|signals| signals.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.signals.lock().map(|signals| signals.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ClientSignalSink for RecordingSignalSink {
    async fn publish(&self, signal: &ClientInvalidation) -> Result<(), SignalError> {
        let mut signals = self
            .signals
            .lock()
            .map_err(|e| SignalError::Delivery(e.to_string()))?;
        if let Some(limit) = self.limit {
            if limit == 0 {
                return Ok(());
            }
            while signals.len() >= limit {
                signals.pop_front();
            }
        }
        signals.push_back(signal.clone());
        Ok(())
    }
}
