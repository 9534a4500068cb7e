//! Client signal sink adapters.

pub mod broadcast;
pub mod recording;

pub use broadcast::BroadcastSignalSink;
pub use recording::RecordingSignalSink;
