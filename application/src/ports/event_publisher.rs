//! Event publisher port.
//!
//! The session channel through which call requests reach the remote actor.
//! The bridge treats it as opaque: it only hands over finished
//! [`StatusUpdateEvent`]s.
//!
//! # Adapters
//!
//! - `ChannelEventPublisher` (infrastructure): forwards onto a tokio mpsc channel
//! - `JsonLinesPublisher` (infrastructure): writes one JSON object per line

use async_trait::async_trait;
use bridge_domain::StatusUpdateEvent;
use thiserror::Error;

/// Failure to hand an event to the transport.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PublishError {
    #[error("Event channel closed")]
    ChannelClosed,

    #[error("Failed to encode event: {0}")]
    Encode(String),

    #[error("Failed to write event: {0}")]
    Io(String),
}

/// Port for publishing events onto the session channel.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: StatusUpdateEvent) -> Result<(), PublishError>;
}
