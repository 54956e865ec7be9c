//! In-process event publisher backed by a tokio channel.

use async_trait::async_trait;
use bridge_application::{EventPublisher, PublishError};
use bridge_domain::StatusUpdateEvent;
use tokio::sync::mpsc;

/// Publishes events into an unbounded channel.
///
/// Useful when the consumer of status updates lives in the same process
/// (tests, or a host that forwards events on its own schedule).
#[derive(Clone)]
pub struct ChannelEventPublisher {
    tx: mpsc::UnboundedSender<StatusUpdateEvent>,
}

impl ChannelEventPublisher {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<StatusUpdateEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl EventPublisher for ChannelEventPublisher {
    async fn publish(&self, event: StatusUpdateEvent) -> Result<(), PublishError> {
        self.tx.send(event).map_err(|_| PublishError::ChannelClosed)
    }
}
