//! Test doubles shared by the unit tests of this crate

use crate::ports::call_journal::{CallJournal, JournalEvent};
use crate::ports::event_publisher::{EventPublisher, PublishError};
use async_trait::async_trait;
use bridge_domain::StatusUpdateEvent;
use std::sync::{Arc, Mutex};

/// Keeps every published event
#[derive(Default)]
pub(crate) struct RecordingPublisher {
    events: Mutex<Vec<StatusUpdateEvent>>,
}

impl RecordingPublisher {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn events(&self) -> Vec<StatusUpdateEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, event: StatusUpdateEvent) -> Result<(), PublishError> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

/// Rejects every event as if the channel were gone
pub(crate) struct ClosedPublisher;

#[async_trait]
impl EventPublisher for ClosedPublisher {
    async fn publish(&self, _event: StatusUpdateEvent) -> Result<(), PublishError> {
        Err(PublishError::ChannelClosed)
    }
}

/// Keeps every journal entry
#[derive(Default)]
pub(crate) struct RecordingJournal {
    entries: Mutex<Vec<(&'static str, serde_json::Value)>>,
}

impl RecordingJournal {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn types(&self) -> Vec<&'static str> {
        self.entries.lock().unwrap().iter().map(|(t, _)| *t).collect()
    }

    pub(crate) fn last(&self, event_type: &str) -> Option<serde_json::Value> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(t, _)| *t == event_type)
            .map(|(_, p)| p.clone())
    }
}

impl CallJournal for RecordingJournal {
    fn record(&self, event: JournalEvent) {
        self.entries.lock().unwrap().push((event.event_type, event.payload));
    }
}
