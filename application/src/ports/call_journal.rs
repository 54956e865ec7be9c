//! Port for the structured call journal.
//!
//! Defines the [`CallJournal`] trait for recording the lifecycle of remote
//! calls and ask-user dialogs (requested, settled, dropped deliveries).
//!
//! This is separate from `tracing`-based operation logs: tracing carries
//! human-readable diagnostics, while the journal keeps a machine-readable
//! transcript (JSONL) of every call.

use serde_json::Value;

/// A structured journal entry.
pub struct JournalEvent {
    /// Event type identifier (e.g., "call_requested", "call_settled").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl JournalEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for journaling call events.
///
/// `record` is synchronous and infallible; journal failures must never
/// disturb a tool call.
pub trait CallJournal: Send + Sync {
    fn record(&self, event: JournalEvent);
}

/// No-op implementation for tests and when journaling is disabled.
pub struct NoCallJournal;

impl CallJournal for NoCallJournal {
    fn record(&self, _event: JournalEvent) {}
}
