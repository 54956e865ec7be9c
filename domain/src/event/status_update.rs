//! Status-update events published to the session channel

use crate::call::session::SessionIds;
use serde::{Deserialize, Serialize};

/// Event kind written into every status update
pub const STATUS_UPDATE_KIND: &str = "status-update";

/// State of the task a status update refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    Working,
    InputRequired,
    Completed,
    Failed,
}

/// One typed part of a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Part {
    Text { text: String },
    Data { data: serde_json::Value },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    pub fn data(data: serde_json::Value) -> Self {
        Part::Data { data }
    }

    pub fn as_data(&self) -> Option<&serde_json::Value> {
        match self {
            Part::Data { data } => Some(data),
            Part::Text { .. } => None,
        }
    }
}

/// Message carried by a status update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMessage {
    pub role: String,
    pub message_id: String,
    pub parts: Vec<Part>,
}

impl EventMessage {
    /// Agent-authored message with a fresh message id
    pub fn agent(parts: Vec<Part>) -> Self {
        Self {
            role: "agent".to_string(),
            message_id: uuid::Uuid::new_v4().to_string(),
            parts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatus {
    pub state: TaskState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<EventMessage>,
}

/// A status-update event as seen by the remote actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateEvent {
    pub kind: String,
    pub task_id: String,
    pub context_id: String,
    pub status: TaskStatus,
    #[serde(rename = "final")]
    pub is_final: bool,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl StatusUpdateEvent {
    pub fn new(ids: &SessionIds, state: TaskState, message: Option<EventMessage>) -> Self {
        Self {
            kind: STATUS_UPDATE_KIND.to_string(),
            task_id: ids.task_id.clone(),
            context_id: ids.context_id.clone(),
            status: TaskStatus { state, message },
            is_final: false,
            metadata: serde_json::Map::new(),
        }
    }

    pub fn with_final(mut self, is_final: bool) -> Self {
        self.is_final = is_final;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// `metadata.coderAgent.kind`, which remote actors use to dispatch events
    pub fn agent_kind(&self) -> Option<&str> {
        self.metadata
            .get("coderAgent")
            .and_then(|c| c.get("kind"))
            .and_then(|k| k.as_str())
    }

    /// Data payloads of every data part in the message
    pub fn data_parts(&self) -> impl Iterator<Item = &serde_json::Value> {
        self.status
            .message
            .iter()
            .flat_map(|m| m.parts.iter())
            .filter_map(Part::as_data)
    }
}
