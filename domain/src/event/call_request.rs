//! Call-request wire contract.
//!
//! The request travels inside a data part as `{"request": {...}}`. Keys:
//!
//! | Key | Status |
//! |-----|--------|
//! | `callId` | canonical |
//! | `toolName` | canonical |
//! | `args` | canonical |
//! | `tool_name`, `name` | deprecated, accepted on parse |
//! | `arguments` | deprecated, accepted on parse |
//!
//! `tool_name` is only emitted when legacy keys are switched on, for remote
//! parsers that have not moved to `toolName` yet.

use super::status_update::{EventMessage, Part, StatusUpdateEvent, TaskState};
use crate::call::{call_id::CallId, session::SessionIds};
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// `metadata.coderAgent.kind` of a call-request event
pub const CALL_REQUEST_KIND: &str = "remote-tool-call";

/// Deprecated aliases, in the order they are dropped when the canonical key is present
const LEGACY_TOOL_NAME_KEYS: [&str; 2] = ["tool_name", "name"];
const LEGACY_ARGS_KEY: &str = "arguments";

/// A request for the remote actor to run a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRequest {
    pub call_id: CallId,
    #[serde(alias = "tool_name", alias = "name")]
    pub tool_name: String,
    #[serde(alias = "arguments", default)]
    pub args: serde_json::Value,
}

impl CallRequest {
    pub fn new(call_id: CallId, tool_name: impl Into<String>, args: serde_json::Value) -> Self {
        Self {
            call_id,
            tool_name: tool_name.into(),
            args,
        }
    }

    /// The `{"request": {...}}` payload placed in the data part
    pub fn to_data(&self, emit_legacy_keys: bool) -> serde_json::Value {
        let mut request = serde_json::json!({
            "callId": self.call_id,
            "toolName": self.tool_name,
            "args": self.args,
        });
        if emit_legacy_keys {
            request["tool_name"] = serde_json::Value::String(self.tool_name.clone());
        }
        serde_json::json!({ "request": request })
    }

    /// Build the status-update event announcing this request
    pub fn to_event(&self, ids: &SessionIds, emit_legacy_keys: bool) -> StatusUpdateEvent {
        let message = EventMessage::agent(vec![
            Part::text(format!("Requesting remote tool {}", self.tool_name)),
            Part::data(self.to_data(emit_legacy_keys)),
        ]);
        StatusUpdateEvent::new(ids, TaskState::InputRequired, Some(message))
            .with_metadata("coderAgent", serde_json::json!({ "kind": CALL_REQUEST_KIND }))
    }

    /// Parse a `{"request": {...}}` data payload
    pub fn from_data(data: &serde_json::Value) -> Result<Self, DomainError> {
        let request = data
            .get("request")
            .and_then(|r| r.as_object())
            .ok_or_else(|| DomainError::MalformedEvent("data part has no request object".into()))?;

        // Aliases collide with the canonical key in serde, so keep exactly one of each
        let mut request = request.clone();
        if request.contains_key("toolName") {
            for key in LEGACY_TOOL_NAME_KEYS {
                request.remove(key);
            }
        } else if request.contains_key("tool_name") {
            request.remove("name");
        }
        if request.contains_key("args") {
            request.remove(LEGACY_ARGS_KEY);
        }

        serde_json::from_value(serde_json::Value::Object(request))
            .map_err(|e| DomainError::MalformedEvent(format!("invalid call request: {}", e)))
    }

    /// Find the call request carried by an event
    pub fn from_event(event: &StatusUpdateEvent) -> Result<Self, DomainError> {
        event
            .data_parts()
            .find(|data| data.get("request").is_some())
            .ok_or_else(|| DomainError::MalformedEvent("event carries no call request".into()))
            .and_then(Self::from_data)
    }
}
