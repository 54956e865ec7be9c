//! Line-delimited JSON protocol between the bridge and its host.
//!
//! The host is whatever drives the bridge over stdin/stdout: it stands in
//! for the reasoning engine (issuing tool calls) and relays traffic to and
//! from the remote actor (context, tool declarations, deliveries).
//!
//! Inbound, one [`HostCommand`] per line:
//!
//! ```text
//! {"type":"context","taskId":"t1","contextId":"c1"}
//! {"type":"tools","metadata":{"custom_tools":{...}}}
//! {"type":"call","id":"1","tool":"read_remote","params":{...}}
//! {"type":"delivery","data":{"callId":"abc","result":{...}}}
//! {"type":"cancel","id":"1"}
//! {"type":"answer","dialogId":"d1","outcome":"proceed_once","answers":{"0":"yes"}}
//! ```
//!
//! Outbound, one [`HostOutput`] per line: published status-update events,
//! ask-user dialogs awaiting an `answer`, tool results keyed by the host's
//! call id, and protocol errors.

use bridge_domain::{AnswerSet, ConfirmationOutcome, Question, StatusUpdateEvent, ToolResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostCommand {
    /// Bind the session identifiers used on every published event
    #[serde(rename_all = "camelCase")]
    Context { task_id: String, context_id: String },
    /// Register remote tools from `custom_tools` metadata
    Tools { metadata: serde_json::Value },
    /// Run one tool call; `id` is the host's handle for the result
    #[serde(rename_all = "camelCase")]
    Call {
        id: String,
        tool: String,
        #[serde(default)]
        params: serde_json::Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        call_id: Option<String>,
    },
    /// A result or error data part coming back from the remote actor
    Delivery { data: serde_json::Value },
    /// Cancel an in-flight call by host id
    Cancel { id: String },
    /// A person's answers to an ask-user dialog
    #[serde(rename_all = "camelCase")]
    Answer {
        dialog_id: String,
        outcome: ConfirmationOutcome,
        #[serde(default)]
        answers: AnswerSet,
    },
}

impl HostCommand {
    pub fn parse(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostOutput {
    Event { event: StatusUpdateEvent },
    #[serde(rename_all = "camelCase")]
    Question {
        dialog_id: String,
        title: String,
        questions: Vec<Question>,
    },
    ToolResult { id: String, result: ToolResult },
    Error { message: String },
}

impl HostOutput {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}
