//! Call record state machine.
//!
//! Tracks one remote tool call from creation to settlement. Each variant of
//! [`CallState`] carries only the fields valid in that state.
//!
//! # State Transitions
//!
//! ```text
//! Created ──> AwaitingRemote ──> Resolved
//!                           ├──> Failed
//!                           ├──> TimedOut
//!                           └──> Cancelled
//! ```
//!
//! Settlement is exactly-once: every `mark_*` method returns `false` and
//! leaves the record untouched unless the call is currently awaiting.

use super::call_id::CallId;
use crate::tool::value_objects::ToolResult;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a remote call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CallState {
    /// Invocation constructed, `execute` not yet run.
    Created,
    /// Waiting for the remote actor (or reading the pending store).
    AwaitingRemote { started_at: u64 },
    /// The remote actor delivered a result.
    Resolved { started_at: u64, settled_at: u64 },
    /// The remote actor reported an error, or nothing was available to read.
    Failed {
        started_at: u64,
        settled_at: u64,
        message: String,
    },
    /// The deadline elapsed with no delivery.
    TimedOut { started_at: u64, settled_at: u64 },
    /// The caller cancelled while waiting.
    Cancelled { started_at: u64, settled_at: u64 },
}

impl CallState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::AwaitingRemote { .. } => "awaiting_remote",
            Self::Resolved { .. } => "resolved",
            Self::Failed { .. } => "failed",
            Self::TimedOut { .. } => "timed_out",
            Self::Cancelled { .. } => "cancelled",
        }
    }

    /// Whether this call has settled.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Created | Self::AwaitingRemote { .. })
    }

    /// Time spent awaiting, in milliseconds (terminal states only).
    pub fn duration_ms(&self) -> Option<u64> {
        match self {
            Self::Resolved {
                started_at,
                settled_at,
            }
            | Self::Failed {
                started_at,
                settled_at,
                ..
            }
            | Self::TimedOut {
                started_at,
                settled_at,
            }
            | Self::Cancelled {
                started_at,
                settled_at,
            } => Some(settled_at.saturating_sub(*started_at)),
            _ => None,
        }
    }
}

/// One record per invocation, owned by the invocation until it settles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRecord {
    pub call_id: CallId,
    pub tool_name: String,
    pub params: serde_json::Value,
    /// Deadline in milliseconds, if this call waits for a remote actor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline_ms: Option<u64>,
    state: CallState,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<ToolResult>,
}

impl CallRecord {
    pub fn new(call_id: CallId, tool_name: impl Into<String>, params: serde_json::Value) -> Self {
        Self {
            call_id,
            tool_name: tool_name.into(),
            params,
            deadline_ms: None,
            state: CallState::Created,
            result: None,
        }
    }

    pub fn with_deadline_ms(mut self, deadline_ms: u64) -> Self {
        self.deadline_ms = Some(deadline_ms);
        self
    }

    pub fn state(&self) -> &CallState {
        &self.state
    }

    /// The resolved result, present only in `Resolved`.
    pub fn result(&self) -> Option<&ToolResult> {
        self.result.as_ref()
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Transition from Created to AwaitingRemote.
    pub fn mark_awaiting(&mut self) -> bool {
        if !matches!(self.state, CallState::Created) {
            return false;
        }
        self.state = CallState::AwaitingRemote {
            started_at: current_timestamp(),
        };
        true
    }

    /// Transition from AwaitingRemote to Resolved, keeping the result.
    pub fn mark_resolved(&mut self, result: ToolResult) -> bool {
        let Some(started_at) = self.awaiting_since() else {
            return false;
        };
        self.state = CallState::Resolved {
            started_at,
            settled_at: current_timestamp(),
        };
        self.result = Some(result);
        true
    }

    /// Transition from AwaitingRemote to Failed.
    pub fn mark_failed(&mut self, message: impl Into<String>) -> bool {
        let Some(started_at) = self.awaiting_since() else {
            return false;
        };
        self.state = CallState::Failed {
            started_at,
            settled_at: current_timestamp(),
            message: message.into(),
        };
        true
    }

    /// Transition from AwaitingRemote to TimedOut.
    pub fn mark_timed_out(&mut self) -> bool {
        let Some(started_at) = self.awaiting_since() else {
            return false;
        };
        self.state = CallState::TimedOut {
            started_at,
            settled_at: current_timestamp(),
        };
        true
    }

    /// Transition from AwaitingRemote to Cancelled.
    pub fn mark_cancelled(&mut self) -> bool {
        let Some(started_at) = self.awaiting_since() else {
            return false;
        };
        self.state = CallState::Cancelled {
            started_at,
            settled_at: current_timestamp(),
        };
        true
    }

    fn awaiting_since(&self) -> Option<u64> {
        match self.state {
            CallState::AwaitingRemote { started_at } => Some(started_at),
            _ => None,
        }
    }
}

/// Current wall-clock time in milliseconds.
fn current_timestamp() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
