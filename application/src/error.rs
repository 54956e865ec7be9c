//! Application error types

use crate::ports::event_publisher::PublishError;
use bridge_domain::{CallId, DomainError, ErrorCode, ToolError, ToolResult};
use thiserror::Error;

/// Errors surfaced by remote invocations, the ask-user tool and the registry.
///
/// None of these are process faults: the tool-call use case folds every
/// variant into a failure [`ToolResult`] for the reasoning engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    #[error("Tool '{0}' has no call context; set_context must be called first")]
    ContextNotSet(String),

    #[error("Invalid parameters for tool '{tool}': {message}")]
    InvalidParams { tool: String, message: String },

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Remote call {call_id} timed out after {timeout_ms}ms")]
    RemoteTimeout { call_id: CallId, timeout_ms: u64 },

    #[error("Remote call {call_id} failed: {message}")]
    RemoteDelivery { call_id: CallId, message: String },

    #[error("Remote call {0} was cancelled")]
    Cancelled(CallId),

    #[error("Call {0} was already executed")]
    AlreadyExecuted(CallId),

    #[error("Call id {0} is already outstanding")]
    DuplicateCallId(CallId),

    #[error("Failed to publish call request: {0}")]
    Publish(#[from] PublishError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl BridgeError {
    pub fn code(&self) -> ErrorCode {
        match self {
            BridgeError::ContextNotSet(_) | BridgeError::AlreadyExecuted(_) => ErrorCode::Configuration,
            BridgeError::InvalidParams { .. }
            | BridgeError::UnknownTool(_)
            | BridgeError::DuplicateCallId(_)
            | BridgeError::Domain(_) => ErrorCode::InvalidParams,
            BridgeError::RemoteTimeout { .. } => ErrorCode::RemoteTimeout,
            BridgeError::RemoteDelivery { .. } => ErrorCode::RemoteDelivery,
            BridgeError::Cancelled(_) => ErrorCode::Cancelled,
            BridgeError::Publish(_) => ErrorCode::PublishFailed,
        }
    }

    /// The failure result handed to the reasoning engine.
    ///
    /// Remote errors are passed through verbatim.
    pub fn to_tool_result(&self) -> ToolResult {
        let message = match self {
            BridgeError::RemoteDelivery { message, .. } => message.clone(),
            other => other.to_string(),
        };
        ToolResult::failure(ToolError::new(self.code(), message))
    }
}
