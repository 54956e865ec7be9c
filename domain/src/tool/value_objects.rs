//! Tool domain value objects: immutable result and error types
//!
//! Every settled call produces a [`ToolResult`]. Remote-originated failures
//! never become process faults: they are folded into a failure result whose
//! [`ToolError`] code tells the reasoning engine whether retrying makes sense.

use serde::{Deserialize, Serialize};

/// Classification of a tool failure.
///
/// | Code | Retryable? | Meaning |
/// |------|-----------|---------|
/// | `INVALID_PARAMS` | Yes | Parameters failed validation |
/// | `CONFIGURATION` | No | Tool used before its session context was set |
/// | `REMOTE_TIMEOUT` | Yes | Remote actor did not answer before the deadline |
/// | `REMOTE_DELIVERY` | Yes | Remote actor explicitly reported failure |
/// | `MISSING_RESULT` | Yes | No pending result at execute time (immediate mode) |
/// | `CANCELLED` | No | The caller cancelled the call |
/// | `PUBLISH_FAILED` | Yes | The call request could not be published |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidParams,
    Configuration,
    RemoteTimeout,
    RemoteDelivery,
    MissingResult,
    Cancelled,
    PublishFailed,
}

impl ErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            ErrorCode::InvalidParams => "INVALID_PARAMS",
            ErrorCode::Configuration => "CONFIGURATION",
            ErrorCode::RemoteTimeout => "REMOTE_TIMEOUT",
            ErrorCode::RemoteDelivery => "REMOTE_DELIVERY",
            ErrorCode::MissingResult => "MISSING_RESULT",
            ErrorCode::Cancelled => "CANCELLED",
            ErrorCode::PublishFailed => "PUBLISH_FAILED",
        }
    }

    pub fn is_retryable(&self) -> bool {
        !matches!(self, ErrorCode::Configuration | ErrorCode::Cancelled)
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Failure attached to a [`ToolResult`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolError {
    pub code: ErrorCode,
    pub message: String,
}

impl ToolError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidParams, message)
    }

    pub fn remote_delivery(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::RemoteDelivery, message)
    }

    pub fn missing_result(tool_name: &str) -> Self {
        Self::new(
            ErrorCode::MissingResult,
            format!("No result available for tool '{}'", tool_name),
        )
    }

    pub fn is_retryable(&self) -> bool {
        self.code.is_retryable()
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ToolError {}

/// Outcome of a tool call as seen by the reasoning engine.
///
/// `llm_content` is what the engine reads; `return_display` is what a
/// person sees. Remote actors may omit `returnDisplay`, in which case
/// [`display`](Self::display) falls back to the engine content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub llm_content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_display: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
}

impl ToolResult {
    /// Successful result without a separate display string
    pub fn success(llm_content: impl Into<String>) -> Self {
        Self {
            llm_content: llm_content.into(),
            return_display: None,
            error: None,
        }
    }

    /// Successful result with both engine content and display string
    pub fn with_display(llm_content: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            llm_content: llm_content.into(),
            return_display: Some(display.into()),
            error: None,
        }
    }

    /// Failed result; the message is mirrored into the engine content
    pub fn failure(error: ToolError) -> Self {
        Self {
            llm_content: error.message.clone(),
            return_display: Some(error.to_string()),
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn error(&self) -> Option<&ToolError> {
        self.error.as_ref()
    }

    pub fn display(&self) -> &str {
        self.return_display.as_deref().unwrap_or(&self.llm_content)
    }
}
