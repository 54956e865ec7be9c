//! Execute Tool Call use case.
//!
//! The engine-facing pipeline: takes one tool call from the reasoning
//! engine and always hands back a [`ToolResult`]. Errors become failure
//! results the engine can reason about; nothing here is fatal to the host.
//!
//! - `ask_user` → confirmation details → [`ConfirmationPort`] → confirm → execute
//! - remote tools → create invocation → execute (with cancellation)

use crate::ask_user::ASK_USER_TOOL_NAME;
use crate::error::BridgeError;
use crate::ports::call_journal::JournalEvent;
use crate::ports::confirmation::{ConfirmationError, ConfirmationPort};
use crate::use_cases::tool_registry::ToolRegistry;
use bridge_domain::{AnswerSet, CallId, ConfirmationOutcome, ErrorCode, ToolError, ToolResult, truncate};
use serde_json::json;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// One tool call requested by the reasoning engine.
#[derive(Debug, Clone)]
pub struct ToolCallInput {
    pub tool_name: String,
    pub params: serde_json::Value,
    /// Call id to use instead of a generated one.
    pub call_id: Option<CallId>,
}

impl ToolCallInput {
    pub fn new(tool_name: impl Into<String>, params: serde_json::Value) -> Self {
        Self {
            tool_name: tool_name.into(),
            params,
            call_id: None,
        }
    }

    pub fn with_call_id(mut self, call_id: impl Into<CallId>) -> Self {
        self.call_id = Some(call_id.into());
        self
    }
}

pub struct ExecuteToolCallUseCase {
    registry: Arc<ToolRegistry>,
    confirmation: Arc<dyn ConfirmationPort>,
}

impl Clone for ExecuteToolCallUseCase {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            confirmation: self.confirmation.clone(),
        }
    }
}

impl ExecuteToolCallUseCase {
    pub fn new(registry: Arc<ToolRegistry>, confirmation: Arc<dyn ConfirmationPort>) -> Self {
        Self {
            registry,
            confirmation,
        }
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    pub async fn execute(&self, input: ToolCallInput, cancel: CancellationToken) -> ToolResult {
        info!(
            "Tool call: {} {}",
            input.tool_name,
            truncate(&input.params.to_string(), 120)
        );

        let outcome = if input.tool_name == ASK_USER_TOOL_NAME {
            self.ask_user(input.params.clone(), cancel).await
        } else {
            self.call_remote(&input, cancel).await
        };

        match outcome {
            Ok(result) => result,
            Err(e) => {
                warn!("Tool call {} failed: {}", input.tool_name, e);
                self.registry.journal().record(JournalEvent::new(
                    "tool_call_failed",
                    json!({
                        "tool": input.tool_name,
                        "code": e.code(),
                        "error": e.to_string(),
                    }),
                ));
                e.to_tool_result()
            }
        }
    }

    async fn call_remote(&self, input: &ToolCallInput, cancel: CancellationToken) -> Result<ToolResult, BridgeError> {
        let wrapper = self
            .registry
            .remote(&input.tool_name)
            .ok_or_else(|| BridgeError::UnknownTool(input.tool_name.clone()))?;

        let mut invocation = match &input.call_id {
            Some(call_id) => wrapper.create_invocation_with_id(call_id.clone(), input.params.clone())?,
            None => wrapper.create_invocation(input.params.clone())?,
        };
        debug!("{}", invocation.description());

        invocation.execute(cancel).await
    }

    async fn ask_user(&self, params: serde_json::Value, cancel: CancellationToken) -> Result<ToolResult, BridgeError> {
        let invocation = self.registry.ask_user().create_invocation(params)?;
        let details = invocation.should_confirm_execute();

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Ok(ToolResult::failure(ToolError::new(
                    ErrorCode::Cancelled,
                    "ask_user was cancelled before the user answered",
                )));
            }
            response = self.confirmation.request_answers(&details.title, &details.questions) => response,
        };

        let (outcome, answers) = match response {
            Ok(response) => (response.outcome, response.answers),
            Err(ConfirmationError::Interrupted) => {
                debug!("ask_user dialog interrupted; treating as dismissed");
                (ConfirmationOutcome::Cancel, AnswerSet::new())
            }
            Err(e) => {
                return Ok(ToolResult::failure(ToolError::new(
                    ErrorCode::Cancelled,
                    format!("ask_user could not collect answers: {}", e),
                )));
            }
        };

        self.registry.journal().record(JournalEvent::new(
            "ask_user_answered",
            json!({
                "outcome": outcome,
                "questions": details.questions.len(),
                "answered": answers.len(),
            }),
        ));
        details.handle.confirm(outcome, answers);

        Ok(invocation.execute())
    }
}
