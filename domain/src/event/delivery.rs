//! Inbound result/error deliveries from the remote actor

use crate::call::call_id::CallId;
use crate::core::error::DomainError;
use crate::tool::value_objects::ToolResult;
use serde::{Deserialize, Serialize};

/// What the remote actor sent back for a call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryPayload {
    Result(ToolResult),
    Error(String),
}

/// A result or error for one call id.
///
/// Wire shapes accepted in a data part:
///
/// ```json
/// { "callId": "abc123", "result": { "llmContent": "...", "returnDisplay": "..." } }
/// { "callId": "abc123", "error": "disk full" }
/// { "callId": "abc123", "error": { "message": "disk full" } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteDelivery {
    pub call_id: CallId,
    pub payload: DeliveryPayload,
}

impl RemoteDelivery {
    pub fn result(call_id: impl Into<CallId>, result: ToolResult) -> Self {
        Self {
            call_id: call_id.into(),
            payload: DeliveryPayload::Result(result),
        }
    }

    pub fn error(call_id: impl Into<CallId>, message: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            payload: DeliveryPayload::Error(message.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.payload, DeliveryPayload::Error(_))
    }

    /// Parse a delivery from a data part payload
    pub fn from_data(data: &serde_json::Value) -> Result<Self, DomainError> {
        let call_id = data
            .get("callId")
            .and_then(|v| v.as_str())
            .ok_or_else(|| DomainError::MalformedEvent("delivery has no callId".into()))?;

        if let Some(error) = data.get("error").filter(|e| !e.is_null()) {
            let message = match error {
                serde_json::Value::String(s) => s.clone(),
                other => other
                    .get("message")
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
                    .unwrap_or_else(|| other.to_string()),
            };
            return Ok(Self::error(call_id, message));
        }

        let result = data
            .get("result")
            .ok_or_else(|| {
                DomainError::MalformedEvent(format!("delivery for {} has neither result nor error", call_id))
            })?;
        let result: ToolResult = serde_json::from_value(result.clone())
            .map_err(|e| DomainError::MalformedEvent(format!("invalid result for {}: {}", call_id, e)))?;

        Ok(Self::result(call_id, result))
    }

    pub fn to_data(&self) -> serde_json::Value {
        match &self.payload {
            DeliveryPayload::Result(result) => serde_json::json!({
                "callId": self.call_id,
                "result": result,
            }),
            DeliveryPayload::Error(message) => serde_json::json!({
                "callId": self.call_id,
                "error": message,
            }),
        }
    }
}
