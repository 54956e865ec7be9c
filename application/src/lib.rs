//! Application layer for tool-bridge
//!
//! This crate contains the remote-invocation machinery, the ask-user tool,
//! port definitions and the tool-call use case. It depends only on the
//! domain layer.

pub mod ask_user;
pub mod config;
pub mod error;
pub mod ports;
pub mod remote;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use ask_user::{
    ASK_USER_TOOL_NAME, AskUserInvocation, AskUserTool, ConfirmHandle, ConfirmationDetails,
};
pub use config::{BridgeParams, DeliveryMode, MatchPolicy};
pub use error::BridgeError;
pub use ports::{
    call_journal::{CallJournal, JournalEvent, NoCallJournal},
    confirmation::{
        AutoDismissConfirmation, ConfirmationError, ConfirmationPort, ConfirmationResponse,
        ScriptedConfirmation,
    },
    event_publisher::{EventPublisher, PublishError},
};
pub use remote::{
    CallContext, CallCorrelator, DeliveryOutcome, DeliveryRoute, PendingResultStore,
    RemoteToolInvocation, RemoteToolWrapper, Settlement, StoreOutcome,
};
pub use use_cases::execute_tool_call::{ExecuteToolCallUseCase, ToolCallInput};
pub use use_cases::tool_registry::ToolRegistry;
