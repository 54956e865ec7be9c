//! Domain layer for tool-bridge
//!
//! This crate contains the pure types of the remote tool-execution bridge.
//! It has no dependencies on an async runtime, transports or terminals.
//!
//! # Core Concepts
//!
//! ## Remote tools
//!
//! A reasoning engine calls a tool whose implementation lives in a remote,
//! asynchronously-responding actor. Each call gets a [`CallId`] and a
//! [`CallRecord`] that tracks it from creation to settlement:
//!
//! ```text
//! Created ──> AwaitingRemote ──┬──> Resolved
//!                              ├──> Failed
//!                              ├──> TimedOut
//!                              └──> Cancelled
//! ```
//!
//! ## Ask-user
//!
//! A tool that pauses for a human to answer a short list of [`Question`]s.
//!
//! ## Wire events
//!
//! The [`event`] module holds the status-update events published to the
//! remote actor and the deliveries parsed back from it.

pub mod call;
pub mod core;
pub mod event;
pub mod interaction;
pub mod tool;

// Re-export commonly used types
pub use call::{
    call_id::CallId,
    record::{CallRecord, CallState},
    session::SessionIds,
};
pub use core::{error::DomainError, string::truncate};
pub use event::{
    call_request::CallRequest,
    custom_tools::parse_custom_tools,
    delivery::{DeliveryPayload, RemoteDelivery},
    status_update::{EventMessage, Part, StatusUpdateEvent, TaskState, TaskStatus},
};
pub use interaction::{
    answers::{AnswerSet, ConfirmationOutcome},
    question::{Question, QuestionType},
};
pub use tool::{
    entities::{ToolCatalog, ToolDescriptor, ToolKind},
    traits::{ParamValidator, SchemaParamValidator},
    value_objects::{ErrorCode, ToolError, ToolResult},
};
