//! Tool domain module
//!
//! Defines what the reasoning engine sees of a tool and what a tool call
//! produces.
//!
//! ```text
//! ┌────────────────┐    ┌────────────────┐    ┌──────────────┐
//! │ ToolDescriptor │───▶│ params (JSON)  │───▶│ ToolResult   │
//! │ (catalog)      │    │ (invocation)   │    │ (output)     │
//! └────────────────┘    └────────────────┘    └──────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`ToolDescriptor`]: name, display name, description, JSON-schema params, kind
//! - [`ToolCatalog`]: descriptors by name
//! - [`ToolResult`]: engine-facing content plus a human-facing display string
//! - [`ParamValidator`]: the `validateToolParamValues` hook
//!
//! Descriptors are created once at registration time and never mutated.

pub mod entities;
pub mod traits;
pub mod value_objects;

pub use entities::{ToolCatalog, ToolDescriptor, ToolKind};
pub use traits::{ParamValidator, SchemaParamValidator};
pub use value_objects::{ErrorCode, ToolError, ToolResult};
