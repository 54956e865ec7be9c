//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod execute_tool_call;
pub mod tool_registry;
