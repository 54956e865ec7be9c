//! Presentation layer for tool-bridge
//!
//! This crate contains the CLI definition, the interactive terminal
//! dialog for ask-user, and console output formatting.

pub mod cli;
pub mod confirmation;
pub mod output;

// Re-export commonly used types
pub use cli::commands::{AskArgs, Cli, Command, OutputFormat, ServeArgs};
pub use confirmation::ConsoleConfirmation;
pub use output::console::ConsoleFormatter;
