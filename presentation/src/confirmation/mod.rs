//! Terminal adapters for the ask-user confirmation port

pub mod console;

pub use console::ConsoleConfirmation;
