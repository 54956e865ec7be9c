//! Infrastructure layer for tool-bridge
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: configuration file loading, the JSONL call journal,
//! and the transports that carry status updates to the host.

pub mod config;
pub mod logging;
pub mod transport;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileBridgeConfig, FileConfig, FileJournalConfig,
    FileRemoteToolConfig, FileToolsConfig,
};
pub use logging::JsonlCallJournal;
pub use transport::{
    ChannelEventPublisher, HostCommand, HostConfirmation, HostOutput, JsonLinesPublisher, JsonLinesWriter,
};
