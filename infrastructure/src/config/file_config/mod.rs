//! Raw TOML configuration data types
//!
//! These structs mirror the config file exactly. Conversion into
//! application types happens through [`FileConfig::validate`] and the
//! `to_*` helpers, so a bad value is reported before the bridge starts.

mod bridge;
mod journal;
mod tools;

pub use bridge::FileBridgeConfig;
pub use journal::FileJournalConfig;
pub use tools::{FileRemoteToolConfig, FileToolsConfig};

use bridge_application::BridgeParams;
use bridge_domain::ToolDescriptor;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("bridge.timeout_ms cannot be 0")]
    ZeroTimeout,

    #[error("bridge.delivery: unknown value '{0}' (expected \"suspending\" or \"immediate\")")]
    UnknownDelivery(String),

    #[error("bridge.match_policy: unknown value '{0}' (expected \"exact\" or \"any\")")]
    UnknownMatchPolicy(String),

    #[error("bridge.match_policy = \"any\" is only valid with delivery = \"immediate\"")]
    SuspendingAnyMatch,

    #[error("tools.remote.{0}: description cannot be empty")]
    MissingToolDescription(String),

    #[error("tools.remote.{tool}: unknown kind '{kind}'")]
    UnknownToolKind { tool: String, kind: String },

    #[error("tools.remote.{0}: parameters must be a table")]
    InvalidToolSchema(String),

    #[error("tools.remote.{0}: name is reserved")]
    ReservedToolName(String),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Remote call behavior
    pub bridge: FileBridgeConfig,
    /// Call lifecycle journal
    pub journal: FileJournalConfig,
    /// Pre-declared remote tools
    pub tools: FileToolsConfig,
}

impl FileConfig {
    /// Validate the configuration, stopping at the first problem.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.to_bridge_params()?;
        self.remote_tools()?;
        Ok(())
    }

    pub fn to_bridge_params(&self) -> Result<BridgeParams, ConfigValidationError> {
        self.bridge.to_bridge_params()
    }

    pub fn remote_tools(&self) -> Result<Vec<ToolDescriptor>, ConfigValidationError> {
        self.tools.remote_descriptors()
    }
}
