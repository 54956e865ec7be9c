//! Configuration file loading for tool-bridge
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./bridge.toml` or `./.bridge.toml`
//! 3. XDG config: `$XDG_CONFIG_HOME/tool-bridge/config.toml`
//! 4. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileBridgeConfig, FileConfig, FileJournalConfig, FileRemoteToolConfig,
    FileToolsConfig,
};
pub use loader::ConfigLoader;
