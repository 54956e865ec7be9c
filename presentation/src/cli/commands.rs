//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// How `ask` prints the tool result
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored summary for a person
    #[default]
    Console,
    /// The result exactly as the engine receives it
    Json,
}

/// CLI arguments for tool-bridge
#[derive(Parser, Debug)]
#[command(name = "tool-bridge")]
#[command(author, version, about = "Bridge tool calls to a remote actor and back")]
#[command(long_about = r#"
tool-bridge lets a reasoning engine call tools that actually run in a remote,
asynchronously-responding client. Each call is published as a status-update
event and suspends until the client delivers a result, an error, or the
deadline passes. The built-in ask_user tool pauses a call for a person.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./bridge.toml       Project-level config
3. ~/.config/tool-bridge/config.toml   Global config

Example:
  tool-bridge serve
  tool-bridge ask '{"questions":[{"question":"Deploy?","header":"Deploy","type":"yesno"}]}'
  tool-bridge show-config
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Write diagnostics to this file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Speak the JSON-lines host protocol on stdin/stdout
    Serve(ServeArgs),

    /// Run the ask_user dialog once in this terminal
    Ask(AskArgs),

    /// Show configuration sources and the effective settings
    ShowConfig,
}

#[derive(clap::Args, Debug, Default)]
pub struct ServeArgs {
    /// Override bridge.timeout_ms
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Override journal.path
    #[arg(long, value_name = "PATH")]
    pub journal: Option<PathBuf>,

    /// Dismiss every ask_user dialog instead of forwarding it to the host
    #[arg(long)]
    pub auto_dismiss: bool,
}

#[derive(clap::Args, Debug)]
pub struct AskArgs {
    /// ask_user parameters as JSON (`{"questions":[...]}`)
    #[arg(value_name = "JSON", conflicts_with = "file")]
    pub params: Option<String>,

    /// Read the parameters from a file
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "console")]
    pub output: OutputFormat,
}
