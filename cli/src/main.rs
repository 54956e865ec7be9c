//! CLI entrypoint for tool-bridge
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod serve;

use anyhow::{Context, Result, anyhow, bail};
use bridge_application::{CallJournal, ExecuteToolCallUseCase, NoCallJournal, ToolCallInput, ToolRegistry};
use bridge_infrastructure::{ConfigLoader, FileConfig, JsonLinesWriter, JsonlCallJournal};
use bridge_presentation::{
    AskArgs, Cli, Command, ConsoleConfirmation, ConsoleFormatter, OutputFormat, ServeArgs,
};
use clap::Parser;
use serve::HostSession;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(cli.verbose, cli.log_file.as_ref())?;

    info!("Starting tool-bridge");

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    config.validate().context("Invalid configuration")?;

    match cli.command {
        Command::Serve(args) => serve(config, args).await,
        Command::Ask(args) => ask(config, args).await,
        Command::ShowConfig => show_config(&config, cli.config.as_ref()),
    }
}

/// Diagnostics go to stderr (stdout carries the host protocol) or to
/// `--log-file` through a non-blocking writer.
fn init_logging(verbose: u8, log_file: Option<&PathBuf>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let Some(path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let file_name = path
        .file_name()
        .with_context(|| format!("--log-file {} has no file name", path.display()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(Some(guard))
}

fn open_journal(path: Option<PathBuf>) -> Arc<dyn CallJournal> {
    match path.and_then(|p| JsonlCallJournal::open(&p)) {
        Some(journal) => {
            info!("Journaling calls to {}", journal.path().display());
            Arc::new(journal)
        }
        None => Arc::new(NoCallJournal),
    }
}

fn build_registry(config: &FileConfig, journal: Arc<dyn CallJournal>, timeout_ms: Option<u64>) -> Result<ToolRegistry> {
    let mut params = config.to_bridge_params()?;
    if let Some(ms) = timeout_ms {
        if ms == 0 {
            bail!("--timeout-ms cannot be 0");
        }
        params = params.with_timeout(Duration::from_millis(ms));
    }

    let registry = ToolRegistry::new(params).with_journal(journal);
    for descriptor in config.remote_tools()? {
        registry.register_remote(descriptor)?;
    }
    Ok(registry)
}

async fn serve(config: FileConfig, args: ServeArgs) -> Result<()> {
    let journal = open_journal(args.journal.or_else(|| config.journal.resolved_path()));
    let registry = Arc::new(build_registry(&config, journal, args.timeout_ms)?);

    info!(
        "Serving on stdio (delivery: {}, timeout: {}ms, {} remote tool(s))",
        registry.params().delivery,
        registry.params().timeout_ms(),
        registry.remote_tools().len()
    );

    HostSession::new(registry, JsonLinesWriter::stdout(), args.auto_dismiss)
        .run(tokio::io::stdin())
        .await
        .context("Host connection failed")
}

async fn ask(config: FileConfig, args: AskArgs) -> Result<()> {
    let raw = match (&args.params, &args.file) {
        (Some(json), _) => json.clone(),
        (None, Some(path)) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?
        }
        (None, None) => bail!("Provide ask_user parameters as JSON or with --file"),
    };
    let params: serde_json::Value = serde_json::from_str(&raw).context("Parameters are not valid JSON")?;

    let journal = open_journal(config.journal.resolved_path());
    let registry = Arc::new(build_registry(&config, journal, None)?);
    let use_case = ExecuteToolCallUseCase::new(registry, Arc::new(ConsoleConfirmation::new()));

    let result = use_case
        .execute(ToolCallInput::new("ask_user", params), CancellationToken::new())
        .await;

    match args.output {
        OutputFormat::Console => print!("{}", ConsoleFormatter::format_result("ask_user", &result)),
        OutputFormat::Json => println!("{}", ConsoleFormatter::format_json(&result)),
    }

    if let Some(error) = result.error() {
        bail!("ask_user failed: {}", error);
    }
    Ok(())
}

fn show_config(config: &FileConfig, explicit: Option<&PathBuf>) -> Result<()> {
    ConfigLoader::print_config_sources(explicit);
    println!();

    let registry = build_registry(config, Arc::new(NoCallJournal), None)?;
    let params = registry.params();
    println!("Effective settings:");
    println!("  delivery:         {}", params.delivery);
    println!("  timeout:          {}ms", params.timeout_ms());
    println!("  emit_legacy_keys: {}", params.emit_legacy_keys);
    match config.journal.resolved_path() {
        Some(path) => println!("  journal:          {}", path.display()),
        None => println!("  journal:          (disabled)"),
    }
    println!();
    print!("{}", ConsoleFormatter::format_catalog(&registry.catalog()));
    Ok(())
}
