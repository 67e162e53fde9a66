//! Pathfinder - resilient product search over a live browser.
//!
//! Main entry point: loads configuration, connects to Chrome over CDP and
//! runs one product search task.

mod cli;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use pathfinder_agent_shopper::Orchestrator;
use pathfinder_config::{Config, ConfigLoader, ConfigValidator, LoggingConfig, ValidationWarning};
use pathfinder_protocols::{TaskInput, TaskResult};
use pathfinder_provider_openai::OpenAIClient;
use pathfinder_tools_browser::{CdpClient, CdpDocument};

use crate::cli::Cli;

/// Get the Pathfinder home directory (~/.pathfinder).
fn pathfinder_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".pathfinder"))
        .unwrap_or_else(|| PathBuf::from(".pathfinder"))
}

/// Initialize tracing with console and file output.
///
/// Console output goes to stderr so stdout carries only the result JSON.
fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    let log_dir = ConfigLoader::expand_path(&logging.directory);
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("pathfinder")
        .filename_suffix("log")
        .max_log_files(14)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The guard flushes the file writer on drop, so it must outlive main.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .try_init()?;

    Ok(())
}

/// Load, override and validate the configuration. Validation warnings are
/// returned so they can be logged once tracing is up.
fn load_config(cli: &Cli) -> anyhow::Result<(Config, Vec<ValidationWarning>)> {
    let path = cli
        .config
        .clone()
        .unwrap_or_else(|| pathfinder_dir().join("config.toml"));
    let mut config = load_from(&path)?;

    if let Some(endpoint) = &cli.cdp_endpoint {
        config.browser.cdp_endpoint = endpoint.clone();
    }
    if let Some(model) = &cli.model {
        config.inference.model = model.clone();
    }

    let validation = ConfigValidator::validate(&config);
    if !validation.is_valid() {
        let problems: Vec<String> = validation
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.path, e.message))
            .collect();
        bail!("invalid configuration: {}", problems.join("; "));
    }
    Ok((config, validation.warnings))
}

fn load_from(path: &Path) -> anyhow::Result<Config> {
    ConfigLoader::load_or_default(&ConfigLoader::expand_path(path))
        .with_context(|| format!("loading configuration from {}", path.display()))
}

/// Run one task. Failures before the pipeline starts still produce an
/// error [`TaskResult`].
async fn run_task(config: Config, query: String) -> TaskResult {
    match run(config, query).await {
        Ok(result) => result,
        Err(e) => {
            error!("Pathfinder failed: {:#}", e);
            TaskResult::error(format!("Browser unavailable: {:#}", e))
        }
    }
}

async fn run(config: Config, query: String) -> anyhow::Result<TaskResult> {
    let client = Arc::new(OpenAIClient::from_config(&config.inference));
    info!(model = client.model(), "Inference client ready");

    let browser = CdpClient::connect(&config.browser.cdp_endpoint).await?;
    let session = browser.new_page(None).await?;
    let document = CdpDocument::new(session, config.browser.navigation_timeout());

    let orchestrator = Orchestrator::new(&config, client);
    let input = TaskInput::new(query);

    let result = match tokio::time::timeout(
        config.pipeline.task_timeout(),
        orchestrator.run(&document, &input),
    )
    .await
    {
        Ok(result) => result,
        Err(_) => {
            error!(
                "Task exceeded {}s and was abandoned",
                config.pipeline.task_timeout_secs
            );
            TaskResult::error(format!(
                "Task timed out after {}s",
                config.pipeline.task_timeout_secs
            ))
        }
    };

    if let Err(e) = browser.close_page(document.session()).await {
        warn!("Failed to close page: {}", e);
    }

    Ok(result)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let (config, warnings) = match load_config(&cli) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_tracing(&config.logging) {
        eprintln!("Warning: file logging disabled: {:#}", e);
    }

    info!("Starting Pathfinder v{}", env!("CARGO_PKG_VERSION"));
    for warning in &warnings {
        warn!("Config {}: {}", warning.path, warning.message);
    }

    let result = run_task(config, cli.query_text()).await;
    match serde_json::to_string_pretty(&result) {
        Ok(json) => println!("{}", json),
        Err(e) => error!("Failed to serialize result: {}", e),
    }
    if result.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
