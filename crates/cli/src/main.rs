//! Stockroom CLI - inventory, sessions and users from the terminal

mod commands;
mod config;
mod logging;

use anyhow::{Context as _, Result};
use clap::{Parser, ValueEnum};
use commands::{Commands, Context};
use std::path::PathBuf;
use stockroom_core::{ClientConfig, FileTokenStorage, SessionStore};
use stockroom_http::StockroomClient;
use tracing::{Level, debug, error};

#[derive(Parser)]
#[command(name = "stockroom")]
#[command(about = "Client for the Stockroom inventory backend")]
#[command(version)]
struct Cli {
    /// Set logging level
    #[arg(short = 'l', long, global = true, default_value = "warn")]
    log_level: LogLevel,

    /// Configuration file (TOML or YAML)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL
    #[arg(long, global = true, env = "STOCKROOM_API__BASE_URL")]
    base_url: Option<String>,

    /// Directory holding the stored session token and logs
    #[arg(short = 'd', long, global = true)]
    data_dir: Option<PathBuf>,

    /// Disable file logging (only log to stderr)
    #[arg(long, global = true)]
    no_file_log: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // Logging follows the configured data directory, so configuration loads first
    let config = match config::load_config(
        cli.config.as_deref(),
        config::Overrides {
            base_url: cli.base_url,
            data_dir: cli.data_dir,
        },
    ) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    };

    if let Err(e) = logging::init_logging(cli.log_level.into(), &config.data_dir, cli.no_file_log)
    {
        eprintln!("Failed to initialize logging: {e:#}");
    }

    if let Err(e) = run(cli.command, &config).await {
        error!("Command failed: {e:#}");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: &ClientConfig) -> Result<()> {
    debug!(base_url = config.base_url(), data_dir = %config.data_dir.display(), "Loaded configuration");

    let session = SessionStore::shared(FileTokenStorage::in_dir(&config.data_dir));
    let client = StockroomClient::from_config(config, session)
        .context("Failed to create API client")?;

    command.execute(&Context::new(client)).await
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}
