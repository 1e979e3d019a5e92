//! StayNest CLI - hotel search, booking and management

mod commands;
mod config;
mod logging;
mod pages;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use commands::Commands;
use staynest_http::ClientError;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{Level, error, info};

#[derive(Parser)]
#[command(name = "staynest")]
#[command(about = "Search, book and manage hotel stays")]
#[command(version)]
struct Cli {
    /// Set logging level
    #[arg(short = 'l', long, global = true, default_value = "warn")]
    log_level: LogLevel,

    /// State directory for stored credentials, the last search and logs
    #[arg(short = 'd', long, global = true)]
    state_dir: Option<PathBuf>,

    /// Configuration file (defaults to <state dir>/staynest.toml)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Timeout for the whole command in seconds (0 = no timeout)
    #[arg(short = 't', long, global = true, default_value = "60")]
    timeout: u64,

    /// Disable file logging (only log to stderr)
    #[arg(long, global = true)]
    no_file_log: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let state_dir = cli.state_dir.clone().unwrap_or_else(config::default_state_dir);
    logging::init_logging(cli.log_level.into(), &state_dir, cli.no_file_log)?;

    let settings = config::CliConfig::load(cli.config.as_deref(), &state_dir)?;
    let state_dir = cli.state_dir.or(settings.state_dir.clone()).unwrap_or(state_dir);

    info!("Starting StayNest CLI");

    let execution = cli.command.execute(settings, state_dir);
    let outcome = if cli.timeout == 0 {
        // No timeout - run until the command finishes
        Ok(execution.await)
    } else {
        tokio::time::timeout(Duration::from_secs(cli.timeout), execution).await
    };

    match outcome {
        Ok(Ok(())) => {
            info!("Command completed successfully");
        }
        Ok(Err(e)) => {
            error!("Command failed: {e:#}");
            eprintln!("Error: {e:#}");
            if let Some(hint) = recovery_hint(&e) {
                eprintln!("{hint}");
            }
            std::process::exit(1);
        }
        Err(_) => {
            error!("Command timed out after {} seconds", cli.timeout);
            eprintln!("Error: timed out after {} seconds", cli.timeout);
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Next step to suggest for a failed API call
fn recovery_hint(error: &anyhow::Error) -> Option<&'static str> {
    let error = error.downcast_ref::<ClientError>()?;
    if error.is_auth_expired() {
        Some("Your session has expired. Log in again with `staynest login`.")
    } else if error.status() == Some(403) {
        Some("This action needs a hotel manager account.")
    } else {
        None
    }
}

#[derive(Clone, Debug, ValueEnum)]
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
            LogLevel::Error => Self::ERROR,
            LogLevel::Warn => Self::WARN,
            LogLevel::Info => Self::INFO,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Trace => Self::TRACE,
        }
    }
}
