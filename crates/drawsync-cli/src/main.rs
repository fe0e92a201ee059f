//! drawsync CLI
//!
//! Command-line interface for drawsync - push and pull a drawing document
//! to a GitHub repository.

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use drawsync_core::{Config, SyncError};

mod commands;
mod output;
mod prompt;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "drawsync")]
#[command(about = "drawsync - Keep a drawing document in a GitHub repository")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use this config file instead of the default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Push the local document to GitHub
    Push {
        /// Import this JSON file as the local document before pushing
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Overwrite remote changes this device has not pulled
        #[arg(long)]
        force: bool,
    },
    /// Pull the document from GitHub into local storage
    Pull {
        /// Also write the pulled document to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Store a GitHub personal access token
    Login {
        /// Token to store (prompted for if omitted)
        #[arg(long)]
        token: Option<String>,
    },
    /// Remove the stored token
    Logout,
    /// Show token, local document and remote settings
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, api_url, repository, document_path, ...)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands work even when the config file is broken
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), cli.config.as_ref(), &output);
    }

    let config = Config::load_with_cli_override(cli.config.as_ref())
        .context("Failed to load configuration")?;
    init_logging(&config);

    let result = match cli.command {
        Commands::Push { file, force } => commands::push::push(&config, file, force, &output).await,
        Commands::Pull { output: path } => commands::pull::pull(&config, path, &output).await,
        Commands::Login { token } => commands::login::login(&config, token, &output).await,
        Commands::Logout => commands::login::logout(&config, &output),
        Commands::Status => commands::status::show(&config, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
    };

    if let Err(ref e) = result {
        if let Some(suggestion) = e
            .downcast_ref::<SyncError>()
            .and_then(|err| err.recovery_suggestion())
        {
            output.hint(suggestion);
        }
    }

    result
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Initialize logging
///
/// Only initializes if DRAWSYNC_LOG environment variable is set.
/// Logs to file (config.log_file or default {data_dir}/debug.log).
fn init_logging(config: &Config) {
    let Ok(log_level) = std::env::var("DRAWSYNC_LOG") else {
        return;
    };

    let log_path = config.log_path();

    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!(
        "drawsync_core={},drawsync_cli={}",
        log_level, log_level
    ));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("Logging initialized to {:?}", log_path);
}
