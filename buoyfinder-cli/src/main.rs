//! BuoyFinder CLI - Command-line interface
//!
//! This binary provides a command-line interface to the BuoyFinder
//! library: one-shot feed fetches, a live tracking loop, GeoJSON marker
//! export, and configuration management.

mod commands;
mod error;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use buoyfinder::config::ConfigFile;
use buoyfinder::logging::{init_logging, LoggingGuard};

use crate::commands::config::ConfigCommands;
use crate::error::CliError;

#[derive(Parser)]
#[command(name = "buoyfinder")]
#[command(version = buoyfinder::VERSION)]
#[command(about = "Track satellite-reporting buoys and vessels", long_about = None)]
struct Cli {
    /// Path to the configuration file (defaults to ~/.buoyfinder/config.ini)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the feed once and print every known asset
    Fetch(commands::fetch::FetchArgs),

    /// Run the navigation service until Ctrl-C, printing updates
    Watch(commands::watch::WatchArgs),

    /// Emit the latest asset positions as GeoJSON
    Markers(commands::markers::MarkersArgs),

    /// View or create the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        e.exit();
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config subcommands manage the file itself and run without
        // logging, so a broken config stays inspectable
        Commands::Config { command } => commands::config::run(command, cli.config.as_deref()),
        Commands::Fetch(args) => {
            let (config, _guard) = prepare(cli.config.as_deref())?;
            commands::fetch::run(args, &config).await
        }
        Commands::Watch(args) => {
            let (config, _guard) = prepare(cli.config.as_deref())?;
            commands::watch::run(args, &config).await
        }
        Commands::Markers(args) => {
            let (config, _guard) = prepare(cli.config.as_deref())?;
            commands::markers::run(args, &config).await
        }
    }
}

/// Load configuration and initialize logging for a command run.
///
/// The returned guard must stay alive until the command finishes, or
/// buffered log records are lost.
fn prepare(config_path: Option<&Path>) -> Result<(ConfigFile, LoggingGuard), CliError> {
    let config = match config_path {
        Some(path) => ConfigFile::load_from(path)?,
        None => ConfigFile::load()?,
    };

    let guard = init_logging(&config.logging.file)
        .map_err(|e| CliError::LoggingInit(e.to_string()))?;
    tracing::info!(version = buoyfinder::VERSION, "Session started");

    Ok((config, guard))
}
