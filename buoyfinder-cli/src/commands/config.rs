//! Configuration management CLI commands.
//!
//! Provides `config show`, `config init`, and `config path` commands
//! for viewing and bootstrapping the configuration file from the
//! command line.

use std::path::{Path, PathBuf};

use clap::Subcommand;

use buoyfinder::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the active configuration
    Show,

    /// Create the configuration file with default settings
    Init,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand.
///
/// `config_path` is the `--config` override; `None` means the default
/// location under `~/.buoyfinder`.
pub fn run(command: ConfigCommands, config_path: Option<&Path>) -> Result<(), CliError> {
    match command {
        ConfigCommands::Show => run_show(config_path),
        ConfigCommands::Init => run_init(config_path),
        ConfigCommands::Path => run_path(config_path),
    }
}

/// Print the active configuration, section by section.
fn run_show(config_path: Option<&Path>) -> Result<(), CliError> {
    let config = match config_path {
        Some(path) => ConfigFile::load_from(path)?,
        None => ConfigFile::load()?,
    };

    let feed_id = if config.feed.feed_id.is_empty() {
        "(not set)".to_string()
    } else {
        config.feed.feed_id.clone()
    };

    println!("[feed]");
    println!("  feed_id = {}", feed_id);
    println!("  base_url = {}", config.feed.base_url);
    println!("  refresh_interval = {}", config.feed.refresh_interval);
    println!("  timeout = {}", config.feed.timeout);
    println!();
    println!("[location]");
    println!("  update_interval = {}", config.location.update_interval);
    println!();
    println!("[display]");
    println!("  timezone = {}", config.display.timezone.name());
    println!("  reference_name = {}", config.display.reference_name);
    println!("  reference_latitude = {}", config.display.reference_latitude);
    println!(
        "  reference_longitude = {}",
        config.display.reference_longitude
    );
    println!("  speed_unit = {}", config.display.speed_unit);
    println!();
    println!("[logging]");
    println!("  file = {}", config.logging.file.display());

    Ok(())
}

/// Create the configuration file with defaults when missing.
fn run_init(config_path: Option<&Path>) -> Result<(), CliError> {
    let path = resolve_path(config_path);

    if path.exists() {
        println!("Configuration already exists at {}", path.display());
        return Ok(());
    }

    ConfigFile::default().save_to(&path)?;
    println!("Created {}", path.display());
    println!("Edit feed_id in the [feed] section to start tracking.");

    Ok(())
}

/// Show the configuration file path.
fn run_path(config_path: Option<&Path>) -> Result<(), CliError> {
    println!("{}", resolve_path(config_path).display());
    Ok(())
}

fn resolve_path(config_path: Option<&Path>) -> PathBuf {
    config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(config_file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_and_preserves() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");

        run(ConfigCommands::Init, Some(path.as_path())).unwrap();
        assert!(path.exists());

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("[feed]"));

        // A second init must not clobber an edited file
        std::fs::write(
            &path,
            written.replace("refresh_interval = 300", "refresh_interval = 600"),
        )
        .unwrap();
        run(ConfigCommands::Init, Some(path.as_path())).unwrap();

        let preserved = std::fs::read_to_string(&path).unwrap();
        assert!(preserved.contains("refresh_interval = 600"));
    }

    #[test]
    fn test_show_accepts_override_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[feed]\nfeed_id = ABC123\n").unwrap();

        assert!(run(ConfigCommands::Show, Some(path.as_path())).is_ok());
    }
}
