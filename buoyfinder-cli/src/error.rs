//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent
//! formatting and appropriate exit codes.

use std::fmt;
use std::process;

use buoyfinder::config::{config_file_path, ConfigFileError};
use buoyfinder::feed::FeedError;
use buoyfinder::service::ServiceError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration file error
    Config(ConfigFileError),
    /// Failed to install the shutdown signal handler
    Signal(String),
    /// Failed to start the navigation service
    Service(ServiceError),
    /// Feed fetch failed
    Feed(FeedError),
    /// Marker serialization failed
    Markers(serde_json::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Service(ServiceError::MissingFeedId) => {
                eprintln!();
                eprintln!("Set your SPOT shared feed ID first:");
                eprintln!("  1. Run: buoyfinder config init");
                eprintln!(
                    "  2. Edit feed_id in {}",
                    config_file_path().display()
                );
            }
            CliError::Feed(_) | CliError::Service(ServiceError::Feed(_)) => {
                eprintln!();
                eprintln!("Common issues:");
                eprintln!("  1. No network connectivity");
                eprintln!("  2. Wrong feed_id in the [feed] config section");
                eprintln!("  3. The feed has no messages yet (the API reports E-0195)");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Signal(msg) => write!(f, "Failed to set signal handler: {}", msg),
            CliError::Service(e) => write!(f, "Navigation service error: {}", e),
            CliError::Feed(e) => write!(f, "Feed fetch failed: {}", e),
            CliError::Markers(e) => write!(f, "Failed to serialize markers: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Service(e) => Some(e),
            CliError::Feed(e) => Some(e),
            CliError::Markers(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<ServiceError> for CliError {
    fn from(e: ServiceError) -> Self {
        CliError::Service(e)
    }
}

impl From<FeedError> for CliError {
    fn from(e: FeedError) -> Self {
        CliError::Feed(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Markers(e)
    }
}
