//! Logging infrastructure.
//!
//! Structured logging to the configured log file:
//! - Log file cleared on session start
//! - Non-blocking writer, so logging never stalls the pipeline
//! - Filterable via the RUST_LOG environment variable
//!
//! Log records go to the file only; command output stays on stdout and
//! remains pipeable.

use std::fs;
use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping this guard flushes and closes the log file writer.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Initialize the logging system.
///
/// Creates the log directory if needed, clears the previous session's
/// log file, and installs a non-blocking file writer as the global
/// subscriber. The filter defaults to `info` when `RUST_LOG` is unset.
///
/// # Errors
///
/// Returns an error if the log directory cannot be created or the log
/// file cannot be cleared.
pub fn init_logging(log_file: &Path) -> Result<LoggingGuard, io::Error> {
    let log_dir = log_file.parent().unwrap_or_else(|| Path::new("."));
    let file_name = log_file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "buoyfinder.log".to_string());

    fs::create_dir_all(log_dir)?;

    // Clear the previous session's log; handles both existing and
    // missing files
    fs::write(log_file, "")?;

    let file_appender = tracing_appender::rolling::never(log_dir, &file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}
