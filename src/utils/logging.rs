//! Logging system initialization
//!
//! Sets up tracing-based logging with file output to
//! %APPDATA%\MapCover\mapcover.log and rotation on startup keeping 10
//! historical files.

use crate::error::{MapCoverError, Result, StringError};
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt};

/// Maximum number of historical log files to keep (mapcover.log.1 through mapcover.log.9)
const MAX_LOG_FILES: u8 = 9;

/// Directory holding the log files
pub fn log_dir() -> PathBuf {
    let appdata = std::env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(appdata).join("MapCover")
}

/// Initialize the logging system
///
/// Log level defaults to INFO but can be configured via `RUST_LOG` environment variable.
pub fn init_logging() -> Result<()> {
    init_logging_in(&log_dir())
}

/// Initialize the logging system writing to `log_dir`
pub fn init_logging_in(log_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(log_dir)?;

    let log_path = log_dir.join("mapcover.log");
    rotate_logs_on_startup(&log_path)?;

    // Rotation is handled on startup, not by the appender
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix("mapcover")
        .filename_suffix("log")
        .build(log_dir)
        .map_err(|e| MapCoverError::ConfigError(Box::new(e)))?;

    let subscriber = fmt()
        .with_writer(file_appender)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| MapCoverError::ConfigError(Box::new(e)))?;

    tracing::info!("mapcover v{} started", env!("CARGO_PKG_VERSION"));

    Ok(())
}

/// Rotate log files on startup
///
/// - mapcover.log.9 is deleted (oldest log)
/// - mapcover.log.N -> mapcover.log.N+1 for N in 8..=1
/// - mapcover.log -> mapcover.log.1
/// - A fresh mapcover.log will be created by the logger
fn rotate_logs_on_startup(log_path: &Path) -> Result<()> {
    if !log_path.exists() {
        return Ok(());
    }

    let log_dir = log_path
        .parent()
        .ok_or_else(|| MapCoverError::ConfigError(StringError::new("Invalid log path")))?;

    let log_name = log_path
        .file_name()
        .ok_or_else(|| MapCoverError::ConfigError(StringError::new("Invalid log filename")))?
        .to_string_lossy();

    let oldest_log = log_dir.join(format!("{log_name}.{MAX_LOG_FILES}"));
    if oldest_log.exists() {
        std::fs::remove_file(&oldest_log)?;
    }

    for i in (1..MAX_LOG_FILES).rev() {
        let current_log = log_dir.join(format!("{log_name}.{i}"));
        let next_log = log_dir.join(format!("{log_name}.{}", i + 1));

        if current_log.exists() {
            std::fs::rename(&current_log, &next_log)?;
        }
    }

    let log_1 = log_dir.join(format!("{log_name}.1"));
    std::fs::rename(log_path, &log_1)?;

    Ok(())
}
