//! Logging infrastructure built on `tracing`.
//!
//! Two modes matter for a terminal debugger:
//!
//! - **Console logging** for headless use: pretty or JSON output on
//!   stdout, optionally teed to a file via `HEXSPRAY_LOG_FILE`.
//! - **File-only logging** for the TUI: log lines on stdout would tear the
//!   alternate screen apart, so interactive runs write only to
//!   `~/.hexspray/YYYY-MM-DD-hexspray-tui.log` (or `/tmp` without a home
//!   directory).
//!
//! ## Environment variables
//!
//! - `RUST_LOG`: level filter, including module-specific filters such as
//!   `hexspray_core=debug`
//! - `HEXSPRAY_LOG_FORMAT`: `pretty` (default) or `json`
//! - `HEXSPRAY_LOG_FILE`: optional log file path for console mode

use std::path::PathBuf;
use std::str::FromStr;
use std::{env, io};

use chrono::Utc;
use tracing::Level;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat
{
    /// Pretty-printed, human-readable format (default)
    Pretty,
    /// JSON format for machine consumption
    Json,
}

impl FromStr for LogFormat
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "pretty" | "dev" | "development" => Ok(LogFormat::Pretty),
            "json" | "prod" | "production" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {s}. Use 'pretty' or 'json'")),
        }
    }
}

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel
{
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level
{
    fn from(level: LogLevel) -> Self
    {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

impl FromStr for LogLevel
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "error" | "err" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" | "dbg" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(format!(
                "Unknown log level: {s}. Use 'error', 'warn', 'info', 'debug', or 'trace'"
            )),
        }
    }
}

/// Logging initialization error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError
{
    /// Invalid log format
    #[error("Invalid log format: {0}")]
    InvalidFormat(String),

    /// Invalid log level
    #[error("Invalid log level: {0}")]
    InvalidLevel(String),

    /// File logging error
    #[error("File logging error: {0}")]
    FileError(#[from] io::Error),
}

/// Initialize console logging from the environment.
///
/// Reads `RUST_LOG`, `HEXSPRAY_LOG_FORMAT`, and `HEXSPRAY_LOG_FILE`.
///
/// ## Errors
///
/// Returns an error if a configured log file cannot be created.
pub fn init_logging() -> Result<(), LoggingError>
{
    let format = env::var("HEXSPRAY_LOG_FORMAT")
        .ok()
        .and_then(|s| LogFormat::from_str(&s).ok())
        .unwrap_or(LogFormat::Pretty);

    let default_level = env::var("RUST_LOG")
        .unwrap_or_else(|_| "info".to_string())
        .parse::<LogLevel>()
        .map(Into::into)
        .unwrap_or(Level::INFO);

    init_logging_with_format(format, default_level)
}

/// Initialize console logging with an explicit level and format.
///
/// ## Errors
///
/// Returns an error if a configured log file cannot be created.
pub fn init_logging_with_level(level: LogLevel, format: LogFormat) -> Result<(), LoggingError>
{
    init_logging_with_format(format, level.into())
}

/// Initialize file-only logging for a TUI run and return the log path.
///
/// Interactive mode must not write to stdout: the terminal is in raw mode
/// on the alternate screen. Logs go to
/// `~/.hexspray/YYYY-MM-DD-hexspray-tui.log`, falling back to `/tmp`.
///
/// ## Errors
///
/// Returns an error if the log directory or file cannot be created.
pub fn init_logging_for_tui(level: Option<LogLevel>) -> Result<PathBuf, LoggingError>
{
    let today = Utc::now().format("%Y-%m-%d");
    let log_file = if let Ok(home) = env::var("HOME") {
        let dir = PathBuf::from(home).join(".hexspray");
        std::fs::create_dir_all(&dir).map_err(LoggingError::FileError)?;
        dir.join(format!("{today}-hexspray-tui.log"))
    } else {
        PathBuf::from("/tmp").join(format!("{today}-hexspray-tui.log"))
    };

    let filter = match level {
        Some(level) => EnvFilter::new(Level::from(level).to_string()),
        None => env_filter(Level::INFO),
    };

    // Date is baked into the filename, so no rotation.
    let appender = tracing_appender::rolling::never(
        log_file.parent().unwrap_or(&PathBuf::from(".")),
        log_file.file_name().unwrap_or_default(),
    );
    let (writer, guard) = tracing_appender::non_blocking(appender);
    // The guard flushes on drop; it must live for the whole process.
    std::mem::forget(guard);

    let layer = fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_timer(ChronoUtc::rfc_3339())
        .with_ansi(false)
        .with_filter(filter);

    Registry::default().with(layer).init();
    Ok(log_file)
}

/// Build the environment filter, letting `RUST_LOG` override the default.
fn env_filter(default_level: Level) -> EnvFilter
{
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level.to_string()))
}

#[allow(clippy::unnecessary_wraps)]
fn init_logging_with_format(format: LogFormat, default_level: Level) -> Result<(), LoggingError>
{
    let filter = env_filter(default_level);
    let log_file = env::var("HEXSPRAY_LOG_FILE").ok().map(PathBuf::from);

    match format {
        LogFormat::Pretty => {
            let console = fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_timer(ChronoUtc::rfc_3339())
                .with_ansi(true)
                .with_writer(io::stdout)
                .with_filter(filter);

            if let Some(path) = log_file {
                let appender = tracing_appender::rolling::daily(
                    path.parent().unwrap_or(&PathBuf::from(".")),
                    path.file_name().unwrap_or_default(),
                );
                let (writer, guard) = tracing_appender::non_blocking(appender);
                std::mem::forget(guard);
                let file = fmt::layer()
                    .with_writer(writer)
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(false)
                    .with_filter(env_filter(default_level));
                Registry::default().with(console).with(file).init();
            } else {
                Registry::default().with(console).init();
            }
        }
        LogFormat::Json => {
            let console = fmt::layer()
                .json()
                .with_target(true)
                .with_timer(ChronoUtc::rfc_3339())
                .with_current_span(true)
                .with_writer(io::stdout)
                .with_filter(filter);

            if let Some(path) = log_file {
                let appender = tracing_appender::rolling::daily(
                    path.parent().unwrap_or(&PathBuf::from(".")),
                    path.file_name().unwrap_or_default(),
                );
                let (writer, guard) = tracing_appender::non_blocking(appender);
                std::mem::forget(guard);
                let file = fmt::layer()
                    .json()
                    .with_writer(writer)
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_current_span(true)
                    .with_filter(env_filter(default_level));
                Registry::default().with(console).with(file).init();
            } else {
                Registry::default().with(console).init();
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_log_format_from_str()
    {
        assert_eq!(LogFormat::from_str("pretty").unwrap(), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str("json").unwrap(), LogFormat::Json);
        assert!(LogFormat::from_str("invalid").is_err());
    }

    #[test]
    fn test_log_level_from_str()
    {
        assert_eq!(LogLevel::from_str("error").unwrap(), LogLevel::Error);
        assert_eq!(LogLevel::from_str("warning").unwrap(), LogLevel::Warn);
        assert_eq!(LogLevel::from_str("trace").unwrap(), LogLevel::Trace);
        assert!(LogLevel::from_str("invalid").is_err());
    }

    #[test]
    fn test_log_level_to_tracing_level()
    {
        assert_eq!(Level::from(LogLevel::Error), Level::ERROR);
        assert_eq!(Level::from(LogLevel::Debug), Level::DEBUG);
    }
}
