//! Logging initialization for SkyDrive.
//!
//! Everything goes through `tracing`; the subscriber writes to stdout and
//! to the configured log file.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::{DriveError, Result};

/// Map a config level string to a tracing level. Unknown values fall back to INFO.
fn parse_level(level: &str) -> Level {
    match level.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Build the filter: `RUST_LOG` wins, otherwise the configured level.
/// sqlx statement logging is capped at WARN.
fn build_filter(level: &str) -> EnvFilter {
    let level = parse_level(level);
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    match "sqlx=warn".parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

/// Initialize logging to stdout and the configured log file.
///
/// The log file is appended to, and its directory is created when missing.
pub fn init(config: &LoggingConfig) -> Result<()> {
    if let Some(parent) = Path::new(&config.file).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.file)?;
    let writer = std::io::stdout.and(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .with(build_filter(&config.level))
        .try_init()
        .map_err(|e| DriveError::Config(format!("failed to install logger: {e}")))
}

/// Console-only logging, used when the log file cannot be opened.
pub fn init_console_only(level: &str) {
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .with(build_filter(level))
        .try_init();
}
