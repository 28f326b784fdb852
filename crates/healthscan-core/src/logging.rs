//! File logging for the shell.
//!
//! The full-screen UI owns stdout, so diagnostics go to a log file through a
//! non-blocking writer. The returned guard must live until exit or buffered
//! lines are lost.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Environment variable that overrides the configured log filter.
pub const LOG_ENV_VAR: &str = "HEALTHSCAN_LOG";

/// Builds the filter: `HEALTHSCAN_LOG` first, then the configured level.
pub fn build_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initializes the global subscriber writing to `dir/<config.file>`.
///
/// A second call in the same process keeps the first subscriber.
pub fn init_file_logging(dir: &Path, config: &LoggingConfig) -> Result<WorkerGuard> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, &config.file);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(config))
        .with_ansi(false)
        .with_target(false)
        .with_writer(writer)
        .try_init();

    Ok(guard)
}
