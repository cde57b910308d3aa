//! File logging. The terminal belongs to the UI, so log lines go to
//! `<config dir>/tubeview.log` through a non-blocking writer.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::settings;

fn default_filter(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    format!("{}={level}", env!("CARGO_CRATE_NAME"))
}

/// Install the global subscriber. `RUST_LOG` wins over `verbose`.
///
/// Keep the returned guard alive for the life of the program so buffered
/// lines are flushed on exit.
pub fn init(config_dir: &Path, verbose: bool) -> Result<WorkerGuard> {
    fs::create_dir_all(config_dir)
        .with_context(|| format!("Failed to create directory {}", config_dir.display()))?;
    let log_path = settings::log_path(config_dir);
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {e}"))?;

    if verbose {
        eprintln!("Logging to {}", log_path.display());
    }
    Ok(guard)
}
