//! Operational helpers: logging setup and data directory preparation.

use std::{
    fs::OpenOptions,
    path::{Path, PathBuf},
    sync::Mutex,
};

use roshambo_types::{config::OpsConfig, Result, RoshamboError};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Where log lines should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Append to `ops.log_file` inside the data directory (falls back to
    /// stderr when no file is configured). Used while the TUI owns the terminal.
    File,
}

fn build_filter(config: &OpsConfig) -> Result<EnvFilter> {
    EnvFilter::try_new(config.log_level.clone())
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|err| ops_error(format!("failed to create log filter: {err}")))
}

pub fn init_tracing(config: &OpsConfig, data_dir: &Path, target: LogTarget) -> Result<()> {
    let filter = build_filter(config)?;

    let log_path = match (target, &config.log_file) {
        (LogTarget::File, Some(file)) => Some(data_dir.join(file)),
        _ => None,
    };

    match log_path {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|err| ops_error(format!("failed to open log file {:?}: {err}", path)))?;
            fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|err| ops_error(format!("tracing init error: {err}")))?;
        }
        None => {
            fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|err| ops_error(format!("tracing init error: {err}")))?;
        }
    }
    Ok(())
}

pub fn ensure_data_dir(path: &str) -> Result<PathBuf> {
    let dir = PathBuf::from(path);
    std::fs::create_dir_all(&dir)
        .map_err(|err| ops_error(format!("failed to create data dir: {err}")))?;
    info!("Data directory ready at {:?}", dir);
    Ok(dir)
}

pub fn ops_error(message: impl Into<String>) -> RoshamboError {
    RoshamboError::Ops(message.into())
}
