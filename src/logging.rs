// SPDX-License-Identifier: MIT
//
// Log setup.
//
// The terminal is in raw mode for the whole session, so log lines can never
// go to stdout or stderr. They go to a file through a non-blocking writer;
// the returned guard flushes it when dropped.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

/// Install the global subscriber if logging is configured.
///
/// # Errors
///
/// Fails on an invalid filter directive, a log path with no file name, or
/// if a subscriber is already installed.
pub fn init(config: Option<&LogConfig>) -> Result<Option<WorkerGuard>> {
    let Some(config) = config else {
        return Ok(None);
    };

    let filter = EnvFilter::try_new(&config.filter)
        .with_context(|| format!("invalid log filter {:?}", config.filter))?;

    let dir = config
        .file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = config
        .file
        .file_name()
        .with_context(|| format!("log file {} has no file name", config.file.display()))?;

    let appender = tracing_appender::rolling::never(dir, name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("install log subscriber: {e}"))?;

    Ok(Some(guard))
}
