//! Run logging: console plus a timestamped log file per invocation
//!
//! Every lifecycle event (step start, command line, completion or failure,
//! elapsed seconds) is a `tracing` event, so the log file doubles as the
//! persisted run record.

use crate::error::PipelineError;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing::error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Keeps the file writer flushing; drop it only when the process is done logging
pub struct LogHandle {
    pub path: PathBuf,
    _guard: WorkerGuard,
}

/// Log a fatal error with its cause, plus the steps that failed, if any
pub fn report_failure(error: &PipelineError, failed_steps: &[String]) {
    error!("Pipeline execution failed: {}", error);
    if !failed_steps.is_empty() {
        error!("Failed steps: {}", failed_steps.join(", "));
    }
}

/// Log file name for a run started at `now`
pub fn log_file_name(now: DateTime<Local>) -> String {
    format!("metapipeline_{}.log", now.format("%Y%m%d_%H%M%S"))
}

/// Install the global subscriber.
///
/// `RUST_LOG` overrides the level; otherwise `info`, or `debug` when verbose.
pub fn init(log_dir: &Path, verbose: bool) -> Result<LogHandle> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("create log directory {}", log_dir.display()))?;

    let file_name = log_file_name(Local::now());
    let path = log_dir.join(&file_name);
    let appender = tracing_appender::rolling::never(log_dir, &file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer),
        )
        .try_init()
        .context("Failed to set logging subscriber")?;

    Ok(LogHandle {
        path,
        _guard: guard,
    })
}
