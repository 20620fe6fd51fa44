//! File-based tracing setup.
//!
//! The TUI owns the terminal, so log lines go to a daily rolling file under
//! the platform data directory instead of stdout/stderr.

use std::path::PathBuf;

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_PREFIX: &str = "reelview.log";

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "reelview=info,warn";

pub fn log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "reelview")
        .map(|dirs| dirs.data_local_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from(".logs"))
}

/// Install the global subscriber. The returned guard flushes buffered lines
/// on drop and must live until the process exits.
pub fn init() -> Result<WorkerGuard> {
    let dir = log_dir();
    std::fs::create_dir_all(&dir)
        .wrap_err_with(|| format!("Failed to create log dir: {}", dir.display()))?;

    let appender = RollingFileAppender::new(Rotation::DAILY, &dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    tracing::info!("Logging to {}", dir.display());
    Ok(guard)
}
