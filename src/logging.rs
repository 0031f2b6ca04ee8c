//! File-based logging
//!
//! The TUI owns the terminal, so tracing output goes to a daily rolling file
//! instead of stdout.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::{LogConfig, DEFAULT_LOG_FILTER};

const LOG_FILE_PREFIX: &str = "spotify-nowplaying";

/// Initialize the logging system.
///
/// Logs go to `<dir>/spotify-nowplaying.YYYY-MM-DD.log`. The returned guard
/// flushes buffered lines when dropped, so keep it alive until exit.
pub fn init_logging(config: &LogConfig) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(&config.dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &config.dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_new(&config.filter).or_else(|e| {
        eprintln!("Warning: Invalid log filter {:?} ({}), using defaults", config.filter, e);
        EnvFilter::try_new(DEFAULT_LOG_FILTER)
    })?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_span_events(FmtSpan::CLOSE),
        )
        .try_init()?;

    tracing::info!(dir = %config.dir.display(), filter = %config.filter, "Logging initialized");
    Ok(guard)
}

/// Log the result of a Spotify API request
#[macro_export]
macro_rules! log_api_result {
    ($operation:expr, $result:expr) => {
        match &$result {
            Ok(_) => tracing::info!(operation = $operation, "API request successful"),
            Err(e) => tracing::error!(operation = $operation, error = %e, "API request failed"),
        }
    };
}
