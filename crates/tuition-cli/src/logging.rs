//! Tracing setup.
//!
//! Log lines go to a daily-rolling file so they do not interleave with the
//! REPL; `--log-stderr` sends them to stderr instead.

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use tuition_infrastructure::TuitionPaths;

/// Installs the global subscriber.
///
/// The filter comes from `RUST_LOG`, else `default_level`. The returned guard
/// flushes the file writer and must live until exit.
pub fn init(default_level: &str, log_stderr: bool) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if log_stderr {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()?;
        return Ok(None);
    }

    let log_dir = TuitionPaths::log_dir()?;
    std::fs::create_dir_all(&log_dir)?;
    let appender = tracing_appender::rolling::daily(&log_dir, "tuition.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .try_init()?;
    Ok(Some(guard))
}
