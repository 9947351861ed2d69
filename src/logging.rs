use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Log file location. The terminal is owned by the UI, so nothing goes to
/// stdout or stderr while it runs.
pub fn log_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("retype")
}

/// Installs a file subscriber. `RUST_LOG` wins over the configured level.
/// Keep the returned guard alive until exit so buffered lines get flushed.
pub fn init(level: &str) -> Result<WorkerGuard> {
    let dir = log_dir();
    fs::create_dir_all(&dir)?;

    let appender = tracing_appender::rolling::never(&dir, "retype.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))?;
    Ok(guard)
}
