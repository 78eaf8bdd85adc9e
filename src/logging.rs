//! Tracing setup.
//!
//! The terminal is owned by the UI, so logs only go to a file, and only when
//! `logging.file` is configured. `RUST_LOG` wins over `logging.level`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingSettings;

/// Install the global subscriber. Keep the returned guard alive for the whole
/// run; dropping it flushes and stops the background writer.
pub fn init(settings: &LoggingSettings) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error>> {
    let Some(path) = settings.file.as_deref() else {
        return Ok(None);
    };
    let (dir, file_name) = split_log_path(path).ok_or("logging.file must name a file")?;
    std::fs::create_dir_all(&dir)?;

    let filter = match EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => EnvFilter::try_new(&settings.level)?,
    };

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_level(true),
        )
        .try_init()?;

    Ok(Some(guard))
}

fn split_log_path(path: &Path) -> Option<(PathBuf, OsString)> {
    let file_name = path.file_name()?.to_os_string();
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Some((dir, file_name))
}
