use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::Level;
use tracing_appender::non_blocking::{self, WorkerGuard};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LoggingConfig;

/// Keeps the JSON file writer flushing until dropped.
pub struct LoggingGuard {
    _guard: WorkerGuard,
    pub json_path: PathBuf,
}

/// Installs the global subscriber: human-readable lines on stderr and, when
/// configured, one JSON object per event in `logging.json_file`.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(logging: &LoggingConfig) -> Result<Option<LoggingGuard>> {
    let level = logging.level().unwrap_or(Level::WARN);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    let (json, guard) = match logging.json_file.as_deref() {
        Some(path) => {
            let (writer, guard) = json_file_writer(path)?;
            let layer = fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_events(FmtSpan::NONE)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    // Ignore error if a global subscriber is already set (e.g., when running in tests)
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(json)
        .try_init();

    Ok(guard.map(|guard| LoggingGuard {
        _guard: guard,
        json_path: logging.json_file.clone().unwrap_or_default(),
    }))
}

fn json_file_writer(path: &Path) -> Result<(non_blocking::NonBlocking, WorkerGuard)> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating log directory at {}", dir.display()))?;
    }
    let file = File::create(path)
        .with_context(|| format!("creating log file at {}", path.display()))?;

    Ok(non_blocking::NonBlockingBuilder::default()
        .lossy(false)
        .finish(file))
}
