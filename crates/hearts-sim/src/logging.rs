use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::Level;
use tracing_appender::non_blocking::{self, WorkerGuard};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::config::LoggingConfig;

/// Keeps the JSON writer flushing until the run ends.
pub struct LoggingGuard {
    _guard: Option<WorkerGuard>,
    pub json_path: Option<PathBuf>,
}

/// Compact text events on stderr, plus JSON lines in `logging.json_file`
/// when one is configured. `RUST_LOG` takes precedence over the configured
/// level.
pub fn init_logging(logging: &LoggingConfig) -> Result<LoggingGuard> {
    let level = logging.level().unwrap_or(Level::WARN);
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()))
    };

    let stderr_layer = fmt::layer()
        .compact()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(filter());

    let (json_layer, guard, json_path) = match logging.json_file.as_deref() {
        Some(path) => {
            let file = create_log_file(path)?;
            let (writer, guard) = non_blocking::NonBlockingBuilder::default()
                .lossy(false)
                .finish(file);
            let layer = fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_events(FmtSpan::NONE)
                .with_writer(writer)
                .with_filter(filter());
            (Some(layer), Some(guard), Some(path.to_path_buf()))
        }
        None => (None, None, None),
    };

    // A global subscriber may already exist, e.g. when tests share a process.
    let _ = tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .try_init();

    Ok(LoggingGuard {
        _guard: guard,
        json_path,
    })
}

fn create_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory at {}", parent.display()))?;
    }
    File::create(path).with_context(|| format!("creating log file at {}", path.display()))
}
