//! File logging bootstrap.
//!
//! Logs go to `<data_dir>/logs/tally*.log`, rotated by size. Initialisation
//! happens at most once per process; later calls are no-ops. Log lines are
//! `key=value` events and never carry task text.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};

const LOG_FILE_BASENAME: &str = "tally";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

static LOGGER: OnceLock<Mutex<Option<LoggerHandle>>> = OnceLock::new();

/// Error type for logger setup
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("could not create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid log level `{level}`: {source}")]
    Level {
        level: String,
        source: flexi_logger::FlexiLoggerError,
    },
    #[error("could not start logger: {0}")]
    Start(#[from] flexi_logger::FlexiLoggerError),
}

/// Directory holding the log files for a data directory
pub fn log_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("logs")
}

/// Start file logging under `data_dir/logs` at `level` (a flexi_logger spec
/// such as `"info"` or `"debug, tally::io=trace"`).
pub fn init_logging(level: &str, data_dir: &Path) -> Result<(), LoggingError> {
    let slot = LOGGER.get_or_init(|| Mutex::new(None));
    let mut active = slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if active.is_some() {
        return Ok(());
    }

    let dir = log_dir(data_dir);
    std::fs::create_dir_all(&dir).map_err(|e| LoggingError::CreateDir {
        path: dir.clone(),
        source: e,
    })?;

    let handle = Logger::try_with_str(level)
        .map_err(|e| LoggingError::Level {
            level: level.to_string(),
            source: e,
        })?
        .log_to_file(
            FileSpec::default()
                .directory(dir.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()?;

    log::info!(
        "event=app_start version={} level={} log_dir={}",
        env!("CARGO_PKG_VERSION"),
        level,
        dir.display()
    );

    *active = Some(handle);
    Ok(())
}

/// Flush buffered log lines and stop the logger. Call before exiting.
pub fn shutdown_logging() {
    let Some(slot) = LOGGER.get() else {
        return;
    };
    let mut active = slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(handle) = active.take() {
        handle.shutdown();
    }
}
