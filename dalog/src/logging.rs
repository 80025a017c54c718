//! Logging initialization
//!
//! Stdout formatting plus an optional daily-rolling log file under the data
//! directory. The filter comes from `DALOG_LOG_LEVEL` (or `RUST_LOG`).

use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::common::error::{CommonError, CommonResult};
use crate::config::{data_dir, get_env_with_fallback, get_env_with_fallback_or};

/// Default filter directive
const DEFAULT_LOG_LEVEL: &str = "info";

/// File name prefix for rolled log files
const LOG_FILE_PREFIX: &str = "dalog.log";

/// Keeps the non-blocking file writer alive for the lifetime of the process.
static FILE_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

/// Build the env filter from `DALOG_LOG_LEVEL`, falling back to `RUST_LOG`.
pub fn build_filter() -> EnvFilter {
    let directive = get_env_with_fallback_or("DALOG_LOG_LEVEL", "RUST_LOG", DEFAULT_LOG_LEVEL);
    EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
}

/// Directory for log files, or `None` when file logging is disabled.
///
/// `DALOG_LOG_FILE=off` disables it; any other value is used as the directory.
pub fn log_dir() -> Option<PathBuf> {
    match get_env_with_fallback("DALOG_LOG_FILE", "LOG_FILE") {
        Some(value) if is_disabled(&value) => None,
        Some(value) if !value.trim().is_empty() => Some(PathBuf::from(value)),
        _ => Some(data_dir().join("logs")),
    }
}

fn is_disabled(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "off" | "0" | "false" | "no" | "none"
    )
}

/// Install the global subscriber.
///
/// Fails if a subscriber is already installed or the log directory cannot be created.
pub fn init() -> CommonResult<()> {
    init_with(log_dir().as_deref())
}

fn init_with(dir: Option<&Path>) -> CommonResult<()> {
    let file_layer = match dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|e| {
                CommonError::Config(format!(
                    "Failed to create log directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = FILE_GUARD.set(guard);
            Some(fmt::layer().with_ansi(false).with_writer(writer))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(build_filter())
        .with(fmt::layer().with_target(true))
        .with(file_layer)
        .try_init()
        .map_err(|e| CommonError::Config(format!("Failed to initialize logging: {}", e)))
}
