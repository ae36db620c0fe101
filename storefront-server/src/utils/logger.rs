//! Logging Infrastructure
//!
//! Structured logging via tracing: env-filtered stdout output everywhere,
//! plus a daily-rotating file appender when a log directory is given.

use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the logging system. The returned guard must be kept alive
/// for the lifetime of the process or buffered file output is dropped.
pub fn init_logger(environment: &str, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer().with_target(environment != "production");

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            if let Err(e) = fs::create_dir_all(dir) {
                eprintln!("failed to create log directory {}: {e}", dir.display());
                (None, None)
            } else {
                let appender = RollingFileAppender::new(Rotation::DAILY, dir, "app.log");
                let (writer, guard) = tracing_appender::non_blocking(appender);
                let layer = fmt::layer().with_writer(writer).with_ansi(false);
                (Some(layer), Some(guard))
            }
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    guard
}
