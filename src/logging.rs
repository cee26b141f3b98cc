use crate::config::Config;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_FILE_PREFIX: &str = "cloud-registry.log";

/// Initialize logging: human-readable on stderr, plus a daily JSON file when
/// `LOG_DIR` is configured.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the life of the program.
pub fn init_logging(config: &Config) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    // stdout carries command results, so console logs go to stderr
    let console = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match &config.log_dir {
        Some(log_dir) => match std::fs::create_dir_all(log_dir) {
            Ok(()) => {
                let appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_PREFIX);
                let (non_blocking, guard) = tracing_appender::non_blocking(appender);
                let layer = fmt::layer()
                    .with_target(true)
                    .with_ansi(false)
                    .json()
                    .with_writer(non_blocking);
                (Some(layer), Some(guard))
            }
            Err(e) => {
                eprintln!(
                    "Warning: Could not create log directory {}: {}",
                    log_dir.display(),
                    e
                );
                (None, None)
            }
        },
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .init();

    tracing::debug!(
        "Logging initialized - level: {}, log directory: {:?}",
        config.log_level,
        config.log_dir
    );

    guard
}
