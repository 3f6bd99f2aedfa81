use std::path::Path;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

const LOG_FILE_PREFIX: &str = "affect-tutor.log";

/// Flushes the file writer when dropped.
pub struct FileLogGuard {
    _guard: WorkerGuard,
}

/// Installs the global subscriber. Console output goes to stderr; stdout
/// carries the replay report.
pub fn init_tracing(config: &Config) -> Option<FileLogGuard> {
    let env_filter =
        EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let console_layer = fmt::layer().with_target(true).with_writer(std::io::stderr);

    let (file_layer, guard) = match config.log_dir.as_deref().map(open_log_file) {
        Some(Ok((writer, guard))) => (
            Some(fmt::layer().with_writer(writer).with_ansi(false)),
            Some(FileLogGuard { _guard: guard }),
        ),
        Some(Err(err)) => {
            eprintln!("file logging disabled: {err}");
            (None, None)
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    guard
}

fn open_log_file(dir: &Path) -> std::io::Result<(NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(dir)?;
    let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
    Ok(tracing_appender::non_blocking(appender))
}
