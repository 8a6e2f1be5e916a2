use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use anyhow::{Context, Result};

/// Initializes the `tracing` subscriber for the accessory
///
/// Console output is always on. When a directory is given, the same events are also written to
/// `garage-door_<date>.log` in that directory through a non-blocking writer.
/// The filter comes from `RUST_LOG`, then from `default_level`, then falls back to "info".
///
/// # Arguments
///
/// * `log_file_path`: Directory for the log file, if file logging is wanted
/// * `default_level`: Filter directive used when `RUST_LOG` is not set
///
/// # Returns
///
/// * `Ok(Some(WorkerGuard))`: File logging is active; the guard must outlive the process's logging
/// * `Ok(None)`: Console only
/// * `Err(anyhow::Error)`: Bad filter directive, unwritable directory or a subscriber already installed
pub fn init_logger(log_file_path: Option<PathBuf>, default_level: Option<&str>) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level.unwrap_or("info")))
        .context("Invalid log filter")?;

    let event_format = fmt::format()
        .with_timer(fmt::time::LocalTime::rfc_3339())
        .compact()
        .with_target(false)
        .with_file(true)
        .with_line_number(true);

    let console_layer = fmt::layer()
        .event_format(event_format.clone().with_ansi(true))
        .with_writer(std::io::stdout);

    let (file_writer, guard) = match log_file_path.as_deref() {
        Some(dir) => {
            let (writer, guard) = file_writer(dir)?;
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };
    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .event_format(event_format.with_ansi(false))
            .with_writer(writer)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install the tracing subscriber")?;

    match &log_file_path {
        Some(dir) => tracing::info!("Logging to console and {:?}", dir),
        None => tracing::info!("Logging to console only"),
    }
    Ok(guard)
}

fn file_writer(dir: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {:?}", dir))?;

    let file_name = format!("garage-door_{}.log", chrono::Local::now().format("%Y-%m-%d"));
    let appender = RollingFileAppender::new(Rotation::NEVER, dir, file_name);
    Ok(tracing_appender::non_blocking(appender))
}
