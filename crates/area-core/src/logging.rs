//! File logging for the AREA client

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::Result;

/// Environment variable holding the log filter directive.
pub const LOG_ENV_VAR: &str = "AREA_LOG";

const LOG_FILE_PREFIX: &str = "area.log";

/// Route `tracing` output to a log file.
///
/// The terminal belongs to the TUI, so logs go to a daily rolling file in
/// `~/.local/share/area/logs/`. The level is controlled by `AREA_LOG`.
///
/// # Examples
/// ```bash
/// AREA_LOG=debug cargo run
/// AREA_LOG=area_api=trace cargo run
/// ```
pub fn init() -> Result<()> {
    let log_dir = log_directory();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_PREFIX);

    let env_filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new("area=info,area_app=info,area_api=info,area_tui=info,warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .init();

    tracing::info!(
        "AREA client {} starting, logging to {}",
        env!("CARGO_PKG_VERSION"),
        log_dir.display()
    );

    Ok(())
}

/// Directory under the platform data dir owned by this client.
pub fn data_directory() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("area")
}

/// Where the rolling log files are written.
pub fn log_directory() -> PathBuf {
    data_directory().join("logs")
}
