//! Logging initialization.
//!
//! Wizard mode: logs to `<data dir>/logs/journey-{datetime}.log`
//! Other commands: logs to stderr

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Keep alive for the duration of the program so buffered logs get flushed.
pub struct LoggingHandle {
    pub _guard: Option<WorkerGuard>,
    pub log_file_path: Option<PathBuf>,
}

pub fn logs_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("logs")
}

pub fn log_file_name(now: DateTime<Utc>) -> String {
    format!("journey-{}.log", now.format("%Y%m%dT%H%M%SZ"))
}

/// `to_file` is set for the interactive wizard so log lines never land on
/// the terminal it draws on.
pub fn init_logging(data_dir: &Path, to_file: bool, verbose: bool) -> Result<LoggingHandle> {
    let level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| level.to_string()),
    );

    if to_file {
        let dir = logs_dir(data_dir);
        std::fs::create_dir_all(&dir)?;
        let file_name = log_file_name(Utc::now());
        let log_file_path = dir.join(&file_name);

        let appender = tracing_appender::rolling::never(&dir, &file_name);
        let (writer, guard) = tracing_appender::non_blocking(appender);

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(writer),
            )
            .init();

        Ok(LoggingHandle {
            _guard: Some(guard),
            log_file_path: Some(log_file_path),
        })
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();

        Ok(LoggingHandle {
            _guard: None,
            log_file_path: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn test_logs_dir_under_data_dir() {
        let temp_dir = TempDir::new().unwrap();
        let dir = logs_dir(temp_dir.path());
        assert!(dir.ends_with("logs"));
        assert!(dir.starts_with(temp_dir.path()));
    }

    #[test]
    fn test_log_file_name_format() {
        let now = Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap();
        assert_eq!(log_file_name(now), "journey-20260314T092653Z.log");
    }
}
