//! Tracing subscriber setup
//!
//! Diagnostics go to stderr so stdout carries only command output. When the
//! log directory can be created, the same events are appended to a log file.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LOG_ENV;

/// Filter used when the log environment variable is unset or invalid
const DEFAULT_FILTER: &str = "warn";

/// Installs the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be kept alive
/// for the duration of the program.
pub fn init(log_file: Option<&Path>) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let (file_layer, guard) = match log_file.and_then(file_appender) {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(file_layer)
        .init();

    guard
}

fn file_appender(path: &Path) -> Option<RollingFileAppender> {
    let dir = path.parent()?;
    let file_name = path.file_name()?.to_str()?;
    std::fs::create_dir_all(dir).ok()?;

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir)
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_appender_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/version-catalog.log");

        assert!(file_appender(&path).is_some());
        assert!(dir.path().join("nested").is_dir());
    }

    #[test]
    fn file_appender_rejects_path_without_file_name() {
        assert!(file_appender(Path::new("/")).is_none());
    }
}
