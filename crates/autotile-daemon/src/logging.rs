//! Log sink setup
//!
//! The daemon runs detached from any terminal, so diagnostics go to an
//! append-only file opened once at startup. Unless configured otherwise the
//! file is `autotile.log` next to the executable.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use autotile_config::{LogLevel, DEFAULT_LOG_FILE_NAME};
use tracing_subscriber::EnvFilter;

/// Resolve the log file path: explicit setting first, then beside the executable
pub fn resolve_log_path(configured: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = configured {
        return Some(path.to_path_buf());
    }

    let exe = std::env::current_exe().ok()?;
    exe.parent().map(|dir| dir.join(DEFAULT_LOG_FILE_NAME))
}

/// Open a log file for appending, creating it if needed
pub fn open_log_file(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn env_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()))
}

/// Install the global subscriber
///
/// Logs go to `sink` when given, otherwise to stderr. `RUST_LOG` takes
/// precedence over the configured level.
pub fn init(level: LogLevel, sink: Option<File>) {
    match sink {
        Some(file) => tracing_subscriber::fmt()
            .with_env_filter(env_filter(level))
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init(),
        None => tracing_subscriber::fmt()
            .with_env_filter(env_filter(level))
            .with_writer(io::stderr)
            .init(),
    }
}

/// A stderr subscriber for the short window before the real sink exists
pub fn bootstrap_subscriber() -> impl tracing::Subscriber + Send + Sync {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(LogLevel::Warn))
        .with_writer(io::stderr)
        .finish()
}
