//! Configuration data model

use std::path::PathBuf;
use std::time::Duration;

/// Default GlazeWM IPC endpoint
pub const DEFAULT_ENDPOINT: &str = "ws://127.0.0.1:6123";

/// Default delay between connection attempts (5 seconds)
pub const DEFAULT_RETRY_DELAY_MS: u64 = 5_000;

/// Default bound on connection establishment (10 seconds)
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 10_000;

/// File name of the log sink placed next to the daemon executable
pub const DEFAULT_LOG_FILE_NAME: &str = "autotile.log";

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// WebSocket URL of the GlazeWM IPC server
    pub endpoint: String,
    /// Fixed delay between connection attempts, in milliseconds
    pub retry_delay_ms: u64,
    /// Bound on a single dial + handshake, in milliseconds
    pub connect_timeout_ms: u64,
    pub log_level: LogLevel,
    /// Explicit log file. `None` means `autotile.log` beside the executable.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            log_level: LogLevel::Info,
            log_file: None,
        }
    }
}

impl Config {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(format!("Unknown log level: {}", s)),
        }
    }
}
