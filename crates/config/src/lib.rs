//! # Configuration
//!
//! Loads the handful of environment variables the storage engine cares
//! about and initializes the process-wide `tracing` subscriber from them.
//!
//! No library crate in this workspace installs a subscriber itself —
//! only this crate and the demo binary that calls it do, so that
//! `engine`/`wal`/`sstable`/`memtable` stay usable as embedded libraries
//! without fighting a host application's own logging setup.

use std::env;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_BASE_PATH: &str = "spruce_data";
pub const DEFAULT_LOG_LEVEL: &str = "INFO";
pub const DEFAULT_LOG_FORMAT: &str = "%(asctime)s - %(name)s - %(levelname)s - %(message)s";

const ENV_BASE_PATH: &str = "SPRUCE_BASE_PATH";
const ENV_LOG_LEVEL: &str = "SPRUCE_LOG_LEVEL";
const ENV_LOG_FORMAT: &str = "SPRUCE_LOG_FORMAT";
const ENV_LOG_FILE: &str = "SPRUCE_LOG_FILE";

/// Process configuration loaded from the `SPRUCE_*` environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory the engine stores everything under.
    pub base_path: String,
    /// `tracing` level filter, e.g. `"INFO"`, `"DEBUG"`.
    pub log_level: String,
    /// Kept for parity with the documented configuration surface;
    /// `tracing-subscriber`'s formatter is structural rather than
    /// printf-based, so this is informational only — the installed
    /// subscriber always emits timestamp, target, level, and message, which
    /// is what the default pattern describes anyway.
    pub log_format: String,
    /// Optional path to additionally log to, alongside stdout.
    pub log_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_path: DEFAULT_BASE_PATH.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_format: DEFAULT_LOG_FORMAT.to_string(),
            log_file: None,
        }
    }
}

impl Config {
    /// Reads the `SPRUCE_*` environment variables, falling back to the
    /// documented defaults for any that are unset.
    pub fn from_env() -> Self {
        Config {
            base_path: env::var(ENV_BASE_PATH).unwrap_or_else(|_| DEFAULT_BASE_PATH.to_string()),
            log_level: env::var(ENV_LOG_LEVEL)
                .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
                .to_uppercase(),
            log_format: env::var(ENV_LOG_FORMAT).unwrap_or_else(|_| DEFAULT_LOG_FORMAT.to_string()),
            log_file: env::var(ENV_LOG_FILE).ok(),
        }
    }

    /// Installs the global `tracing` subscriber per this configuration:
    /// stdout always, plus `log_file` if one is set and can be opened.
    /// If `log_file` is set but can't be opened, falls back to stdout-only
    /// logging and emits a warning explaining why.
    ///
    /// Returns a [`WorkerGuard`] for the file writer, if one was
    /// installed; callers must keep it alive for the process lifetime or
    /// buffered log lines can be lost on exit.
    pub fn init_logging(&self) -> Option<WorkerGuard> {
        let filter = EnvFilter::try_new(&self.log_level)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

        match &self.log_file {
            Some(path) => match std::fs::OpenOptions::new().create(true).append(true).open(path) {
                Ok(file) => {
                    let (non_blocking, guard) = tracing_appender::non_blocking(file);
                    tracing_subscriber::fmt()
                        .with_env_filter(filter)
                        .with_writer(non_blocking)
                        .init();
                    Some(guard)
                }
                Err(e) => {
                    tracing_subscriber::fmt().with_env_filter(filter).init();
                    tracing::warn!(path = %path, error = %e, "failed to open log file, falling back to stdout only");
                    None
                }
            },
            None => {
                tracing_subscriber::fmt().with_env_filter(filter).init();
                None
            }
        }
    }
}
