//! Error types for the orchestration core.
//!
//! None of these cross the consumer boundary as panics: refresh failures end
//! up as a [`RefreshStatus`](crate::poll::RefreshStatus) string and watch
//! failures end up as a log line plus an un-watched root.

use std::path::PathBuf;
use thiserror::Error;

/// Failure reported by a [`RemoteSource`](crate::source::RemoteSource).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    /// A required setting is absent from the config store.
    #[error("configuration missing: {0}")]
    ConfigMissing(String),

    /// Transport-level failure: timeout, unreachable host, unreadable export.
    #[error("{0}")]
    Network(String),

    /// The remote rejected the credentials.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The response could not be decoded.
    #[error("invalid payload: {0}")]
    Payload(String),
}

impl SourceError {
    /// `true` for failures the next tick may recover from on its own.
    pub fn is_transient(&self) -> bool {
        !matches!(self, Self::ConfigMissing(_))
    }
}

/// Failure while setting up an OS filesystem watch.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("failed to create watcher: {0}")]
    Create(#[from] notify::Error),

    #[error("failed to watch {path}: {source}")]
    Watch {
        path: PathBuf,
        source: notify::Error,
    },

    #[error("failed to start debounce thread: {0}")]
    Thread(std::io::Error),
}

/// Failure while loading the on-disk config store.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("config {path} is not a flat JSON object: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}
