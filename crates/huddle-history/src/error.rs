//! Error types for history storage.

use thiserror::Error;

/// Errors returned by document stores and history operations.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// The stored version moved since it was read.
    #[error("write conflict on {key} (expected={expected:?}, found={found:?})")]
    Conflict {
        key: String,
        expected: Option<u64>,
        found: Option<u64>,
    },
    /// Every attempt of a bounded retry loop failed.
    #[error("history write failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<HistoryError>,
    },
    /// Backend temporarily unreachable.
    #[error("history backend unavailable: {0}")]
    Unavailable(String),
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Store could not be built from configuration.
    #[error("invalid history configuration: {0}")]
    Config(String),
}

impl HistoryError {
    /// Whether a fresh read followed by another write may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            HistoryError::Conflict { .. } | HistoryError::Unavailable(_) | HistoryError::Io(_)
        )
    }
}
