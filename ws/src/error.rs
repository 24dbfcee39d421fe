//! Store and slot error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a durable slot
#[derive(Debug, Error)]
pub enum SlotError {
    #[error("Failed to read slot {key}: {source}")]
    Read {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write slot {key}: {source}")]
    Write {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid slot key: {0:?}")]
    InvalidKey(String),

    #[error("Slot directory unavailable: {path}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by the persisted collection store
#[derive(Debug, Error)]
pub enum StoreError {
    /// The slot held a value that is not a serialized collection.
    /// Recovered during hydration; never returned from `open` or `reload`.
    #[error("Failed to parse slot {key}: {source}")]
    Hydration {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize collection: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Failed to persist collection: {0}")]
    Persistence(#[from] SlotError),
}

impl StoreError {
    /// Check if this error was recovered locally rather than surfaced
    pub fn is_recoverable(&self) -> bool {
        matches!(self, StoreError::Hydration { .. })
    }
}

/// Result alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
