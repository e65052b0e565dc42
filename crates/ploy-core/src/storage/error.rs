//! Storage error handling
//!
//! Provides typed errors for storage operations with descriptive messages
//! and recovery suggestions.

use std::io;
use thiserror::Error;

use crate::document::DocumentError;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// The medium rejected a write for size reasons
    #[error(
        "Storage quota exceeded while writing '{key}'. Export a backup and prune old data, then try again."
    )]
    QuotaExceeded {
        key: String,
        #[source]
        source: io::Error,
    },

    /// Any other write failure; the save did not happen
    #[error("Failed to write '{key}': {source}")]
    WriteFailed {
        key: String,
        #[source]
        source: io::Error,
    },

    /// A slot could not be read
    #[error("Failed to read '{key}': {source}")]
    ReadFailed {
        key: String,
        #[source]
        source: io::Error,
    },

    /// The document could not be serialized or failed validation
    #[error(transparent)]
    Document(#[from] DocumentError),
}

impl StorageError {
    /// Create a write error from an I/O error with key context
    ///
    /// Classifies the error based on its kind and message.
    pub fn from_write(error: io::Error, key: &str) -> Self {
        if is_quota_error(&error) {
            StorageError::QuotaExceeded {
                key: key.to_string(),
                source: error,
            }
        } else {
            StorageError::WriteFailed {
                key: key.to_string(),
                source: error,
            }
        }
    }

    /// Create a read error from an I/O error with key context
    pub fn from_read(error: io::Error, key: &str) -> Self {
        StorageError::ReadFailed {
            key: key.to_string(),
            source: error,
        }
    }

    /// Check if the user can act on this error and retry
    pub fn is_recoverable(&self) -> bool {
        matches!(self, StorageError::QuotaExceeded { .. })
    }

    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            StorageError::QuotaExceeded { .. } => Some(
                "Export a backup with `ploy export json`, then delete finished projects or old entries.",
            ),
            StorageError::WriteFailed { .. } | StorageError::ReadFailed { .. } => {
                Some("Check that the data directory exists and is writable.")
            }
            StorageError::Document(_) => None,
        }
    }
}

/// Check if an I/O error indicates the medium is full
fn is_quota_error(error: &io::Error) -> bool {
    if error.kind() == io::ErrorKind::StorageFull {
        return true;
    }
    let msg = error.to_string().to_lowercase();
    msg.contains("quota exceeded")
        || msg.contains("no space left")
        || msg.contains("disk full")
        || msg.contains("not enough space")
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
