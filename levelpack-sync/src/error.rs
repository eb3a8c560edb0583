//! Error types for the sync layer.

use levelpack_archive::ArchiveError;
use levelpack_storage::StorageError;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur in sync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Catalog or package request failed, or returned a non-success status.
    #[error("network error: {0}")]
    Network(String),

    /// A downloaded archive is larger than the configured limit.
    #[error("package {name} exceeds {limit} bytes")]
    TooLarge { name: String, limit: u64 },

    /// Local storage error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Archive could not be unpacked.
    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// Catalog name cannot be used as a local folder name.
    #[error("invalid package name: {0:?}")]
    InvalidPackageName(String),

    /// Configuration could not be read or is invalid.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<reqwest::Error> for SyncError {
    fn from(e: reqwest::Error) -> Self {
        SyncError::Network(e.to_string())
    }
}
