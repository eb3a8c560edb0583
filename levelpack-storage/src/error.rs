//! Error types for the storage layer.

use thiserror::Error;

use crate::StoragePath;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// File or folder does not exist.
    #[error("not found: {0}")]
    NotFound(StoragePath),

    /// IO error on the backing.
    #[error("IO error at {path}: {source}")]
    Io {
        path: StoragePath,
        #[source]
        source: std::io::Error,
    },

    /// The backing does not accept writes.
    #[error("storage is read-only: {0}")]
    ReadOnly(StoragePath),

    /// A folder rename would overwrite an existing folder.
    #[error("already exists: {0}")]
    AlreadyExists(StoragePath),

    /// File content is not valid UTF-8 text.
    #[error("invalid UTF-8 text: {0}")]
    InvalidUtf8(StoragePath),

    /// The archive backing could not be opened.
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// The application data directory could not be determined.
    #[error("no data directory: {0}")]
    NoDataDir(String),
}

impl StorageError {
    /// Classifies an IO error, mapping `NotFound` to [`StorageError::NotFound`].
    pub(crate) fn io(path: StoragePath, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path),
            _ => Self::Io { path, source },
        }
    }

    /// Returns true if this error means the target does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
