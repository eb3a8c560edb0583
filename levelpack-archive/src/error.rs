//! Error types for the archive crate.

use levelpack_storage::StorageError;
use thiserror::Error;

/// Result type for archive operations.
pub type ArchiveResult<T> = Result<T, ArchiveError>;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A source file location is not under the folder being packed.
    #[error("file {0} is outside the packed folder")]
    OutsideRoot(String),

    /// Sandboxed unpack refused an entry that would leave the destination.
    #[error("entry escapes destination: {0}")]
    PathEscapes(String),

    /// Sandboxed unpack exceeded its decompressed size budget.
    #[error("archive exceeds {limit} decompressed bytes")]
    TooLarge { limit: u64 },
}
