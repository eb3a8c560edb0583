//! Error types for package loading.

use levelpack_storage::StorageError;
use levelpack_sync::SyncError;
use levelpack_types::SchemaError;
use thiserror::Error;

/// Result type for loader operations.
pub type LoaderResult<T> = Result<T, LoaderError>;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    /// No image file matches the requested name.
    #[error("image not found: {0}")]
    ImageNotFound(String),

    /// The local root holds no package after synchronization.
    #[error("no level package installed")]
    NoPackages,
}
