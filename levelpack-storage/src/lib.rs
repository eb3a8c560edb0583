//! Storage capability for levelpack.
//!
//! A [`Storage`] is one folder in a hierarchical file namespace. The same
//! interface is served by two backings:
//! - [`FsStorage`]: a folder on the local filesystem (write-capable)
//! - [`ArchiveStorage`]: a read-only view into a zip archive held in memory
//!
//! Every file and folder is addressed by a [`StoragePath`], the fully
//! qualified location string of the backing.

mod archive;
mod error;
mod fs;
mod path;

pub use archive::ArchiveStorage;
pub use error::{StorageError, StorageResult};
pub use fs::FsStorage;
pub use path::StoragePath;

use async_trait::async_trait;

/// Abstract hierarchical folder interface.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Fully qualified location of this folder.
    fn location(&self) -> &StoragePath;

    /// Lists the files directly inside this folder, sorted by location.
    async fn list_files(&self) -> StorageResult<Vec<StoragePath>>;

    /// Lists the locations of the child folders, sorted. Hidden folders
    /// (names starting with `.`) are not reported.
    async fn list_subfolder_locations(&self) -> StorageResult<Vec<StoragePath>>;

    /// Returns the named child folder. Write-capable backings create it
    /// when absent; read-only backings fail with [`StorageError::NotFound`].
    async fn subfolder(&self, name: &str) -> StorageResult<Box<dyn Storage>>;

    /// Returns the folder at a fully qualified location.
    async fn subfolder_at(&self, location: &StoragePath) -> StorageResult<Box<dyn Storage>>;

    /// Reads the whole content of the named file.
    async fn read_file(&self, name: &str) -> StorageResult<Vec<u8>>;

    /// Creates or truncates the named file and writes `data` into it.
    async fn write_file(&self, name: &str, data: &[u8]) -> StorageResult<()>;

    /// Renames a child folder. Fails if `to` already exists.
    async fn rename_subfolder(&self, from: &str, to: &str) -> StorageResult<()>;

    /// Removes a child folder and its content. Absent folders are ignored.
    async fn remove_subfolder(&self, name: &str) -> StorageResult<()>;

    /// Reads the named file and decodes it as UTF-8.
    async fn read_text(&self, name: &str) -> StorageResult<String> {
        let bytes = self.read_file(name).await?;
        String::from_utf8(bytes).map_err(|_| StorageError::InvalidUtf8(self.location().join(name)))
    }
}
