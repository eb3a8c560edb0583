//! Local filesystem storage backing.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, info};

use crate::{Storage, StorageError, StoragePath, StorageResult};

/// A folder on the local filesystem.
///
/// The folder is created on construction if it does not exist yet.
#[derive(Debug, Clone)]
pub struct FsStorage {
    path: PathBuf,
    location: StoragePath,
}

impl FsStorage {
    /// Opens the folder at `path`, creating it and its parents if absent.
    pub async fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();
        let location = StoragePath::from_path(&path);

        if fs::metadata(&path).await.is_err() {
            fs::create_dir_all(&path)
                .await
                .map_err(|e| StorageError::io(location.clone(), e))?;
            info!("Created storage folder: {:?}", path);
        }

        Ok(Self { path, location })
    }

    /// Opens the application-private root folder for `app_name`.
    ///
    /// Resolves to `$XDG_DATA_HOME/<app_name>` when set, otherwise
    /// `$HOME/.local/share/<app_name>`.
    pub async fn app_root(app_name: &str) -> StorageResult<Self> {
        let base = match std::env::var_os("XDG_DATA_HOME") {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => {
                let home = std::env::var_os("HOME").ok_or_else(|| {
                    StorageError::NoDataDir("HOME environment variable not set".to_string())
                })?;
                PathBuf::from(home).join(".local").join("share")
            }
        };
        Self::open(base.join(app_name)).await
    }

    /// Filesystem path of this folder.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn entries(&self, dirs: bool) -> StorageResult<Vec<StoragePath>> {
        let mut read_dir = fs::read_dir(&self.path)
            .await
            .map_err(|e| StorageError::io(self.location.clone(), e))?;

        let mut found = Vec::new();
        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| StorageError::io(self.location.clone(), e))?
        {
            let path = entry.path();
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| StorageError::io(StoragePath::from_path(&path), e))?;

            if dirs {
                let hidden = entry.file_name().to_string_lossy().starts_with('.');
                if file_type.is_dir() && !hidden {
                    found.push(StoragePath::from_path(&path));
                }
            } else if !file_type.is_dir() {
                found.push(StoragePath::from_path(&path));
            }
        }

        found.sort();
        Ok(found)
    }
}

#[async_trait]
impl Storage for FsStorage {
    fn location(&self) -> &StoragePath {
        &self.location
    }

    async fn list_files(&self) -> StorageResult<Vec<StoragePath>> {
        self.entries(false).await
    }

    async fn list_subfolder_locations(&self) -> StorageResult<Vec<StoragePath>> {
        self.entries(true).await
    }

    async fn subfolder(&self, name: &str) -> StorageResult<Box<dyn Storage>> {
        Ok(Box::new(Self::open(self.path.join(name)).await?))
    }

    async fn subfolder_at(&self, location: &StoragePath) -> StorageResult<Box<dyn Storage>> {
        Ok(Box::new(Self::open(PathBuf::from(location.as_str())).await?))
    }

    async fn read_file(&self, name: &str) -> StorageResult<Vec<u8>> {
        let path = self.path.join(name);
        debug!("Reading {:?}", path);
        fs::read(&path)
            .await
            .map_err(|e| StorageError::io(StoragePath::from_path(&path), e))
    }

    async fn write_file(&self, name: &str, data: &[u8]) -> StorageResult<()> {
        let path = self.path.join(name);
        debug!("Writing {:?} ({} bytes)", path, data.len());
        fs::write(&path, data)
            .await
            .map_err(|e| StorageError::io(StoragePath::from_path(&path), e))
    }

    async fn rename_subfolder(&self, from: &str, to: &str) -> StorageResult<()> {
        let source = self.path.join(from);
        let target = self.path.join(to);

        if fs::metadata(&target).await.is_ok() {
            return Err(StorageError::AlreadyExists(StoragePath::from_path(&target)));
        }

        fs::rename(&source, &target)
            .await
            .map_err(|e| StorageError::io(StoragePath::from_path(&source), e))
    }

    async fn remove_subfolder(&self, name: &str) -> StorageResult<()> {
        let path = self.path.join(name);
        match fs::remove_dir_all(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io(StoragePath::from_path(&path), e)),
        }
    }
}
