//! Read-only storage view over a zip archive.

use std::collections::BTreeMap;
use std::io::{Cursor, Read};
use std::sync::Arc;

use async_trait::async_trait;
use zip::ZipArchive;

use crate::{Storage, StorageError, StoragePath, StorageResult};

const SCHEME: &str = "archive://";

/// A folder inside a zip archive.
///
/// All entries are decompressed once on [`ArchiveStorage::open`] and shared
/// between the views of the same archive. Entry names are normalized to
/// forward slashes, so archives written with either separator convention
/// resolve the same way. Folders are never created and writes always fail.
#[derive(Debug, Clone)]
pub struct ArchiveStorage {
    label: Arc<str>,
    entries: Arc<BTreeMap<String, Vec<u8>>>,
    /// Entry-name prefix of this folder: `""` at the root, else `"dir/"`.
    prefix: String,
    location: StoragePath,
}

impl ArchiveStorage {
    /// Opens the root folder of the archive in `bytes`. `label` names the
    /// archive in the locations this view reports.
    pub fn open(label: &str, bytes: Vec<u8>) -> StorageResult<Self> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut entries = BTreeMap::new();

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().replace('\\', "/").trim_start_matches('/').to_string();
            let mut data = Vec::new();
            file.read_to_end(&mut data).map_err(|e| StorageError::Io {
                path: StoragePath::new(format!("{SCHEME}{label}/{name}")),
                source: e,
            })?;
            entries.insert(name, data);
        }

        let label: Arc<str> = Arc::from(label);
        Ok(Self {
            location: StoragePath::new(format!("{SCHEME}{label}")),
            label,
            entries: Arc::new(entries),
            prefix: String::new(),
        })
    }

    fn view(&self, prefix: String) -> Self {
        let location = if prefix.is_empty() {
            StoragePath::new(format!("{SCHEME}{}", self.label))
        } else {
            StoragePath::new(format!(
                "{SCHEME}{}/{}",
                self.label,
                prefix.trim_end_matches('/')
            ))
        };
        Self {
            label: Arc::clone(&self.label),
            entries: Arc::clone(&self.entries),
            prefix,
            location,
        }
    }

    fn entry_location(&self, name: &str) -> StoragePath {
        StoragePath::new(format!("{SCHEME}{}/{name}", self.label))
    }

    /// Entries under this folder's prefix, paired with the remaining path.
    fn children(&self) -> impl Iterator<Item = (&String, &str)> {
        self.entries
            .keys()
            .filter_map(|name| name.strip_prefix(self.prefix.as_str()).map(|rest| (name, rest)))
    }
}

#[async_trait]
impl Storage for ArchiveStorage {
    fn location(&self) -> &StoragePath {
        &self.location
    }

    async fn list_files(&self) -> StorageResult<Vec<StoragePath>> {
        Ok(self
            .children()
            .filter(|(_, rest)| !rest.contains('/'))
            .map(|(name, _)| self.entry_location(name))
            .collect())
    }

    async fn list_subfolder_locations(&self) -> StorageResult<Vec<StoragePath>> {
        let mut dirs: Vec<String> = self
            .children()
            .filter_map(|(_, rest)| rest.split_once('/').map(|(dir, _)| dir.to_string()))
            .filter(|dir| !dir.starts_with('.'))
            .collect();
        dirs.sort();
        dirs.dedup();
        Ok(dirs
            .into_iter()
            .map(|dir| self.location.join(&dir))
            .collect())
    }

    async fn subfolder(&self, name: &str) -> StorageResult<Box<dyn Storage>> {
        let prefix = format!("{}{}/", self.prefix, name.trim_matches('/'));
        if !self.entries.keys().any(|k| k.starts_with(&prefix)) {
            return Err(StorageError::NotFound(self.location.join(name)));
        }
        Ok(Box::new(self.view(prefix)))
    }

    async fn subfolder_at(&self, location: &StoragePath) -> StorageResult<Box<dyn Storage>> {
        let root = StoragePath::new(format!("{SCHEME}{}", self.label));
        let relative = location
            .relative_to(&root)
            .ok_or_else(|| StorageError::NotFound(location.clone()))?;
        if relative.is_empty() {
            return Ok(Box::new(self.view(String::new())));
        }
        let prefix = format!("{}/", relative.trim_end_matches('/'));
        if !self.entries.keys().any(|k| k.starts_with(&prefix)) {
            return Err(StorageError::NotFound(location.clone()));
        }
        Ok(Box::new(self.view(prefix)))
    }

    async fn read_file(&self, name: &str) -> StorageResult<Vec<u8>> {
        let key = format!("{}{}", self.prefix, name.replace('\\', "/"));
        self.entries
            .get(&key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(self.entry_location(&key)))
    }

    async fn write_file(&self, name: &str, _data: &[u8]) -> StorageResult<()> {
        Err(StorageError::ReadOnly(self.location.join(name)))
    }

    async fn rename_subfolder(&self, from: &str, _to: &str) -> StorageResult<()> {
        Err(StorageError::ReadOnly(self.location.join(from)))
    }

    async fn remove_subfolder(&self, name: &str) -> StorageResult<()> {
        Err(StorageError::ReadOnly(self.location.join(name)))
    }
}
