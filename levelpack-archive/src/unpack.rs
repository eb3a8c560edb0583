//! Unpacking a level archive into a storage folder.

use std::io::{Cursor, Read, Seek};

use levelpack_storage::Storage;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use zip::ZipArchive;

use crate::{ArchiveError, ArchiveResult, IMAGES_FOLDER, SOUNDS_FOLDER};

/// How much an archive is trusted during extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum UnpackPolicy {
    /// Extract every entry as-is. Only for archives from a trusted origin.
    #[default]
    Trusted,
    /// Reject entries with absolute paths or `..` segments and stop once
    /// the decompressed total exceeds `max_total_bytes`.
    Sandboxed { max_total_bytes: u64 },
}

/// Destination folder of an archive entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryFolder {
    Root,
    Images,
    Sounds,
}

/// Classifies an archive entry into its destination folder and bare file
/// name.
///
/// The folder is chosen by whether the full entry path starts with
/// `Images` or `Sounds`; anything else goes to the root. The file name is
/// the last path segment, split on both `/` and `\`.
pub fn classify_entry(full_name: &str) -> (EntryFolder, &str) {
    let file_name = full_name.rsplit(['/', '\\']).next().unwrap_or(full_name);
    let folder = if full_name.starts_with(IMAGES_FOLDER) {
        EntryFolder::Images
    } else if full_name.starts_with(SOUNDS_FOLDER) {
        EntryFolder::Sounds
    } else {
        EntryFolder::Root
    };
    (folder, file_name)
}

/// What [`unpack`] wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnpackSummary {
    /// Destination paths relative to the unpack root, in archive order.
    pub written: Vec<String>,
    /// Decompressed bytes written.
    pub total_bytes: u64,
}

/// Extracts every file entry of the archive in `source` into `destination`.
///
/// Existing files with the same name are truncated. Entries are processed
/// one at a time in archive order.
pub async fn unpack<R>(
    source: R,
    destination: &dyn Storage,
    policy: UnpackPolicy,
) -> ArchiveResult<UnpackSummary>
where
    R: Read + Seek + Send,
{
    let mut archive = ZipArchive::new(source)?;
    let images = destination.subfolder(IMAGES_FOLDER).await?;
    let sounds = destination.subfolder(SOUNDS_FOLDER).await?;
    let mut summary = UnpackSummary::default();

    for i in 0..archive.len() {
        let (full_name, data) = {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let full_name = file.name().to_string();

            let mut data = Vec::new();
            match policy {
                UnpackPolicy::Trusted => {
                    file.read_to_end(&mut data)?;
                }
                UnpackPolicy::Sandboxed { max_total_bytes } => {
                    check_entry_path(&full_name)?;
                    let remaining = max_total_bytes.saturating_sub(summary.total_bytes);
                    (&mut file).take(remaining.saturating_add(1)).read_to_end(&mut data)?;
                    if data.len() as u64 > remaining {
                        return Err(ArchiveError::TooLarge {
                            limit: max_total_bytes,
                        });
                    }
                }
            }
            (full_name, data)
        };

        let (folder, file_name) = classify_entry(&full_name);
        if file_name.is_empty() {
            continue;
        }
        let (target, prefix): (&dyn Storage, &str) = match folder {
            EntryFolder::Root => (destination, ""),
            EntryFolder::Images => (images.as_ref(), "Images/"),
            EntryFolder::Sounds => (sounds.as_ref(), "Sounds/"),
        };

        debug!("Unpacking {} -> {}{}", full_name, prefix, file_name);
        target.write_file(file_name, &data).await?;

        summary.total_bytes += data.len() as u64;
        summary.written.push(format!("{prefix}{file_name}"));
    }

    info!(
        "Unpacked {} files ({} bytes) into {}",
        summary.written.len(),
        summary.total_bytes,
        destination.location()
    );
    Ok(summary)
}

/// Extracts an in-memory archive into `destination`.
pub async fn unpack_bytes(
    bytes: &[u8],
    destination: &dyn Storage,
    policy: UnpackPolicy,
) -> ArchiveResult<UnpackSummary> {
    unpack(Cursor::new(bytes), destination, policy).await
}

fn check_entry_path(name: &str) -> ArchiveResult<()> {
    let absolute = name.starts_with(['/', '\\']) || name.contains(':');
    let parent = name.split(['/', '\\']).any(|seg| seg == "..");
    if absolute || parent {
        return Err(ArchiveError::PathEscapes(name.to_string()));
    }
    Ok(())
}
