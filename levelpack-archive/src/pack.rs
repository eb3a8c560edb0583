//! Packing a storage folder into a level archive.

use std::io::{self, Cursor, Seek, Write};

use chrono::{Datelike, Local, Timelike};
use levelpack_storage::{Storage, StorageError};
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::{ArchiveError, ArchiveResult, IMAGES_FOLDER, SOUNDS_FOLDER};

/// What [`pack`] wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackSummary {
    /// Entry names in the order they were written.
    pub entries: Vec<String>,
    /// Uncompressed bytes across all entries.
    pub total_bytes: u64,
}

/// Packs `source` into a zip archive written to `sink`.
///
/// Files directly under `source` are written first, then those under its
/// `Images` and `Sounds` folders. Nothing deeper is visited. Entry names
/// are root-relative with forward slashes. Every entry carries the same
/// modification time, taken once when packing starts, so repacking an
/// unchanged folder only differs by that stamp.
///
/// A file removed between listing and reading fails with
/// [`ArchiveError::Io`].
pub async fn pack<W>(source: &dyn Storage, sink: W) -> ArchiveResult<PackSummary>
where
    W: Write + Seek + Send,
{
    let root = source.location().clone();
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(pack_timestamp());

    let mut zip = ZipWriter::new(sink);
    let mut summary = PackSummary::default();

    for group in [None, Some(IMAGES_FOLDER), Some(SOUNDS_FOLDER)] {
        let subfolder;
        let folder: &dyn Storage = match group {
            None => source,
            Some(name) => {
                subfolder = source.subfolder(name).await?;
                subfolder.as_ref()
            }
        };

        for file in folder.list_files().await? {
            let entry = file
                .relative_to(&root)
                .filter(|e| !e.is_empty())
                .ok_or_else(|| ArchiveError::OutsideRoot(file.to_string()))?;
            let data = folder.read_file(file.file_name()).await.map_err(vanished)?;

            debug!("Packing {} ({} bytes)", entry, data.len());
            zip.start_file(entry.as_str(), options)?;
            zip.write_all(&data)?;

            summary.total_bytes += data.len() as u64;
            summary.entries.push(entry);
        }
    }

    zip.finish()?;
    info!(
        "Packed {} entries ({} bytes) from {}",
        summary.entries.len(),
        summary.total_bytes,
        root
    );
    Ok(summary)
}

// A listed file that can no longer be read was removed mid-pack.
fn vanished(err: StorageError) -> ArchiveError {
    match err {
        StorageError::NotFound(path) => ArchiveError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{path} disappeared while packing"),
        )),
        other => other.into(),
    }
}

/// Packs `source` into an in-memory archive.
pub async fn pack_to_vec(source: &dyn Storage) -> ArchiveResult<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    pack(source, &mut buf).await?;
    Ok(buf.into_inner())
}

// Zip stamps cannot predate 1980; fall back to the format's epoch.
fn pack_timestamp() -> DateTime {
    let now = Local::now();
    DateTime::from_date_and_time(
        u16::try_from(now.year()).unwrap_or(1980),
        now.month() as u8,
        now.day() as u8,
        now.hour() as u8,
        now.minute() as u8,
        now.second().min(59) as u8,
    )
    .unwrap_or_default()
}
