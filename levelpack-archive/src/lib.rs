//! Level package archiving.
//!
//! A level package is a zip archive with a fixed three-folder layout:
//! - files at the root (the `level.json` schema)
//! - `Images/`: image assets
//! - `Sounds/`: sound assets
//!
//! [`pack`] writes a storage folder into that layout and [`unpack`] writes
//! an archive back into a storage folder. Unpacking classifies each entry
//! by its path prefix and flattens it to its bare file name, so archives
//! written with either `/` or `\` separators land in the same place.

mod error;
mod pack;
mod unpack;

pub use error::{ArchiveError, ArchiveResult};
pub use pack::{pack, pack_to_vec, PackSummary};
pub use unpack::{classify_entry, unpack, unpack_bytes, EntryFolder, UnpackPolicy, UnpackSummary};

use sha2::{Digest, Sha256};

/// Name of the image asset folder.
pub const IMAGES_FOLDER: &str = "Images";

/// Name of the sound asset folder.
pub const SOUNDS_FOLDER: &str = "Sounds";

/// SHA-256 of an archive's raw bytes, hex encoded.
pub fn content_digest(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
