//! Fully qualified storage locations.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Opaque, fully qualified location of a file or folder in a storage
/// backing.
///
/// For filesystem backings this is an absolute path; for archive views it
/// is `archive://<label>/<entry path>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoragePath(String);

impl StoragePath {
    pub fn new(location: impl Into<String>) -> Self {
        Self(location.into())
    }

    pub fn from_path(path: &Path) -> Self {
        Self(path.to_string_lossy().into_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Final segment of the location, split on either separator.
    pub fn file_name(&self) -> &str {
        self.0
            .trim_end_matches(['/', '\\'])
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or("")
    }

    /// Whether the location string ends with `suffix`.
    pub fn ends_with(&self, suffix: &str) -> bool {
        self.0.ends_with(suffix)
    }

    /// Child location under this one, using `/` unless the location already
    /// uses backslashes.
    pub fn join(&self, name: &str) -> StoragePath {
        let sep = if self.0.contains('\\') && !self.0.contains('/') {
            '\\'
        } else {
            '/'
        };
        let base = self.0.trim_end_matches(['/', '\\']);
        if base.is_empty() {
            return StoragePath(format!("{sep}{name}"));
        }
        StoragePath(format!("{base}{sep}{name}"))
    }

    /// Path of `self` relative to `root`, with forward slashes and no
    /// leading separator. `None` if `self` is not under `root`.
    pub fn relative_to(&self, root: &StoragePath) -> Option<String> {
        let rest = self.0.strip_prefix(root.0.as_str())?;
        if !rest.is_empty() && !rest.starts_with(['/', '\\']) && !root.0.ends_with(['/', '\\']) {
            return None;
        }
        Some(rest.trim_start_matches(['/', '\\']).replace('\\', "/"))
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StoragePath {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for StoragePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
