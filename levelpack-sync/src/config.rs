//! Sync configuration.

use std::path::Path;

use levelpack_archive::UnpackPolicy;
use serde::{Deserialize, Serialize};

use crate::{SyncError, SyncResult};

/// What a sync pass does when one package fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop at the first failure and return it; later catalog entries are
    /// not attempted.
    #[default]
    AbortOnFirst,
    /// Record the failure in the report and continue with the next entry.
    BestEffort,
}

/// Configuration for a sync pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Catalog base URL (e.g. `https://levels.example.com/`).
    pub endpoint: String,
    pub failure_policy: FailurePolicy,
    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Largest accepted archive download, in bytes.
    pub max_archive_bytes: u64,
    pub unpack_policy: UnpackPolicy,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            failure_policy: FailurePolicy::AbortOnFirst,
            request_timeout_secs: 60,
            max_archive_bytes: 256 * 1024 * 1024, // 256 MB
            unpack_policy: UnpackPolicy::Trusted,
        }
    }
}

impl SyncConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Parses a TOML configuration document.
    pub fn from_toml(text: &str) -> SyncResult<Self> {
        toml::from_str(text).map_err(|e| SyncError::Config(e.to_string()))
    }

    /// Reads a TOML configuration file.
    pub fn load(path: &Path) -> SyncResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| SyncError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml(&text)
    }

    /// Endpoint without trailing slashes.
    pub fn base_url(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }
}
