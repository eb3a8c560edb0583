//! Reconciles the remote catalog with locally installed packages.

use std::collections::HashSet;

use levelpack_archive::{content_digest, unpack_bytes};
use levelpack_storage::{Storage, StoragePath};
use tracing::{debug, info, warn};

use crate::report::{OutcomeStatus, SyncReport};
use crate::{CatalogClient, FailurePolicy, SyncConfig, SyncError, SyncResult};

/// Hidden folder a package is unpacked into before it is renamed into place.
pub fn staging_name(name: &str) -> String {
    format!(".{name}.partial")
}

/// Runs sync passes against one catalog.
///
/// Callers must not run two passes against the same root concurrently.
pub struct SyncOrchestrator<C> {
    client: C,
    config: SyncConfig,
}

impl<C: CatalogClient> SyncOrchestrator<C> {
    pub fn new(client: C, config: SyncConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Installs every catalog package that is missing under `root`.
    ///
    /// A package counts as present when the final segment of some folder
    /// listed at the start of the pass ends with its name, or when this
    /// pass already installed that exact name. Present packages are never
    /// re-fetched.
    /// Packages are processed one at a time in catalog order; on failure
    /// the configured [`FailurePolicy`] decides whether the pass stops.
    /// A catalog fetch failure always aborts the pass.
    pub async fn synchronize(&self, root: &dyn Storage) -> SyncResult<SyncReport> {
        let names = self.client.list_packages().await?;
        let local = root.list_subfolder_locations().await?;
        info!(
            "Catalog lists {} packages, {} installed locally",
            names.len(),
            local.len()
        );

        let mut report = SyncReport::default();
        let mut installed: HashSet<&str> = HashSet::new();
        for name in &names {
            if installed.contains(name.as_str()) || is_present(&local, name) {
                debug!("Package {} already installed", name);
                report.record(name, OutcomeStatus::AlreadyPresent);
                continue;
            }

            match self.install(root, name).await {
                Ok(status) => {
                    installed.insert(name);
                    report.record(name, status);
                }
                Err(e) => match self.config.failure_policy {
                    FailurePolicy::AbortOnFirst => return Err(e),
                    FailurePolicy::BestEffort => {
                        warn!("Failed to install package {}: {}", name, e);
                        report.record(name, OutcomeStatus::Failed { error: e.to_string() });
                    }
                },
            }
        }

        info!("Sync finished: {} downloaded", report.downloads());
        Ok(report)
    }

    async fn install(&self, root: &dyn Storage, name: &str) -> SyncResult<OutcomeStatus> {
        validate_name(name)?;

        let bytes = self.client.fetch_package(name).await?;
        let sha256 = content_digest(&bytes);

        let staging = staging_name(name);
        root.remove_subfolder(&staging).await?;
        let folder = root.subfolder(&staging).await?;

        if let Err(e) = unpack_bytes(&bytes, folder.as_ref(), self.config.unpack_policy).await {
            if let Err(cleanup) = root.remove_subfolder(&staging).await {
                warn!("Failed to remove staging folder {}: {}", staging, cleanup);
            }
            return Err(e.into());
        }

        root.rename_subfolder(&staging, name).await?;
        info!("Installed package {} ({} bytes, sha256 {})", name, bytes.len(), sha256);

        Ok(OutcomeStatus::Installed {
            bytes: bytes.len() as u64,
            sha256,
        })
    }
}

fn is_present(local: &[StoragePath], name: &str) -> bool {
    local.iter().any(|location| location.file_name().ends_with(name))
}

fn validate_name(name: &str) -> SyncResult<()> {
    let bad = name.starts_with('.') || name.contains(['/', '\\']) || name.contains('\0');
    if bad {
        return Err(SyncError::InvalidPackageName(name.to_string()));
    }
    Ok(())
}
