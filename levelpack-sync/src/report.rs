//! Per-package results of a sync pass.

use serde::Serialize;

/// What happened to one catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// A local folder for the package already existed; nothing was fetched.
    AlreadyPresent,
    /// The package was downloaded and unpacked.
    Installed { bytes: u64, sha256: String },
    /// Fetching or unpacking failed (best-effort passes only).
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageOutcome {
    pub name: String,
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

/// Outcomes of a sync pass, in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub outcomes: Vec<PackageOutcome>,
}

impl SyncReport {
    pub(crate) fn record(&mut self, name: &str, status: OutcomeStatus) {
        self.outcomes.push(PackageOutcome {
            name: name.to_string(),
            status,
        });
    }

    /// Number of packages downloaded in this pass.
    pub fn downloads(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, OutcomeStatus::Installed { .. }))
            .count()
    }

    /// Outcomes that failed.
    pub fn failures(&self) -> impl Iterator<Item = &PackageOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, OutcomeStatus::Failed { .. }))
    }

    /// Catalog names that are installed locally after the pass, in catalog
    /// order.
    pub fn available(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|o| !matches!(o.status, OutcomeStatus::Failed { .. }))
            .map(|o| o.name.as_str())
    }
}
