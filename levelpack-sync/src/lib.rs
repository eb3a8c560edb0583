//! Install-if-missing synchronization of level packages.
//!
//! The server publishes a catalog of package names and serves each package
//! as a zip archive:
//! - `GET {endpoint}/Level` returns a comma-separated list of names
//! - `GET {endpoint}/Level?name={name}` returns the archive bytes
//!
//! A sync pass fetches the catalog, skips every name already installed
//! under the local root, and downloads and unpacks the rest. Each package
//! is staged in a hidden folder and renamed into place only after it is
//! fully unpacked, so a partial install is never listed as present.
//!
//! There is no version comparison: an installed package is never updated.

mod catalog;
mod config;
mod error;
mod orchestrator;
mod report;

pub use catalog::{parse_catalog, CatalogClient, HttpCatalogClient};
pub use config::{FailurePolicy, SyncConfig};
pub use error::{SyncError, SyncResult};
pub use orchestrator::{staging_name, SyncOrchestrator};
pub use report::{OutcomeStatus, PackageOutcome, SyncReport};
