//! Remote catalog client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::{SyncConfig, SyncError, SyncResult};

/// Source of the package catalog and package archives.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetches the names of all packages currently offered.
    async fn list_packages(&self) -> SyncResult<Vec<String>>;

    /// Downloads the archive bytes of one package.
    async fn fetch_package(&self, name: &str) -> SyncResult<Vec<u8>>;
}

/// Splits a catalog body into package names.
///
/// Names are separated by commas and cannot contain one. Surrounding
/// whitespace is trimmed and empty names are dropped.
pub fn parse_catalog(body: &str) -> Vec<String> {
    body.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// HTTP implementation of the catalog protocol.
pub struct HttpCatalogClient {
    client: Client,
    base_url: String,
    max_archive_bytes: u64,
}

impl HttpCatalogClient {
    pub fn new(config: &SyncConfig) -> SyncResult<Self> {
        if config.base_url().trim().is_empty() {
            return Err(SyncError::Config("catalog endpoint is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| SyncError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
            max_archive_bytes: config.max_archive_bytes,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn list_packages(&self) -> SyncResult<Vec<String>> {
        let url = format!("{}/Level", self.base_url);
        debug!("Fetching catalog from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SyncError::Network(format!("catalog request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Network(format!("catalog request failed: {status}")));
        }

        let body = response.text().await?;
        Ok(parse_catalog(&body))
    }

    async fn fetch_package(&self, name: &str) -> SyncResult<Vec<u8>> {
        let url = format!("{}/Level?name={}", self.base_url, urlencoding::encode(name));
        debug!("Downloading package {} from {}", name, url);

        let mut response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SyncError::Network(format!("download of {name} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Network(format!("download of {name} failed: {status}")));
        }

        let too_large = || SyncError::TooLarge {
            name: name.to_string(),
            limit: self.max_archive_bytes,
        };
        if response
            .content_length()
            .is_some_and(|len| len > self.max_archive_bytes)
        {
            return Err(too_large());
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if (body.len() + chunk.len()) as u64 > self.max_archive_bytes {
                return Err(too_large());
            }
            body.extend_from_slice(&chunk);
        }

        debug!("Downloaded {} bytes for {}", body.len(), name);
        Ok(body)
    }
}
