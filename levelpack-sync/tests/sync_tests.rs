use std::io::{Cursor, Write};

use levelpack_storage::{FsStorage, Storage};
use levelpack_sync::{
    FailurePolicy, HttpCatalogClient, OutcomeStatus, SyncConfig, SyncError, SyncOrchestrator,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

fn package_zip(tag: &str) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    zip.start_file("level.json", options).unwrap();
    zip.write_all(format!(r#"{{"TimeLimitSeconds":30,"Tag":"{tag}"}}"#).as_bytes())
        .unwrap();
    zip.start_file("Images/cat.png", options).unwrap();
    zip.write_all(b"cat").unwrap();
    zip.start_file("Sounds\\hit.wav", options).unwrap();
    zip.write_all(b"hit").unwrap();
    zip.finish().unwrap().into_inner()
}

async fn mount_catalog(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/Level"))
        .and(query_param_is_missing("name"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_package(server: &MockServer, name: &str, bytes: Vec<u8>, times: u64) {
    Mock::given(method("GET"))
        .and(path("/Level"))
        .and(query_param("name", name))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes))
        .expect(times)
        .mount(server)
        .await;
}

fn orchestrator(server: &MockServer, policy: FailurePolicy) -> SyncOrchestrator<HttpCatalogClient> {
    let config = SyncConfig {
        failure_policy: policy,
        ..SyncConfig::new(format!("{}/", server.uri()))
    };
    let client = HttpCatalogClient::new(&config).unwrap();
    SyncOrchestrator::new(client, config)
}

fn installed_names(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// ── Install if missing ──────────────────────────────────────────

#[tokio::test]
async fn installs_only_missing_packages() {
    let server = MockServer::start().await;
    mount_catalog(&server, "intro,forest").await;
    mount_package(&server, "intro", package_zip("intro"), 0).await;
    mount_package(&server, "forest", package_zip("forest"), 1).await;

    let temp = TempDir::new().unwrap();
    let root = FsStorage::open(temp.path()).await.unwrap();
    root.subfolder("intro").await.unwrap();

    let report = orchestrator(&server, FailurePolicy::AbortOnFirst)
        .synchronize(&root)
        .await
        .unwrap();

    assert_eq!(report.downloads(), 1);
    assert_eq!(report.outcomes[0].status, OutcomeStatus::AlreadyPresent);
    assert!(matches!(report.outcomes[1].status, OutcomeStatus::Installed { .. }));
    assert_eq!(report.available().collect::<Vec<_>>(), vec!["intro", "forest"]);

    let forest = temp.path().join("forest");
    let level = std::fs::read_to_string(forest.join("level.json")).unwrap();
    assert!(level.contains("\"forest\""));
    assert_eq!(std::fs::read(forest.join("Images").join("cat.png")).unwrap(), b"cat");
    assert_eq!(std::fs::read(forest.join("Sounds").join("hit.wav")).unwrap(), b"hit");
    assert_eq!(installed_names(temp.path()), vec!["forest", "intro"]);
}

#[tokio::test]
async fn second_pass_downloads_nothing() {
    let server = MockServer::start().await;
    mount_catalog(&server, "intro,forest").await;
    mount_package(&server, "intro", package_zip("intro"), 1).await;
    mount_package(&server, "forest", package_zip("forest"), 1).await;

    let temp = TempDir::new().unwrap();
    let root = FsStorage::open(temp.path()).await.unwrap();
    let sync = orchestrator(&server, FailurePolicy::AbortOnFirst);

    let first = sync.synchronize(&root).await.unwrap();
    assert_eq!(first.downloads(), 2);

    let second = sync.synchronize(&root).await.unwrap();
    assert_eq!(second.downloads(), 0);
    assert!(second
        .outcomes
        .iter()
        .all(|o| o.status == OutcomeStatus::AlreadyPresent));
}

#[tokio::test]
async fn package_installed_this_pass_does_not_hide_suffix_name() {
    let server = MockServer::start().await;
    mount_catalog(&server, "dark-forest,forest").await;
    mount_package(&server, "dark-forest", package_zip("dark-forest"), 1).await;
    mount_package(&server, "forest", package_zip("forest"), 1).await;

    let temp = TempDir::new().unwrap();
    let root = FsStorage::open(temp.path()).await.unwrap();
    let report = orchestrator(&server, FailurePolicy::AbortOnFirst)
        .synchronize(&root)
        .await
        .unwrap();

    assert_eq!(report.downloads(), 2);
    assert!(matches!(report.outcomes[1].status, OutcomeStatus::Installed { .. }));
    let level = std::fs::read_to_string(temp.path().join("forest").join("level.json")).unwrap();
    assert!(level.contains("\"forest\""));
    assert_eq!(installed_names(temp.path()), vec!["dark-forest", "forest"]);
}

#[tokio::test]
async fn repeated_catalog_entry_installs_once() {
    let server = MockServer::start().await;
    mount_catalog(&server, "cave,cave").await;
    mount_package(&server, "cave", package_zip("cave"), 1).await;

    let temp = TempDir::new().unwrap();
    let root = FsStorage::open(temp.path()).await.unwrap();
    let report = orchestrator(&server, FailurePolicy::AbortOnFirst)
        .synchronize(&root)
        .await
        .unwrap();

    assert_eq!(report.downloads(), 1);
    assert_eq!(report.outcomes[1].status, OutcomeStatus::AlreadyPresent);
}

#[tokio::test]
async fn installed_report_carries_digest() {
    let server = MockServer::start().await;
    let bytes = package_zip("cave");
    let expected = levelpack_archive::content_digest(&bytes);
    let len = bytes.len() as u64;
    mount_catalog(&server, "cave").await;
    mount_package(&server, "cave", bytes, 1).await;

    let temp = TempDir::new().unwrap();
    let root = FsStorage::open(temp.path()).await.unwrap();
    let report = orchestrator(&server, FailurePolicy::AbortOnFirst)
        .synchronize(&root)
        .await
        .unwrap();

    assert_eq!(
        report.outcomes[0].status,
        OutcomeStatus::Installed { bytes: len, sha256: expected }
    );
}

#[tokio::test]
async fn names_are_url_encoded() {
    let server = MockServer::start().await;
    mount_catalog(&server, "deep sea").await;
    mount_package(&server, "deep sea", package_zip("deep"), 1).await;

    let temp = TempDir::new().unwrap();
    let root = FsStorage::open(temp.path()).await.unwrap();
    orchestrator(&server, FailurePolicy::AbortOnFirst)
        .synchronize(&root)
        .await
        .unwrap();
    assert!(temp.path().join("deep sea").join("level.json").is_file());
}

#[tokio::test]
async fn empty_catalog_is_a_no_op() {
    let server = MockServer::start().await;
    mount_catalog(&server, "").await;

    let temp = TempDir::new().unwrap();
    let root = FsStorage::open(temp.path()).await.unwrap();
    let report = orchestrator(&server, FailurePolicy::AbortOnFirst)
        .synchronize(&root)
        .await
        .unwrap();
    assert!(report.outcomes.is_empty());
}

// ── Failures ────────────────────────────────────────────────────

#[tokio::test]
async fn catalog_failure_is_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Level"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let root = FsStorage::open(temp.path()).await.unwrap();
    let err = orchestrator(&server, FailurePolicy::BestEffort)
        .synchronize(&root)
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::Network(_)));
}

#[tokio::test]
async fn unreachable_server_is_network_error() {
    let config = SyncConfig::new("http://127.0.0.1:9");
    let client = HttpCatalogClient::new(&config).unwrap();
    let temp = TempDir::new().unwrap();
    let root = FsStorage::open(temp.path()).await.unwrap();

    let err = SyncOrchestrator::new(client, config)
        .synchronize(&root)
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::Network(_)));
}

#[tokio::test]
async fn first_failure_aborts_remaining_entries() {
    let server = MockServer::start().await;
    mount_catalog(&server, "a,broken,c").await;
    mount_package(&server, "a", package_zip("a"), 1).await;
    Mock::given(method("GET"))
        .and(path("/Level"))
        .and(query_param("name", "broken"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    mount_package(&server, "c", package_zip("c"), 0).await;

    let temp = TempDir::new().unwrap();
    let root = FsStorage::open(temp.path()).await.unwrap();
    let err = orchestrator(&server, FailurePolicy::AbortOnFirst)
        .synchronize(&root)
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::Network(ref msg) if msg.contains("404")));
    assert_eq!(installed_names(temp.path()), vec!["a"]);
}

#[tokio::test]
async fn best_effort_records_failure_and_continues() {
    let server = MockServer::start().await;
    mount_catalog(&server, "a,broken,c").await;
    mount_package(&server, "a", package_zip("a"), 1).await;
    mount_package(&server, "broken", b"not a zip".to_vec(), 1).await;
    mount_package(&server, "c", package_zip("c"), 1).await;

    let temp = TempDir::new().unwrap();
    let root = FsStorage::open(temp.path()).await.unwrap();
    let report = orchestrator(&server, FailurePolicy::BestEffort)
        .synchronize(&root)
        .await
        .unwrap();

    assert_eq!(report.downloads(), 2);
    let failures: Vec<_> = report.failures().map(|o| o.name.as_str()).collect();
    assert_eq!(failures, vec!["broken"]);
    assert_eq!(report.available().collect::<Vec<_>>(), vec!["a", "c"]);
    assert_eq!(installed_names(temp.path()), vec!["a", "c"]);
}

#[tokio::test]
async fn corrupt_archive_leaves_no_partial_package() {
    let server = MockServer::start().await;
    mount_catalog(&server, "broken").await;
    mount_package(&server, "broken", b"PK\x03\x04 truncated".to_vec(), 1).await;

    let temp = TempDir::new().unwrap();
    let root = FsStorage::open(temp.path()).await.unwrap();
    let err = orchestrator(&server, FailurePolicy::AbortOnFirst)
        .synchronize(&root)
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::Archive(_)));
    assert!(installed_names(temp.path()).is_empty());
    assert!(root.list_subfolder_locations().await.unwrap().is_empty());
}

#[tokio::test]
async fn oversized_download_rejected() {
    let server = MockServer::start().await;
    mount_catalog(&server, "big").await;
    mount_package(&server, "big", vec![0u8; 4096], 1).await;

    let config = SyncConfig {
        max_archive_bytes: 1024,
        ..SyncConfig::new(server.uri())
    };
    let client = HttpCatalogClient::new(&config).unwrap();
    let temp = TempDir::new().unwrap();
    let root = FsStorage::open(temp.path()).await.unwrap();

    let err = SyncOrchestrator::new(client, config)
        .synchronize(&root)
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::TooLarge { limit: 1024, .. }));
}

#[tokio::test]
async fn catalog_name_escaping_root_rejected() {
    let server = MockServer::start().await;
    mount_catalog(&server, "../outside").await;

    let temp = TempDir::new().unwrap();
    let root = FsStorage::open(temp.path()).await.unwrap();
    let err = orchestrator(&server, FailurePolicy::AbortOnFirst)
        .synchronize(&root)
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::InvalidPackageName(_)));
}
