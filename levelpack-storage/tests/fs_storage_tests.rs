use levelpack_storage::{FsStorage, Storage, StorageError};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

// ── Construction ────────────────────────────────────────────────

#[tokio::test]
async fn open_creates_missing_folder() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("app").join("levels");
    assert!(!target.exists());

    let storage = FsStorage::open(&target).await.unwrap();
    assert!(target.is_dir());
    assert_eq!(storage.path(), target.as_path());
    assert!(storage.location().ends_with("levels"));
}

#[tokio::test]
async fn open_existing_folder_keeps_content() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("keep.txt"), b"x").unwrap();

    let storage = FsStorage::open(temp.path()).await.unwrap();
    let files = storage.list_files().await.unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].file_name(), "keep.txt");
}

// ── Files ───────────────────────────────────────────────────────

#[tokio::test]
async fn write_read_and_truncate() {
    let temp = TempDir::new().unwrap();
    let storage = FsStorage::open(temp.path()).await.unwrap();

    storage.write_file("level.json", b"a much longer body").await.unwrap();
    storage.write_file("level.json", b"short").await.unwrap();

    assert_eq!(storage.read_file("level.json").await.unwrap(), b"short");
    assert_eq!(storage.read_text("level.json").await.unwrap(), "short");
}

#[tokio::test]
async fn read_missing_is_not_found() {
    let temp = TempDir::new().unwrap();
    let storage = FsStorage::open(temp.path()).await.unwrap();

    let err = storage.read_file("nope.png").await.unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("nope.png"));
}

#[tokio::test]
async fn read_text_rejects_invalid_utf8() {
    let temp = TempDir::new().unwrap();
    let storage = FsStorage::open(temp.path()).await.unwrap();
    storage.write_file("bad.txt", &[0xff, 0xfe, 0x00]).await.unwrap();

    let err = storage.read_text("bad.txt").await.unwrap_err();
    assert!(matches!(err, StorageError::InvalidUtf8(_)));
}

#[tokio::test]
async fn list_files_excludes_folders_and_is_sorted() {
    let temp = TempDir::new().unwrap();
    let storage = FsStorage::open(temp.path()).await.unwrap();
    storage.write_file("b.txt", b"b").await.unwrap();
    storage.write_file("a.txt", b"a").await.unwrap();
    storage.subfolder("Images").await.unwrap();

    let names: Vec<_> = storage
        .list_files()
        .await
        .unwrap()
        .iter()
        .map(|p| p.file_name().to_string())
        .collect();
    assert_eq!(names, vec!["a.txt", "b.txt"]);
}

#[tokio::test]
async fn write_into_missing_parent_fails() {
    let temp = TempDir::new().unwrap();
    let storage = FsStorage::open(temp.path()).await.unwrap();

    let err = storage.write_file("missing/dir/file.bin", b"x").await.unwrap_err();
    assert!(err.is_not_found());
}

// ── Folders ─────────────────────────────────────────────────────

#[tokio::test]
async fn subfolder_creates_and_lists() {
    let temp = TempDir::new().unwrap();
    let root = FsStorage::open(temp.path()).await.unwrap();

    let forest = root.subfolder("forest").await.unwrap();
    forest.write_file("level.json", b"{}").await.unwrap();
    root.subfolder("intro").await.unwrap();

    let locations = root.list_subfolder_locations().await.unwrap();
    let names: Vec<_> = locations.iter().map(|l| l.file_name()).collect();
    assert_eq!(names, vec!["forest", "intro"]);

    let reopened = root.subfolder_at(&locations[0]).await.unwrap();
    assert_eq!(reopened.read_file("level.json").await.unwrap(), b"{}");
}

#[tokio::test]
async fn hidden_subfolders_not_listed() {
    let temp = TempDir::new().unwrap();
    let root = FsStorage::open(temp.path()).await.unwrap();
    root.subfolder(".forest.partial").await.unwrap();
    root.subfolder("intro").await.unwrap();

    let locations = root.list_subfolder_locations().await.unwrap();
    assert_eq!(locations.len(), 1);
    assert_eq!(locations[0].file_name(), "intro");
}

#[tokio::test]
async fn rename_and_remove_subfolder() {
    let temp = TempDir::new().unwrap();
    let root = FsStorage::open(temp.path()).await.unwrap();
    let staged = root.subfolder(".x.partial").await.unwrap();
    staged.write_file("f", b"1").await.unwrap();

    root.rename_subfolder(".x.partial", "x").await.unwrap();
    assert!(temp.path().join("x").join("f").is_file());
    assert!(!temp.path().join(".x.partial").exists());

    root.subfolder("y").await.unwrap();
    let err = root.rename_subfolder("x", "y").await.unwrap_err();
    assert!(matches!(err, StorageError::AlreadyExists(_)));

    root.remove_subfolder("x").await.unwrap();
    assert!(!temp.path().join("x").exists());
    // Removing again is a no-op.
    root.remove_subfolder("x").await.unwrap();
}
