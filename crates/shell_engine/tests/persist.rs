use std::fs;
use std::time::Duration;

use shell_engine::{ensure_output_dir, remove_artifact, schedule_cleanup, AtomicFileWriter};
use tempfile::TempDir;

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("cache").join("exports");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("sheet.xlsx", b"first").unwrap();
    assert_eq!(first.file_name().unwrap(), "sheet.xlsx");
    assert_eq!(fs::read(&first).unwrap(), b"first");

    let second = writer.write("sheet.xlsx", b"second").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read(&second).unwrap(), b"second");
}

#[test]
fn no_partial_file_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    let result = writer.write("doc.md", b"data");
    assert!(result.is_err());
    assert!(!file_path.with_file_name("doc.md").exists());
}

#[test]
fn removing_an_artifact_twice_is_not_an_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("capture.png");
    fs::write(&path, b"png").unwrap();

    remove_artifact(&path).unwrap();
    assert!(!path.exists());
    remove_artifact(&path).unwrap();
    remove_artifact(&temp.path().join("never-existed.bin")).unwrap();
}

#[tokio::test]
async fn cleanup_fires_after_delay_and_tolerates_missing_files() {
    let temp = TempDir::new().unwrap();
    let namespace = temp.path().join("exports").join("abc123");
    fs::create_dir_all(&namespace).unwrap();
    let path = namespace.join("report.xlsx");
    fs::write(&path, b"data").unwrap();

    let handle = schedule_cleanup(path.clone(), Duration::from_millis(30));
    assert!(path.exists());
    handle.await.unwrap();
    assert!(!path.exists());
    assert!(!namespace.exists());

    // Already gone: the second timer still completes quietly.
    schedule_cleanup(path.clone(), Duration::from_millis(1))
        .await
        .unwrap();
}
