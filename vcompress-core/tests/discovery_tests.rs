// vcompress-core/tests/discovery_tests.rs

use vcompress_core::discovery::DirectoryScanner;
use vcompress_core::error::CoreError;
use std::fs::{self, File};
use std::path::Path;
use tempfile::tempdir;

fn sized_file(path: &Path, size: u64) -> std::io::Result<()> {
    File::create(path)?.set_len(size)
}

fn default_scanner(recursive: bool) -> DirectoryScanner {
    DirectoryScanner::new(recursive, vec!["mp4".to_string(), "wmv".to_string()])
}

fn names(files: &[std::path::PathBuf]) -> Vec<String> {
    files
        .iter()
        .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn test_scan_filters_extensions_and_marker() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let root = dir.path();

    File::create(root.join("b.wmv"))?;
    File::create(root.join("a.MP4"))?; // Case-insensitive
    File::create(root.join("a_compressed.mp4"))?;
    File::create(root.join("uncompressed_raw.mp4"))?; // Marker matches anywhere
    File::create(root.join("notes.txt"))?;
    File::create(root.join("clip.mkv"))?;

    let files = default_scanner(true).scan(root)?;
    assert_eq!(names(&files), vec!["a.MP4", "b.wmv"]);

    Ok(())
}

#[test]
fn test_scan_recursion() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let root = dir.path();

    File::create(root.join("top.mp4"))?;
    fs::create_dir_all(root.join("season1").join("extras"))?;
    File::create(root.join("season1").join("ep1.mp4"))?;
    File::create(root.join("season1").join("extras").join("bonus.wmv"))?;

    let shallow = default_scanner(false).scan(root)?;
    assert_eq!(names(&shallow), vec!["top.mp4"]);

    let deep = default_scanner(true).scan(root)?;
    assert_eq!(deep.len(), 3);
    assert!(deep.contains(&root.join("season1").join("extras").join("bonus.wmv")));

    Ok(())
}

#[test]
fn test_scan_skips_marked_directories_and_hidden_entries() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let root = dir.path();

    fs::create_dir(root.join("compressed"))?;
    File::create(root.join("compressed").join("old.mp4"))?;
    fs::create_dir(root.join(".cache"))?;
    File::create(root.join(".cache").join("thumb.mp4"))?;
    File::create(root.join(".hidden.mp4"))?;
    File::create(root.join("keep.mp4"))?;

    let files = default_scanner(true).scan(root)?;
    assert_eq!(names(&files), vec!["keep.mp4"]);

    Ok(())
}

#[test]
fn test_scan_is_repeatable() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let root = dir.path();
    File::create(root.join("a.mp4"))?;
    File::create(root.join("b.mp4"))?;

    let scanner = default_scanner(true);
    assert_eq!(scanner.scan(root)?, scanner.scan(root)?);

    // A new output appearing between scans is not picked up
    File::create(root.join("a_compressed.mp4"))?;
    assert_eq!(names(&scanner.scan(root)?), vec!["a.mp4", "b.mp4"]);

    Ok(())
}

#[test]
fn test_total_size_includes_outputs() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let root = dir.path();

    sized_file(&root.join("a.mp4"), 1_000)?;
    sized_file(&root.join("a_compressed.mp4"), 400)?;
    sized_file(&root.join("notes.txt"), 50_000)?;
    fs::create_dir(root.join("sub"))?;
    sized_file(&root.join("sub").join("b.wmv"), 2_000)?;

    assert_eq!(default_scanner(true).total_size(root)?, 3_400);
    assert_eq!(default_scanner(false).total_size(root)?, 1_400);

    Ok(())
}

#[test]
fn test_scan_missing_root() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope");

    let result = default_scanner(true).scan(&missing);
    assert!(matches!(result, Err(CoreError::PathError(_))));
    assert!(matches!(
        default_scanner(true).total_size(&missing),
        Err(CoreError::PathError(_))
    ));
}

#[test]
fn test_scan_empty_directory() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    assert!(default_scanner(true).scan(dir.path())?.is_empty());
    assert_eq!(default_scanner(true).total_size(dir.path())?, 0);
    Ok(())
}
