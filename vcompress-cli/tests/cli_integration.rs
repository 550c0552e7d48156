use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use std::error::Error;
use tempfile::tempdir;

// Helper function to get the path to the compiled binary
fn vcompress_cmd() -> Command {
    let mut cmd = Command::cargo_bin("vcompress").expect("Failed to find vcompress binary");
    cmd.env_remove("VCOMPRESS_FFMPEG_BIN").env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_missing_folder_argument() {
    vcompress_cmd()
        .assert()
        .failure()
        .stderr(contains("--folder"));
}

#[test]
fn test_help_lists_options() {
    vcompress_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            contains("--folder")
                .and(contains("--recursive"))
                .and(contains("--ffmpeg_bin_path"))
                .and(contains("--crf"))
                .and(contains("--vcodec")),
        );
}

#[test]
fn test_non_existent_folder() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let missing = dir.path().join("no_such_folder");

    vcompress_cmd()
        .arg("--folder")
        .arg(&missing)
        .assert()
        .failure()
        .code(1)
        .stderr(contains("does not exist"));

    Ok(())
}

#[test]
fn test_invalid_crf_is_rejected() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;

    vcompress_cmd()
        .arg("-f")
        .arg(dir.path())
        .arg("--crf")
        .arg("99")
        .assert()
        .failure()
        .stderr(contains("99"));

    Ok(())
}

#[test]
fn test_missing_ffmpeg_reports_attempted_path() -> Result<(), Box<dyn Error>> {
    let videos = tempdir()?;
    let bin = tempdir()?;
    let input = videos.path().join("a.mp4");
    std::fs::write(&input, b"not really a video")?;

    vcompress_cmd()
        .arg("-f")
        .arg(videos.path())
        .arg("--ffmpeg_bin_path")
        .arg(bin.path())
        .assert()
        .failure()
        .code(1)
        .stderr(contains("not found").and(contains(bin.path().to_string_lossy().as_ref())));

    // Nothing was touched
    assert!(input.exists());
    assert!(!videos.path().join("a_compressed.mp4").exists());

    Ok(())
}

#[test]
fn test_bin_path_from_environment() -> Result<(), Box<dyn Error>> {
    let videos = tempdir()?;
    let bin = tempdir()?;

    vcompress_cmd()
        .env("VCOMPRESS_FFMPEG_BIN", bin.path())
        .arg("-f")
        .arg(videos.path())
        .assert()
        .failure()
        .stderr(contains(bin.path().to_string_lossy().as_ref()));

    Ok(())
}
