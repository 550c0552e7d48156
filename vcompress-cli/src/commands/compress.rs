//! Implementation of the compress run.
//!
//! Turns the parsed arguments into a validated `CoreConfig`, checks that
//! ffmpeg and ffprobe can be executed, installs the Ctrl+C handler and hands
//! the folder to the core pipeline.

use crate::cli::Cli;
use crate::error::{CliErrorContext, CliResult};
use crate::logging::get_timestamp;

use vcompress_core::config::default_binary_dir;
use vcompress_core::terminal;
use vcompress_core::{
    CoreConfig, CoreConfigBuilder, FfmpegEncoder, FfprobeMediaProbe, RunSummary, check_tools,
    run_compression,
};

use log::{debug, info};
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Creates and validates the core configuration from CLI arguments.
pub fn create_core_config(cli: &Cli) -> CliResult<CoreConfig> {
    let binary_dir = cli
        .ffmpeg_bin_path
        .clone()
        .unwrap_or_else(default_binary_dir);

    // Kept as typed; the "compressed" marker test must not see resolved names.
    let config = CoreConfigBuilder::new()
        .root_dir(cli.folder.clone())
        .recursive(cli.recursive)
        .debug(cli.debug)
        .binary_dir(binary_dir)
        .quality(cli.crf)
        .codec(&cli.vcodec)
        .extensions(&cli.extensions)
        .build()?;

    Ok(config)
}

fn display_options(config: &CoreConfig) {
    terminal::print_section("Options");
    terminal::print_status("Folder", &config.root_dir.display().to_string(), true);
    terminal::print_status("Recursive", if config.recursive { "yes" } else { "no" }, false);
    terminal::print_status("Debug", if config.debug { "yes" } else { "no" }, false);
    terminal::print_status("FFmpeg folder", &config.binary_dir.display().to_string(), false);
    terminal::print_status("Codec", &config.codec, false);
    terminal::print_status("CRF", &config.quality.to_string(), true);
    terminal::print_status("Extensions", &config.extensions.join(", "), false);
}

/// Returns a flag raised on the first Ctrl+C. A second Ctrl+C exits at once.
///
/// ffmpeg runs in the same process group and receives the signal itself, so
/// the handler only has to record that the user asked to stop.
fn install_interrupt_handler() -> CliResult<Arc<AtomicBool>> {
    let flag = Arc::new(AtomicBool::new(false));
    let handler_flag = flag.clone();

    ctrlc::set_handler(move || {
        if handler_flag.swap(true, Ordering::SeqCst) {
            eprintln!("Interrupted twice, exiting without cleanup");
            std::process::exit(130);
        }
        eprintln!("Interrupt received, cleaning up...");
    })
    .map_err(io::Error::other)
    .cli_context("Failed to install Ctrl+C handler")?;

    Ok(flag)
}

/// Runs a full compression pass over the configured folder.
pub fn run_compress(cli: &Cli) -> CliResult<RunSummary> {
    let config = create_core_config(cli)?;
    display_options(&config);

    check_tools(&config.binary_dir)?;
    debug!("ffmpeg and ffprobe found in {}", config.binary_dir.display());

    let abort = install_interrupt_handler()?;
    let encoder = FfmpegEncoder::new(&config.binary_dir);
    let probe = FfprobeMediaProbe::new(&config.binary_dir, config.debug);

    info!("");
    info!("Started at {}", get_timestamp());
    let summary = run_compression(&config, &encoder, &probe, Some(abort))?;
    info!("Finished at {}", get_timestamp());

    if summary.videos_compressed > 0 {
        terminal::print_success(&format!(
            "Compressed {} video(s)",
            summary.videos_compressed
        ));
    } else {
        terminal::print_success("Done, no videos were replaced");
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::tempdir;
    use vcompress_core::CoreError;

    #[test]
    fn test_create_core_config_maps_arguments() {
        let dir = tempdir().unwrap();
        let folder = dir.path().to_str().unwrap();
        let cli = Cli::try_parse_from([
            "vcompress",
            "-f",
            folder,
            "-r",
            "no",
            "--ffmpeg_bin_path",
            "/opt/ffmpeg/bin",
            "--crf",
            "28",
            "--vcodec",
            "libx265",
            "--extensions",
            ".MP4,mov",
        ])
        .unwrap();

        let config = create_core_config(&cli).unwrap();
        assert_eq!(config.root_dir, dir.path());
        assert!(!config.recursive);
        assert_eq!(config.binary_dir, std::path::PathBuf::from("/opt/ffmpeg/bin"));
        assert_eq!(config.quality, 28);
        assert_eq!(config.codec, "libx265");
        assert_eq!(config.extensions, vec!["mp4".to_string(), "mov".to_string()]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_folder_is_kept_as_given() {
        use vcompress_core::DirectoryScanner;

        let dir = tempdir().unwrap();
        let target = dir.path().join("uncompressed_masters");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("clip.mp4"), b"video").unwrap();
        let link = dir.path().join("videos");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let cli = Cli::try_parse_from(["vcompress", "-f", link.to_str().unwrap()]).unwrap();
        let config = create_core_config(&cli).unwrap();
        assert_eq!(config.root_dir, link);

        let files = DirectoryScanner::from_config(&config)
            .scan(&config.root_dir)
            .unwrap();
        assert_eq!(files, vec![link.join("clip.mp4")]);
    }

    #[test]
    fn test_create_core_config_rejects_missing_folder() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing");
        let cli = Cli::try_parse_from(["vcompress", "-f", missing.to_str().unwrap()]).unwrap();
        assert!(matches!(create_core_config(&cli), Err(CoreError::PathError(_))));
    }
}
