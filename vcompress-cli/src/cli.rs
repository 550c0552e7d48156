// vcompress-cli/src/cli.rs
//
// Defines the command-line argument structure using clap.

use clap::Parser;
use std::path::PathBuf;
use vcompress_core::config::{DEFAULT_CRF, DEFAULT_VIDEO_CODEC, MAX_CRF};

/// Lenient boolean parsing: yes/true/t/y/1/yep are true, everything else is false.
pub fn parse_flag(value: &str) -> Result<bool, String> {
    let value = value.trim().to_ascii_lowercase();
    Ok(matches!(value.as_str(), "yes" | "true" | "t" | "y" | "1" | "yep"))
}

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "vcompress: batch video compression tool",
    long_about = "Re-encodes every video in a folder with ffmpeg and keeps the result \
                  only when it is smaller than the original and still plays."
)]
pub struct Cli {
    /// Folder containing the videos to compress
    #[arg(short = 'f', long = "folder", required = true, value_name = "FOLDER")]
    pub folder: PathBuf,

    /// Echo ffmpeg/ffprobe invocations and show their logs (accepts an optional yes/no value)
    #[arg(
        short = 'd',
        long = "debug",
        value_name = "BOOL",
        num_args = 0..=1,
        default_value = "false",
        default_missing_value = "true",
        value_parser = parse_flag
    )]
    pub debug: bool,

    /// Also compress videos in subfolders (accepts an optional yes/no value)
    #[arg(
        short = 'r',
        long = "recursive",
        value_name = "BOOL",
        num_args = 0..=1,
        default_value = "true",
        default_missing_value = "true",
        value_parser = parse_flag
    )]
    pub recursive: bool,

    /// Directory containing the ffmpeg and ffprobe executables (defaults to a platform location)
    #[arg(
        long = "ffmpeg_bin_path",
        visible_alias = "ffmpeg-bin-path",
        value_name = "DIR",
        env = "VCOMPRESS_FFMPEG_BIN"
    )]
    pub ffmpeg_bin_path: Option<PathBuf>,

    /// Constant Rate Factor; lower is better quality and larger files
    #[arg(
        short = 'c',
        long = "crf",
        value_name = "CRF",
        default_value_t = DEFAULT_CRF,
        value_parser = clap::value_parser!(u8).range(0..=(MAX_CRF as i64))
    )]
    pub crf: u8,

    /// Encoder passed to ffmpeg's -vcodec (e.g. libx264, libx265)
    #[arg(long = "vcodec", value_name = "CODEC", default_value = DEFAULT_VIDEO_CODEC)]
    pub vcodec: String,

    /// Comma-separated list of file extensions to compress
    #[arg(long, value_name = "EXTS", value_delimiter = ',', default_value = "mp4,wmv")]
    pub extensions: Vec<String>,
}
