//! Core library for batch video compression using ffmpeg and ffprobe.
//!
//! This crate discovers video files in a folder, re-encodes each one with a
//! configurable codec and CRF, keeps the result only when it is smaller and
//! still opens as a video, and reports per-file and aggregate savings.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use vcompress_core::{CoreConfigBuilder, FfmpegEncoder, FfprobeMediaProbe, run_compression};
//! use std::path::PathBuf;
//!
//! let config = CoreConfigBuilder::new()
//!     .root_dir(PathBuf::from("/path/to/videos"))
//!     .quality(28)
//!     .build()
//!     .unwrap();
//!
//! let encoder = FfmpegEncoder::new(&config.binary_dir);
//! let probe = FfprobeMediaProbe::new(&config.binary_dir, config.debug);
//!
//! let summary = run_compression(&config, &encoder, &probe, None).unwrap();
//! println!("Compressed {} video(s)", summary.videos_compressed);
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod external;
pub mod processing;
pub mod reporting;
pub mod terminal;
pub mod utils;

// Re-exports for public API
pub use config::{CoreConfig, CoreConfigBuilder};
pub use discovery::{DirectoryScanner, compressed_output_path, is_marked_compressed};
pub use error::{CoreError, CoreResult};
pub use external::{
    EncodeSettings, Encoder, FfmpegEncoder, FfprobeMediaProbe, MediaProbe, check_dependency,
    check_tools,
};
pub use processing::{
    CompressionPipeline, FileOutcome, FileReport, FileTask, RejectReason, SkipReason,
    run_compression,
};
pub use reporting::{CleanupOutcome, RunGuard, RunState, RunSummary};
pub use utils::{compression_ratio, format_bytes, format_duration, format_percent};
