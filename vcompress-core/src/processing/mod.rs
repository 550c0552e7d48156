//! Per-file processing: tasks, outcomes and the compression pipeline.

mod pipeline;

pub use pipeline::{CompressionPipeline, run_compression};

use crate::discovery::compressed_output_path;
use crate::error::CoreResult;
use crate::utils::compression_ratio;

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A discovered input and the output it would be compressed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl FileTask {
    pub fn new(input: &Path) -> CoreResult<Self> {
        Ok(Self {
            input: input.to_path_buf(),
            output: compressed_output_path(input)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    OutputExists,
    UnsupportedExtension,
    AlreadyCompressed,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::OutputExists => write!(f, "compressed output already exists"),
            SkipReason::UnsupportedExtension => write!(f, "unsupported file extension"),
            SkipReason::AlreadyCompressed => write!(f, "file is a compressed output"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Output is the same size or larger than the input
    NotSmaller,
    /// Output could not be opened as a video
    Unusable,
    /// Encoder succeeded but wrote nothing
    MissingOutput,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::NotSmaller => write!(f, "output is not smaller than the original"),
            RejectReason::Unusable => write!(f, "output is not a usable video"),
            RejectReason::MissingOutput => write!(f, "encoder produced no output"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    Skipped(SkipReason),
    /// Original deleted, output kept
    Accepted,
    /// Output deleted, original kept
    Rejected(RejectReason),
}

/// Record of one processed file.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub input_size: u64,
    pub output_size: Option<u64>,
    pub encode_time: Option<Duration>,
    pub outcome: FileOutcome,
}

impl FileReport {
    pub fn ratio(&self) -> f64 {
        self.output_size
            .map(|out| compression_ratio(self.input_size, out))
            .unwrap_or(f64::INFINITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_task_paths() {
        let task = FileTask::new(Path::new("/v/trip.WMV")).unwrap();
        assert_eq!(task.input, PathBuf::from("/v/trip.WMV"));
        assert_eq!(task.output, PathBuf::from("/v/trip_compressed.WMV"));
    }

    #[test]
    fn test_report_ratio() {
        let mut report = FileReport {
            input: PathBuf::from("a.mp4"),
            output: PathBuf::from("a_compressed.mp4"),
            input_size: 10_000_000,
            output_size: Some(6_000_000),
            encode_time: None,
            outcome: FileOutcome::Accepted,
        };
        assert_eq!(report.ratio(), 0.6);

        report.output_size = None;
        assert!(report.ratio().is_infinite());
    }
}
