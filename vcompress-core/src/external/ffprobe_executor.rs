//! FFprobe integration for duration lookup and output verification.
//!
//! Two questions are ever asked of ffprobe: how long is this file, and does
//! this file contain a decodable video stream. Both go through the
//! `MediaProbe` trait so the pipeline can be tested without ffprobe installed.

use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error};
use crate::external::{ToolKind, describe_command, tool_path};
use crate::terminal;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Read-only media inspection.
pub trait MediaProbe {
    /// Container duration in seconds.
    fn duration_seconds(&self, path: &Path) -> CoreResult<f64>;

    /// True if `path` can be opened and has at least one video stream.
    ///
    /// Probe failures count as "not usable" rather than errors.
    fn is_usable(&self, path: &Path) -> bool;
}

#[derive(Debug, Deserialize)]
struct ProbeStreams {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
}

/// Parses the output of `-show_entries format=duration -of default=noprint_wrappers=1:nokey=1`.
pub fn parse_duration_output(output: &str) -> CoreResult<f64> {
    let line = output
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .ok_or_else(|| CoreError::FfprobeParse("empty duration output".to_string()))?;

    match line.parse::<f64>() {
        Ok(seconds) if seconds.is_finite() && seconds >= 0.0 => Ok(seconds),
        _ => Err(CoreError::FfprobeParse(format!("invalid duration '{line}'"))),
    }
}

/// Returns true if ffprobe's JSON stream listing contains a video stream.
pub fn parse_has_video_stream(json: &str) -> CoreResult<bool> {
    let probe: ProbeStreams = serde_json::from_str(json)
        .map_err(|e| CoreError::FfprobeParse(format!("invalid stream listing: {e}")))?;
    Ok(probe
        .streams
        .iter()
        .any(|stream| stream.codec_type.as_deref() == Some("video")))
}

/// `MediaProbe` backed by the ffprobe executable.
#[derive(Debug, Clone)]
pub struct FfprobeMediaProbe {
    ffprobe: PathBuf,
    debug: bool,
}

impl FfprobeMediaProbe {
    /// Probe using `<binary_dir>/ffprobe` (`ffprobe.exe` on Windows).
    pub fn new(binary_dir: &Path, debug: bool) -> Self {
        Self {
            ffprobe: tool_path(binary_dir, ToolKind::Ffprobe),
            debug,
        }
    }

    pub fn ffprobe_path(&self) -> &Path {
        &self.ffprobe
    }

    fn run(&self, args: &[&str], path: &Path) -> CoreResult<String> {
        let mut cmd = Command::new(&self.ffprobe);
        cmd.args(args).arg(path);

        let invocation = describe_command(&cmd);
        if self.debug {
            terminal::print_command(&invocation);
        }
        log::debug!("Running probe command: {}", invocation);

        let output = cmd
            .output()
            .map_err(|e| command_start_error(self.ffprobe.display().to_string(), e))?;

        if !output.status.success() {
            return Err(command_failed_error(
                self.ffprobe.display().to_string(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl MediaProbe for FfprobeMediaProbe {
    fn duration_seconds(&self, path: &Path) -> CoreResult<f64> {
        let stdout = self.run(
            &[
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ],
            path,
        )?;
        parse_duration_output(&stdout)
    }

    fn is_usable(&self, path: &Path) -> bool {
        let result = self
            .run(&["-v", "error", "-show_streams", "-of", "json"], path)
            .and_then(|stdout| parse_has_video_stream(&stdout));

        match result {
            Ok(has_video) => {
                if !has_video {
                    log::debug!("No video stream found in {}", path.display());
                }
                has_video
            }
            Err(e) => {
                log::debug!("Probe of {} failed: {}", path.display(), e);
                false
            }
        }
    }
}
