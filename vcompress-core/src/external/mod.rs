// ============================================================================
// vcompress-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with ffmpeg and ffprobe
//
// This module encapsulates every interaction with the external command-line
// tools. The pipeline only sees the `Encoder` and `MediaProbe` traits, so the
// concrete tool-backed implementations can be swapped for the mocks in tests.
//
// KEY COMPONENTS:
// - Encoder / FfmpegEncoder: transcoding through ffmpeg-sidecar
// - MediaProbe / FfprobeMediaProbe: duration and usability checks via ffprobe
// - Tool path resolution and dependency checking

use crate::error::{CoreResult, command_failed_error, command_start_error};

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

// ============================================================================
// SUBMODULES
// ============================================================================

/// Encoder trait and the ffmpeg-backed implementation
pub mod ffmpeg;

/// Traits and implementations for spawning ffmpeg processes
pub mod ffmpeg_executor;

/// MediaProbe trait and the ffprobe-backed implementation
pub mod ffprobe_executor;

/// Scripted implementations for tests
pub mod mocks;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use ffmpeg::{EncodeSettings, Encoder, FfmpegEncoder, build_compress_command};
pub use ffmpeg_executor::{FfmpegProcess, FfmpegSpawner, SidecarProcess, SidecarSpawner};
pub use ffprobe_executor::{FfprobeMediaProbe, MediaProbe};

// ============================================================================
// TOOL RESOLUTION
// ============================================================================

/// The external executables the pipeline depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Ffmpeg,
    Ffprobe,
}

impl ToolKind {
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Ffmpeg => "ffmpeg",
            ToolKind::Ffprobe => "ffprobe",
        }
    }
}

/// Full path of `tool` inside `binary_dir`, with `.exe` appended on Windows.
pub fn tool_path(binary_dir: &Path, tool: ToolKind) -> PathBuf {
    let file_name = if cfg!(windows) {
        format!("{}.exe", tool.name())
    } else {
        tool.name().to_string()
    };
    binary_dir.join(file_name)
}

/// Renders a command as a single shell-like line for debug output.
pub fn describe_command(cmd: &Command) -> String {
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(|part| {
            let part = part.to_string_lossy();
            if part.is_empty() || part.contains(char::is_whitespace) {
                format!("\"{part}\"")
            } else {
                part.into_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks that an external tool can be executed by running it with `-version`.
///
/// # Errors
///
/// * `CoreError::DependencyNotFound` - the executable does not exist at `path`
/// * `CoreError::CommandStart` - it exists but could not be started
/// * `CoreError::CommandFailed` - it ran but exited non-zero
pub fn check_dependency(path: &Path) -> CoreResult<()> {
    let name = path.display().to_string();
    let status = Command::new(path)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| {
            log::warn!("Dependency check for '{}' failed: {}", name, e);
            command_start_error(name.clone(), e)
        })?;

    if !status.success() {
        return Err(command_failed_error(
            name,
            status,
            "version check returned a non-zero exit code",
        ));
    }

    log::debug!("Found dependency: {}", path.display());
    Ok(())
}

/// Checks both ffmpeg and ffprobe inside `binary_dir`.
pub fn check_tools(binary_dir: &Path) -> CoreResult<()> {
    for tool in [ToolKind::Ffmpeg, ToolKind::Ffprobe] {
        check_dependency(&tool_path(binary_dir, tool))?;
    }
    Ok(())
}
