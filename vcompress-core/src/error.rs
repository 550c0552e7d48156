//! Error types for the vcompress-core library.
//!
//! `CoreError` covers every failure the pipeline can surface: bad configuration,
//! external tools that cannot be launched or exit non-zero, unparsable probe
//! output, and filesystem errors. Rejected outputs are not errors; they are
//! reported through `FileOutcome`.

use std::io;
use std::process::ExitStatus;
use thiserror::Error;

/// Custom error types for vcompress-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Directory traversal error: {0}")]
    Walkdir(#[from] walkdir::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Path error: {0}")]
    PathError(String),

    #[error("Required external command not found: {0}")]
    DependencyNotFound(String),

    #[error("Failed to start command '{0}': {1}")]
    CommandStart(String, #[source] io::Error),

    #[error("Failed waiting for command '{0}': {1}")]
    CommandWait(String, #[source] io::Error),

    #[error("Command '{0}' failed with status {1}: {2}")]
    CommandFailed(String, ExitStatus, String),

    #[error("Failed to parse ffprobe output: {0}")]
    FfprobeParse(String),

    #[error("Run interrupted by user")]
    Interrupted,

    #[error("{0}")]
    OperationFailed(String),
}

/// Result type for vcompress-core operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Builds the error for a command that could not be spawned.
///
/// A missing binary is reported as `DependencyNotFound` so the attempted path
/// reaches the user verbatim.
pub fn command_start_error(cmd_name: impl Into<String>, err: io::Error) -> CoreError {
    let cmd_name = cmd_name.into();
    if err.kind() == io::ErrorKind::NotFound {
        CoreError::DependencyNotFound(cmd_name)
    } else {
        CoreError::CommandStart(cmd_name, err)
    }
}

pub fn command_wait_error(cmd_name: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandWait(cmd_name.into(), err)
}

pub fn command_failed_error(
    cmd_name: impl Into<String>,
    status: ExitStatus,
    detail: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed(cmd_name.into(), status, detail.into())
}
