// ============================================================================
// vcompress-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING: Error types and utilities for the CLI
//
// The CLI reuses vcompress-core's error type and only adds a way to attach
// context, plus the mapping from errors to user-facing hints.

use vcompress_core::{CoreError, CoreResult};

use std::fmt;

/// Type alias for CLI results using CoreError.
pub type CliResult<T> = CoreResult<T>;

/// Extension trait for adding context to errors in the CLI.
pub trait CliErrorContext<T> {
    /// Add context to an error.
    fn cli_context<C>(self, context: C) -> CliResult<T>
    where
        C: fmt::Display;
}

impl<T, E> CliErrorContext<T> for Result<T, E>
where
    E: Into<CoreError>,
{
    fn cli_context<C>(self, context: C) -> CliResult<T>
    where
        C: fmt::Display,
    {
        self.map_err(|e| {
            let core_error: CoreError = e.into();
            CoreError::OperationFailed(format!("{context}: {core_error}"))
        })
    }
}

/// Suggestion printed under a fatal error, if one applies.
pub fn suggestion_for(error: &CoreError) -> Option<&'static str> {
    match error {
        CoreError::DependencyNotFound(_) => Some(
            "Install ffmpeg or point --ffmpeg_bin_path (or VCOMPRESS_FFMPEG_BIN) at the folder containing ffmpeg and ffprobe",
        ),
        CoreError::PathError(_) => Some("Check that --folder names an existing directory"),
        CoreError::Config(_) => Some("Run with --help to see the accepted values"),
        CoreError::CommandFailed(..) => {
            Some("Re-run with --debug to see the exact ffmpeg invocation and its log")
        }
        _ => None,
    }
}
