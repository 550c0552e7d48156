//! Command implementations for the CLI.

/// The compression run: configuration, dependency checks and the core pipeline.
pub mod compress;
