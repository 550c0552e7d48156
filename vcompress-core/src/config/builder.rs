// ============================================================================
// vcompress-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for CoreConfig
//
// Provides a fluent API for creating CoreConfig instances. Every option except
// the root folder has a default; `build()` runs `CoreConfig::validate()` so a
// built configuration is always usable.

// ---- Standard library imports ----
use std::path::PathBuf;

// ---- Internal crate imports ----
use super::CoreConfig;
use crate::error::{CoreError, CoreResult};

/// Builder for creating CoreConfig instances.
///
/// # Examples
///
/// ```rust,no_run
/// use vcompress_core::config::CoreConfigBuilder;
/// use std::path::PathBuf;
///
/// let config = CoreConfigBuilder::new()
///     .root_dir(PathBuf::from("/path/to/videos"))
///     .recursive(false)
///     .quality(28)
///     .codec("libx265")
///     .extensions(["mp4", "mov"])
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct CoreConfigBuilder {
    // Required fields
    root_dir: Option<PathBuf>,

    // Optional fields with defaults
    config: CoreConfig,
}

impl Default for CoreConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CoreConfigBuilder {
    /// Creates a new CoreConfigBuilder with default values.
    pub fn new() -> Self {
        Self {
            root_dir: None,
            config: CoreConfig::default(),
        }
    }

    /// Sets the folder whose videos are compressed.
    pub fn root_dir(mut self, root_dir: PathBuf) -> Self {
        self.root_dir = Some(root_dir);
        self
    }

    /// Sets whether subdirectories are scanned.
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.config.recursive = recursive;
        self
    }

    /// Enables debug output (tool invocations, ffmpeg logs).
    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    /// Sets the directory containing the ffmpeg and ffprobe executables.
    pub fn binary_dir(mut self, binary_dir: PathBuf) -> Self {
        self.config.binary_dir = binary_dir;
        self
    }

    /// Sets the CRF quality value (lower is higher quality).
    pub fn quality(mut self, quality: u8) -> Self {
        self.config.quality = quality;
        self
    }

    /// Sets the encoder implementation passed to `-vcodec`.
    pub fn codec(mut self, codec: &str) -> Self {
        self.config.codec = codec.to_string();
        self
    }

    /// Replaces the supported extensions. Leading dots are stripped and case is folded.
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.config.extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim().trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self
    }

    /// Builds and validates a CoreConfig instance.
    ///
    /// # Errors
    ///
    /// * `CoreError::Config` if the root folder was never set
    /// * Any error returned by `CoreConfig::validate`
    pub fn build(self) -> CoreResult<CoreConfig> {
        let root_dir = self
            .root_dir
            .ok_or_else(|| CoreError::Config("A folder of videos is required".to_string()))?;

        let config = CoreConfig {
            root_dir,
            ..self.config
        };
        config.validate()?;
        Ok(config)
    }
}
