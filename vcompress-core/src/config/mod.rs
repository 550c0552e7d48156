//! Configuration structures and constants for the vcompress-core library.
//!
//! A `CoreConfig` is built once at startup (usually by vcompress-cli) and is
//! read-only for the rest of the run.

mod builder;

use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};

pub use builder::CoreConfigBuilder;

// Default constants

/// Default CRF (Constant Rate Factor). Lower values produce higher quality but larger files.
pub const DEFAULT_CRF: u8 = 30;

/// Highest CRF accepted by any encoder we drive (libx264/libx265 stop at 51, AV1 at 63).
pub const MAX_CRF: u8 = 63;

/// Default video codec passed to `-vcodec`.
pub const DEFAULT_VIDEO_CODEC: &str = "libx264";

/// Container extensions processed when none are configured.
pub const DEFAULT_EXTENSIONS: [&str; 2] = ["mp4", "wmv"];

/// Suffix inserted before the extension of every generated output.
pub const OUTPUT_SUFFIX: &str = "_compressed";

/// Any path containing this marker is treated as an already generated output.
pub const COMPRESSED_MARKER: &str = "compressed";

/// Directory holding the ffmpeg and ffprobe executables when none is given.
pub fn default_binary_dir() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from(r"C:\ffmpeg\bin")
    } else if cfg!(target_os = "macos") {
        PathBuf::from("/usr/local/bin")
    } else {
        PathBuf::from("/usr/bin")
    }
}

/// Main configuration structure for the vcompress-core library.
///
/// # Examples
///
/// ```rust
/// use vcompress_core::CoreConfig;
/// use std::path::PathBuf;
///
/// let config = CoreConfig::new(PathBuf::from("/videos"));
/// assert!(config.recursive);
/// assert_eq!(config.quality, 30);
/// assert_eq!(config.codec, "libx264");
/// ```
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Directory whose videos are compressed
    pub root_dir: PathBuf,

    /// Whether subdirectories of `root_dir` are scanned too
    pub recursive: bool,

    /// Echo tool invocations and forward ffmpeg logs
    pub debug: bool,

    /// Directory containing the ffmpeg and ffprobe executables
    pub binary_dir: PathBuf,

    /// CRF passed to the encoder
    pub quality: u8,

    /// Encoder implementation passed to `-vcodec`
    pub codec: String,

    /// Supported input extensions, lowercase and without the leading dot
    pub extensions: Vec<String>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            recursive: true,
            debug: false,
            binary_dir: default_binary_dir(),
            quality: DEFAULT_CRF,
            codec: DEFAULT_VIDEO_CODEC.to_string(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|ext| (*ext).to_string()).collect(),
        }
    }
}

impl CoreConfig {
    /// Creates a configuration for `root_dir` with every other option at its default.
    pub fn new(root_dir: PathBuf) -> Self {
        Self {
            root_dir,
            ..Self::default()
        }
    }

    /// Returns true if `path` has one of the configured extensions (case-insensitive).
    #[must_use]
    pub fn is_supported_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }

    /// Validates the configuration before any scanning starts.
    pub fn validate(&self) -> CoreResult<()> {
        if !self.root_dir.is_dir() {
            return Err(CoreError::PathError(format!(
                "Folder '{}' does not exist or is not a directory",
                self.root_dir.display()
            )));
        }

        if self.quality > MAX_CRF {
            return Err(CoreError::Config(format!(
                "CRF must be between 0 and {MAX_CRF}, got {}",
                self.quality
            )));
        }

        if self.codec.trim().is_empty() {
            return Err(CoreError::Config("Video codec must not be empty".to_string()));
        }

        if self.extensions.is_empty() {
            return Err(CoreError::Config(
                "At least one file extension must be supported".to_string(),
            ));
        }

        if let Some(bad) = self
            .extensions
            .iter()
            .find(|ext| ext.is_empty() || ext.contains('.') || ext.contains(std::path::is_separator))
        {
            return Err(CoreError::Config(format!("Invalid file extension '{bad}'")));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CoreConfig::default();
        assert!(config.recursive);
        assert!(!config.debug);
        assert_eq!(config.quality, 30);
        assert_eq!(config.codec, "libx264");
        assert_eq!(config.extensions, vec!["mp4".to_string(), "wmv".to_string()]);
        assert_eq!(config.binary_dir, default_binary_dir());
    }

    #[test]
    fn test_is_supported_extension() {
        let config = CoreConfig::default();
        assert!(config.is_supported_extension(Path::new("a.mp4")));
        assert!(config.is_supported_extension(Path::new("a.MP4")));
        assert!(config.is_supported_extension(Path::new("dir/b.Wmv")));
        assert!(!config.is_supported_extension(Path::new("c.mkv")));
        assert!(!config.is_supported_extension(Path::new("mp4")));
    }

    #[test]
    fn test_validate() {
        let dir = std::env::temp_dir();
        let mut config = CoreConfig::new(dir.clone());
        assert!(config.validate().is_ok());

        config.quality = 64;
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
        config.quality = 0;
        assert!(config.validate().is_ok());

        config.codec = "  ".to_string();
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
        config.codec = "libx265".to_string();

        config.extensions.clear();
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
        config.extensions = vec![".mp4".to_string()];
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));

        let missing = CoreConfig::new(dir.join("surely_this_does_not_exist_vcompress"));
        assert!(matches!(missing.validate(), Err(CoreError::PathError(_))));
    }
}
