//! File discovery module for finding video files to compress.
//!
//! A `DirectoryScanner` walks a root folder (optionally recursively) and
//! returns the files with a supported extension that are not generated
//! outputs. Generated outputs are recognised purely by the "compressed"
//! marker anywhere in their path, so an input legitimately named e.g.
//! `uncompressed_footage.mp4` is skipped as well.

use crate::config::{COMPRESSED_MARKER, CoreConfig, OUTPUT_SUFFIX};
use crate::error::{CoreError, CoreResult};

use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Returns true if the path carries the marker used for generated outputs.
#[must_use]
pub fn is_marked_compressed(path: &Path) -> bool {
    path.to_string_lossy().contains(COMPRESSED_MARKER)
}

/// Derives the output path for an input: `clip.mp4` -> `clip_compressed.mp4`.
///
/// The extension keeps its original case. Inputs without a file stem are rejected.
pub fn compressed_output_path(input: &Path) -> CoreResult<PathBuf> {
    let stem = input.file_stem().ok_or_else(|| {
        CoreError::PathError(format!("Failed to get filename stem for {}", input.display()))
    })?;

    let mut file_name = stem.to_os_string();
    file_name.push(OUTPUT_SUFFIX);
    if let Some(ext) = input.extension() {
        file_name.push(".");
        file_name.push(ext);
    }
    Ok(input.with_file_name(file_name))
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

/// Walks directories looking for supported video files.
///
/// Every call performs a fresh walk; nothing is cached between scans.
#[derive(Debug, Clone)]
pub struct DirectoryScanner {
    recursive: bool,
    extensions: Vec<String>,
}

impl DirectoryScanner {
    pub fn new(recursive: bool, extensions: Vec<String>) -> Self {
        Self {
            recursive,
            extensions,
        }
    }

    pub fn from_config(config: &CoreConfig) -> Self {
        Self::new(config.recursive, config.extensions.clone())
    }

    fn has_supported_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }

    /// Yields every regular file with a supported extension under `root`.
    fn supported_files(&self, root: &Path) -> CoreResult<Vec<PathBuf>> {
        if !root.is_dir() {
            return Err(CoreError::PathError(format!(
                "Folder '{}' does not exist or is not a directory",
                root.display()
            )));
        }

        let mut walker = WalkDir::new(root).sort_by_file_name();
        if !self.recursive {
            walker = walker.max_depth(1);
        }

        let files = walker
            .into_iter()
            .filter_entry(|entry| !is_hidden(entry))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(DirEntry::into_path)
            .filter(|path| self.has_supported_extension(path))
            .collect();

        Ok(files)
    }

    /// Finds the input files eligible for compression under `root`.
    ///
    /// # Errors
    ///
    /// * `CoreError::PathError` if `root` is not an existing directory
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use vcompress_core::DirectoryScanner;
    /// use std::path::Path;
    ///
    /// let scanner = DirectoryScanner::new(true, vec!["mp4".to_string()]);
    /// for file in scanner.scan(Path::new("/path/to/videos")).unwrap() {
    ///     println!("{}", file.display());
    /// }
    /// ```
    pub fn scan(&self, root: &Path) -> CoreResult<Vec<PathBuf>> {
        let files: Vec<PathBuf> = self
            .supported_files(root)?
            .into_iter()
            .filter(|path| !is_marked_compressed(path))
            .collect();

        log::debug!("Scan of {} found {} candidate file(s)", root.display(), files.len());
        Ok(files)
    }

    /// Sums the sizes of all supported files under `root`, generated outputs included.
    pub fn total_size(&self, root: &Path) -> CoreResult<u64> {
        let mut total = 0u64;
        for path in self.supported_files(root)? {
            match std::fs::metadata(&path) {
                Ok(metadata) => total += metadata.len(),
                // A file may vanish between the walk and the stat
                Err(e) => log::warn!("Could not read size of {}: {}", path.display(), e),
            }
        }
        Ok(total)
    }
}
