//! Run state and end-of-run reporting.
//!
//! `RunState` is the mutable aggregate of one batch run. It lives inside a
//! `RunGuard`, which finalizes the run exactly once: explicitly through
//! `RunGuard::finish`, or from `Drop` when the run ends by error or panic.
//! Finalizing removes any half-written output, recomputes the size of every
//! processed directory and prints the summary.

use crate::discovery::DirectoryScanner;
use crate::processing::{FileOutcome, FileReport};
use crate::terminal;
use crate::utils::{format_bytes, format_duration, format_percent};

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Mutable aggregate of a batch run.
#[derive(Debug)]
pub struct RunState {
    pub start: Instant,
    /// Total size of supported files in every directory, taken before it was processed
    pub start_size: u64,
    pub directories: Vec<PathBuf>,
    pub videos_compressed: usize,
    /// Output currently being written, if any
    pub current_output_file: Option<PathBuf>,
    pub reports: Vec<FileReport>,
}

impl RunState {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            start_size: 0,
            directories: Vec::new(),
            videos_compressed: 0,
            current_output_file: None,
            reports: Vec::new(),
        }
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}

/// What happened to the output that was in flight when the run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupOutcome {
    Removed(PathBuf),
    /// The file was already gone; the user is told to check manually
    Missing(PathBuf),
    Failed(PathBuf, String),
}

/// Final figures of a run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub elapsed: Duration,
    pub videos_compressed: usize,
    pub directories: Vec<PathBuf>,
    pub start_size: u64,
    /// Recomputed size of all processed directories; `None` if nothing was processed
    pub end_size: Option<u64>,
    pub cleanup: Option<CleanupOutcome>,
    pub reports: Vec<FileReport>,
}

impl RunSummary {
    /// Final total size divided by initial total size.
    pub fn size_ratio(&self) -> Option<f64> {
        match self.end_size {
            Some(end) if self.start_size > 0 => Some(end as f64 / self.start_size as f64),
            _ => None,
        }
    }

    pub fn count(&self, pred: impl Fn(&FileOutcome) -> bool) -> usize {
        self.reports.iter().filter(|r| pred(&r.outcome)).count()
    }
}

/// Owns the `RunState` and guarantees it is finalized once.
#[derive(Debug)]
pub struct RunGuard {
    state: RunState,
    scanner: DirectoryScanner,
    finished: bool,
}

impl RunGuard {
    /// `scanner` is used to recompute directory sizes at the end of the run.
    pub fn new(scanner: DirectoryScanner) -> Self {
        Self {
            state: RunState::new(),
            scanner,
            finished: false,
        }
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut RunState {
        &mut self.state
    }

    /// Finalizes the run and returns its summary.
    pub fn finish(mut self) -> RunSummary {
        self.finalize()
    }

    fn finalize(&mut self) -> RunSummary {
        self.finished = true;
        terminal::finish_progress();

        let cleanup = self
            .state
            .current_output_file
            .take()
            .map(|path| remove_unfinished_output(&path));

        let end_size = if self.state.start_size > 0 {
            Some(self.recompute_size())
        } else {
            None
        };

        let summary = RunSummary {
            elapsed: self.state.start.elapsed(),
            videos_compressed: self.state.videos_compressed,
            directories: self.state.directories.clone(),
            start_size: self.state.start_size,
            end_size,
            cleanup,
            reports: std::mem::take(&mut self.state.reports),
        };

        print_run_summary(&summary);
        summary
    }

    fn recompute_size(&self) -> u64 {
        let mut total = 0;
        for dir in &self.state.directories {
            match self.scanner.total_size(dir) {
                Ok(size) => total += size,
                Err(e) => log::warn!("Could not measure {}: {}", dir.display(), e),
            }
        }
        total
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        if !self.finished {
            log::debug!("Run ended without an explicit finish, finalizing");
            self.finalize();
        }
    }
}

fn remove_unfinished_output(path: &Path) -> CleanupOutcome {
    match std::fs::remove_file(path) {
        Ok(()) => {
            terminal::print_success(&format!("Removed unfinished output {}", path.display()));
            CleanupOutcome::Removed(path.to_path_buf())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            terminal::print_warning(&format!(
                "Unfinished output {} was not found; check for it and remove it manually",
                path.display()
            ));
            CleanupOutcome::Missing(path.to_path_buf())
        }
        Err(e) => {
            terminal::print_warning(&format!(
                "Could not remove unfinished output {}: {}",
                path.display(),
                e
            ));
            log::warn!("Cleanup of {} failed: {}", path.display(), e);
            CleanupOutcome::Failed(path.to_path_buf(), e.to_string())
        }
    }
}

/// Prints the outcome of one file.
pub fn print_file_report(report: &FileReport) {
    let name = report
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| report.input.display().to_string());

    match &report.outcome {
        FileOutcome::Skipped(reason) => {
            log::info!("  Skipping {}: {}", name, reason);
        }
        FileOutcome::Accepted => {
            if let Some(time) = report.encode_time {
                terminal::print_status("Encode time", &format_duration(time.as_secs_f64()), false);
            }
            if let Some(output_size) = report.output_size {
                terminal::print_status("Output size", &format_bytes(output_size), false);
                terminal::print_status("Size ratio", &format_percent(report.ratio()), true);
            }
            terminal::print_success(&format!("Kept {}, removed original", report.output.display()));
        }
        FileOutcome::Rejected(reason) => {
            if let Some(time) = report.encode_time {
                terminal::print_status("Encode time", &format_duration(time.as_secs_f64()), false);
            }
            if let Some(output_size) = report.output_size {
                terminal::print_status("Output size", &format_bytes(output_size), false);
                terminal::print_status("Size ratio", &format_percent(report.ratio()), false);
            }
            terminal::print_warning(&format!("Discarded output for {}: {}", name, reason));
        }
    }
}

/// Prints the end-of-run summary.
pub fn print_run_summary(summary: &RunSummary) {
    terminal::print_section("Summary");

    if let Some(ratio) = summary.size_ratio() {
        let end_size = summary.end_size.unwrap_or_default();
        terminal::print_status(
            "Total size",
            &format!(
                "Reduced to {} of original size [{} => {}]",
                format_percent(ratio),
                format_bytes(summary.start_size),
                format_bytes(end_size)
            ),
            true,
        );
    }

    let rejected = summary.count(|o| matches!(o, FileOutcome::Rejected(_)));
    let skipped = summary.count(|o| matches!(o, FileOutcome::Skipped(_)));
    terminal::print_status("Compressed", &summary.videos_compressed.to_string(), true);
    terminal::print_status("Discarded", &rejected.to_string(), false);
    terminal::print_status("Skipped", &skipped.to_string(), false);
    terminal::print_status(
        "Elapsed",
        &format_duration(summary.elapsed.as_secs_f64()),
        false,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn scanner() -> DirectoryScanner {
        DirectoryScanner::new(true, vec!["mp4".to_string()])
    }

    #[test]
    fn test_finish_without_directories() {
        let guard = RunGuard::new(scanner());
        let summary = guard.finish();
        assert_eq!(summary.videos_compressed, 0);
        assert_eq!(summary.end_size, None);
        assert_eq!(summary.size_ratio(), None);
        assert!(summary.cleanup.is_none());
    }

    #[test]
    fn test_finish_removes_in_flight_output() {
        let dir = tempdir().unwrap();
        let partial = dir.path().join("clip_compressed.mp4");
        std::fs::write(&partial, b"partial").unwrap();

        let mut guard = RunGuard::new(scanner());
        guard.state_mut().current_output_file = Some(partial.clone());
        let summary = guard.finish();

        assert_eq!(summary.cleanup, Some(CleanupOutcome::Removed(partial.clone())));
        assert!(!partial.exists());
    }

    #[test]
    fn test_missing_in_flight_output_is_a_warning() {
        let dir = tempdir().unwrap();
        let gone = dir.path().join("gone_compressed.mp4");

        let mut guard = RunGuard::new(scanner());
        guard.state_mut().current_output_file = Some(gone.clone());
        let summary = guard.finish();

        assert_eq!(summary.cleanup, Some(CleanupOutcome::Missing(gone)));
    }

    #[test]
    fn test_end_size_is_recomputed() {
        let dir = tempdir().unwrap();
        std::fs::File::create(dir.path().join("a.mp4"))
            .unwrap()
            .set_len(400)
            .unwrap();

        let mut guard = RunGuard::new(scanner());
        guard.state_mut().start_size = 1000;
        guard.state_mut().directories.push(dir.path().to_path_buf());
        let summary = guard.finish();

        assert_eq!(summary.end_size, Some(400));
        assert_eq!(summary.size_ratio(), Some(0.4));
    }

    #[test]
    fn test_drop_finalizes() {
        let dir = tempdir().unwrap();
        let partial = dir.path().join("x_compressed.mp4");
        std::fs::write(&partial, b"partial").unwrap();

        {
            let mut guard = RunGuard::new(scanner());
            guard.state_mut().current_output_file = Some(partial.clone());
        }

        assert!(!partial.exists());
    }
}
