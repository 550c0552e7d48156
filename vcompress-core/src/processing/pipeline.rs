// ============================================================================
// vcompress-core/src/processing/pipeline.rs
// ============================================================================
//
// COMPRESSION PIPELINE: Sequential compress / verify / commit loop
//
// Files are handled strictly one at a time. For each candidate the pipeline
// records the output it is about to write, runs the encoder, clears the
// record and then either commits (delete the original) or rolls back (delete
// the output). An output is only ever final after it passed the accept test:
// it must be strictly smaller than the input and open as a video.
//
// If the encoder fails or the run is interrupted, the error propagates and
// the RunGuard removes whatever output was still being written.

use crate::config::CoreConfig;
use crate::discovery::{DirectoryScanner, is_marked_compressed};
use crate::error::{CoreError, CoreResult};
use crate::external::{EncodeSettings, Encoder, MediaProbe};
use crate::processing::{FileOutcome, FileReport, FileTask, RejectReason, SkipReason};
use crate::reporting::{RunGuard, RunState, RunSummary, print_file_report};
use crate::terminal;
use crate::utils::{compression_ratio, format_bytes, format_duration, get_filename_safe};

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Drives scanner, encoder and probe over one or more directories.
///
/// # Examples
///
/// ```rust,no_run
/// use vcompress_core::{CompressionPipeline, CoreConfig, FfmpegEncoder, FfprobeMediaProbe};
/// use std::path::PathBuf;
///
/// let config = CoreConfig::new(PathBuf::from("/videos"));
/// let encoder = FfmpegEncoder::new(&config.binary_dir);
/// let probe = FfprobeMediaProbe::new(&config.binary_dir, config.debug);
///
/// let mut pipeline = CompressionPipeline::new(&config, &encoder, &probe);
/// pipeline.compress_dir(&config.root_dir).unwrap();
/// let summary = pipeline.finish();
/// println!("{} file(s) compressed", summary.videos_compressed);
/// ```
pub struct CompressionPipeline<'a, E: Encoder, P: MediaProbe> {
    config: &'a CoreConfig,
    encoder: &'a E,
    probe: &'a P,
    scanner: DirectoryScanner,
    settings: EncodeSettings,
    guard: RunGuard,
    abort: Option<Arc<AtomicBool>>,
}

impl<'a, E: Encoder, P: MediaProbe> CompressionPipeline<'a, E, P> {
    pub fn new(config: &'a CoreConfig, encoder: &'a E, probe: &'a P) -> Self {
        let scanner = DirectoryScanner::from_config(config);
        Self {
            config,
            encoder,
            probe,
            guard: RunGuard::new(scanner.clone()),
            scanner,
            settings: EncodeSettings::from_config(config),
            abort: None,
        }
    }

    /// A raised flag stops the run before the next file with `CoreError::Interrupted`.
    pub fn with_abort_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.abort = Some(flag);
        self
    }

    pub fn state(&self) -> &RunState {
        self.guard.state()
    }

    /// Finalizes the run: cleanup, size recomputation and summary.
    pub fn finish(self) -> RunSummary {
        self.guard.finish()
    }

    fn aborted(&self) -> bool {
        self.abort
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    /// Compresses every candidate file under `root`.
    ///
    /// # Errors
    ///
    /// * `CoreError::PathError` if `root` is not a directory
    /// * `CoreError::Interrupted` if the abort flag was raised
    /// * Any encoder error; the run must then be finished or dropped
    pub fn compress_dir(&mut self, root: &Path) -> CoreResult<()> {
        let initial_size = self.scanner.total_size(root)?;
        let files = self.scanner.scan(root)?;

        {
            let state = self.guard.state_mut();
            state.start_size += initial_size;
            state.directories.push(root.to_path_buf());
        }

        terminal::print_section("Compressing");
        terminal::print_status("Folder", &root.display().to_string(), true);
        terminal::print_status("Recursive", if self.config.recursive { "yes" } else { "no" }, false);
        terminal::print_status("Files found", &files.len().to_string(), false);
        terminal::print_status("Initial size", &format_bytes(initial_size), false);

        if files.is_empty() {
            log::info!("No video files found in {}", root.display());
            return Ok(());
        }

        terminal::start_progress(files.len() as u64, "Compressing");
        for file in &files {
            if self.aborted() {
                log::warn!("Interrupt received, stopping before {}", file.display());
                return Err(CoreError::Interrupted);
            }
            self.process_file(file)?;
            terminal::advance_progress();
        }
        terminal::finish_progress();

        if self.aborted() {
            log::warn!("Interrupt received while compressing {}", root.display());
            return Err(CoreError::Interrupted);
        }

        Ok(())
    }

    /// Runs one input through select, encode and the accept policy.
    pub fn process_file(&mut self, input: &Path) -> CoreResult<FileOutcome> {
        let task = FileTask::new(input)?;

        if let Some(reason) = self.skip_reason(&task) {
            let input_size = std::fs::metadata(&task.input).map(|m| m.len()).unwrap_or(0);
            return Ok(self.record(task, input_size, None, None, FileOutcome::Skipped(reason)));
        }

        let input_size = std::fs::metadata(&task.input)?.len();
        let duration = match self.probe.duration_seconds(&task.input) {
            Ok(seconds) => format_duration(seconds),
            Err(e) => {
                log::warn!("Could not read duration of {}: {}", task.input.display(), e);
                "unknown".to_string()
            }
        };

        terminal::print_processing(&get_filename_safe(&task.input)?);
        terminal::print_status("Input size", &format_bytes(input_size), false);
        terminal::print_status("Duration", &duration, false);

        if self.aborted() {
            log::warn!("Interrupt received, not starting {}", task.input.display());
            return Err(CoreError::Interrupted);
        }

        self.guard.state_mut().current_output_file = Some(task.output.clone());
        let started = Instant::now();
        if let Err(e) = self.encoder.compress(&task.input, &task.output, &self.settings) {
            if self.aborted() {
                log::debug!("Encoder stopped by interrupt: {}", e);
                return Err(CoreError::Interrupted);
            }
            return Err(e);
        }
        // The output stays in flight so the guard removes it.
        if self.aborted() {
            log::warn!("Interrupt received while compressing {}", task.input.display());
            return Err(CoreError::Interrupted);
        }
        let encode_time = started.elapsed();
        self.guard.state_mut().current_output_file = None;

        let output_size = match std::fs::metadata(&task.output) {
            Ok(metadata) => metadata.len(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::warn!("Encoder reported success but {} is missing", task.output.display());
                let outcome = FileOutcome::Rejected(RejectReason::MissingOutput);
                return Ok(self.record(task, input_size, None, Some(encode_time), outcome));
            }
            Err(e) => return Err(e.into()),
        };

        let ratio = compression_ratio(input_size, output_size);
        let outcome = if ratio >= 1.0 {
            FileOutcome::Rejected(RejectReason::NotSmaller)
        } else if !self.probe.is_usable(&task.output) {
            FileOutcome::Rejected(RejectReason::Unusable)
        } else {
            FileOutcome::Accepted
        };

        match outcome {
            FileOutcome::Accepted => {
                let removed = std::fs::remove_file(&task.input);
                self.guard.state_mut().videos_compressed += 1;
                if let Err(e) = removed {
                    log::warn!(
                        "Kept {} but could not remove original {}: {}",
                        task.output.display(),
                        task.input.display(),
                        e
                    );
                    self.record(task, input_size, Some(output_size), Some(encode_time), outcome);
                    return Err(e.into());
                }
                log::debug!("Replaced {} with {}", task.input.display(), task.output.display());
            }
            _ => {
                if let Err(e) = std::fs::remove_file(&task.output) {
                    log::warn!("Could not remove rejected output {}: {}", task.output.display(), e);
                }
            }
        }

        Ok(self.record(task, input_size, Some(output_size), Some(encode_time), outcome))
    }

    fn skip_reason(&self, task: &FileTask) -> Option<SkipReason> {
        if task.output.exists() {
            Some(SkipReason::OutputExists)
        } else if !self.config.is_supported_extension(&task.input) {
            Some(SkipReason::UnsupportedExtension)
        } else if is_marked_compressed(&task.input) {
            Some(SkipReason::AlreadyCompressed)
        } else {
            None
        }
    }

    fn record(
        &mut self,
        task: FileTask,
        input_size: u64,
        output_size: Option<u64>,
        encode_time: Option<std::time::Duration>,
        outcome: FileOutcome,
    ) -> FileOutcome {
        let report = FileReport {
            input: task.input,
            output: task.output,
            input_size,
            output_size,
            encode_time,
            outcome,
        };
        print_file_report(&report);
        self.guard.state_mut().reports.push(report);
        outcome
    }
}

/// Compresses `config.root_dir` and returns the run summary.
///
/// The summary is printed whether or not the run succeeds; on error the
/// in-flight output is removed before the error is returned.
pub fn run_compression<E: Encoder, P: MediaProbe>(
    config: &CoreConfig,
    encoder: &E,
    probe: &P,
    abort: Option<Arc<AtomicBool>>,
) -> CoreResult<RunSummary> {
    let mut pipeline = CompressionPipeline::new(config, encoder, probe);
    if let Some(flag) = abort {
        pipeline = pipeline.with_abort_flag(flag);
    }
    pipeline.compress_dir(&config.root_dir)?;
    Ok(pipeline.finish())
}
