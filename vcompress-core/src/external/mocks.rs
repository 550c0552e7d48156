//! In-memory stand-ins for the external tools.
//!
//! These never launch a process. `MockEncoder` writes output files of a chosen
//! size, `MockMediaProbe` answers from tables, and `MockFfmpegSpawner` lets the
//! real `FfmpegEncoder` run against scripted process results.

use super::ffmpeg::{EncodeSettings, Encoder};
use super::ffmpeg_executor::{FfmpegProcess, FfmpegSpawner};
use super::ffprobe_executor::MediaProbe;
use crate::error::{CoreError, CoreResult, command_failed_error};

use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Builds an `ExitStatus` as if the process exited with `code`.
pub fn exit_status(code: i32) -> ExitStatus {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        ExitStatus::from_raw(code << 8)
    }
    #[cfg(windows)]
    {
        use std::os::windows::process::ExitStatusExt;
        ExitStatus::from_raw(code as u32)
    }
}

fn write_sized(path: &Path, size: u64) -> CoreResult<()> {
    File::create(path)?.set_len(size)?;
    Ok(())
}

/// What `MockEncoder` does for one input.
#[derive(Debug, Clone)]
pub enum MockEncode {
    /// Succeed with an output of exactly this many bytes
    Output(u64),
    /// Succeed without creating any output
    NoOutput,
    /// Write a partial output of this size, then exit non-zero
    PartialThenFail(u64),
    /// Write a partial output, raise the flag, then exit non-zero (Ctrl-C)
    Interrupt(Arc<AtomicBool>),
    /// Write a partial output, then panic
    Panic,
}

/// Scripted `Encoder`. Inputs without a script get an output half their size.
#[derive(Debug, Clone, Default)]
pub struct MockEncoder {
    scripts: Rc<RefCell<HashMap<PathBuf, MockEncode>>>,
    calls: Rc<RefCell<Vec<(PathBuf, PathBuf, EncodeSettings)>>>,
}

impl MockEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self, input: &Path, behavior: MockEncode) {
        self.scripts
            .borrow_mut()
            .insert(input.to_path_buf(), behavior);
    }

    /// (input, output, settings) for every `compress` call, in order.
    pub fn calls(&self) -> Vec<(PathBuf, PathBuf, EncodeSettings)> {
        self.calls.borrow().clone()
    }

    pub fn encoded_inputs(&self) -> Vec<PathBuf> {
        self.calls
            .borrow()
            .iter()
            .map(|(input, _, _)| input.clone())
            .collect()
    }
}

impl Encoder for MockEncoder {
    fn compress(&self, input: &Path, output: &Path, settings: &EncodeSettings) -> CoreResult<()> {
        self.calls
            .borrow_mut()
            .push((input.to_path_buf(), output.to_path_buf(), settings.clone()));

        let behavior = self.scripts.borrow().get(input).cloned();
        let behavior = match behavior {
            Some(behavior) => behavior,
            None => MockEncode::Output(std::fs::metadata(input)?.len() / 2),
        };

        match behavior {
            MockEncode::Output(size) => write_sized(output, size),
            MockEncode::NoOutput => Ok(()),
            MockEncode::PartialThenFail(size) => {
                write_sized(output, size)?;
                Err(command_failed_error(
                    "mock-ffmpeg",
                    exit_status(1),
                    format!("simulated failure for {}", input.display()),
                ))
            }
            MockEncode::Interrupt(flag) => {
                write_sized(output, 1)?;
                flag.store(true, Ordering::SeqCst);
                Err(command_failed_error(
                    "mock-ffmpeg",
                    exit_status(255),
                    "received signal 2".to_string(),
                ))
            }
            MockEncode::Panic => {
                write_sized(output, 1)?;
                panic!("simulated encoder crash on {}", input.display());
            }
        }
    }
}

/// Table-driven `MediaProbe`. Files are usable unless marked otherwise.
#[derive(Debug, Clone, Default)]
pub struct MockMediaProbe {
    durations: Rc<RefCell<HashMap<PathBuf, f64>>>,
    unusable: Rc<RefCell<HashSet<PathBuf>>>,
    usability_checks: Rc<RefCell<Vec<PathBuf>>>,
}

impl MockMediaProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_duration(&self, path: &Path, seconds: f64) {
        self.durations
            .borrow_mut()
            .insert(path.to_path_buf(), seconds);
    }

    pub fn mark_unusable(&self, path: &Path) {
        self.unusable.borrow_mut().insert(path.to_path_buf());
    }

    /// Paths passed to `is_usable`, in order.
    pub fn usability_checks(&self) -> Vec<PathBuf> {
        self.usability_checks.borrow().clone()
    }
}

impl MediaProbe for MockMediaProbe {
    fn duration_seconds(&self, path: &Path) -> CoreResult<f64> {
        self.durations.borrow().get(path).copied().ok_or_else(|| {
            CoreError::FfprobeParse(format!("no duration for {}", path.display()))
        })
    }

    fn is_usable(&self, path: &Path) -> bool {
        self.usability_checks
            .borrow_mut()
            .push(path.to_path_buf());
        path.exists() && !self.unusable.borrow().contains(path)
    }
}

/// Scripted ffmpeg process.
#[derive(Clone)]
pub struct MockFfmpegProcess {
    pub events_to_emit: Vec<FfmpegEvent>,
    pub exit_status: ExitStatus,
}

impl FfmpegProcess for MockFfmpegProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        for event in self.events_to_emit.drain(..) {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        Ok(self.exit_status)
    }
}

/// `FfmpegSpawner` that replays queued results and records each command line.
#[derive(Clone, Default)]
pub struct MockFfmpegSpawner {
    results: Rc<RefCell<Vec<CoreResult<MockFfmpegProcess>>>>,
    received_calls: Rc<RefCell<Vec<(String, Vec<String>)>>>,
}

impl MockFfmpegSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_exit(&self, code: i32, events: Vec<FfmpegEvent>) {
        self.results.borrow_mut().push(Ok(MockFfmpegProcess {
            events_to_emit: events,
            exit_status: exit_status(code),
        }));
    }

    pub fn push_spawn_error(&self, error: CoreError) {
        self.results.borrow_mut().push(Err(error));
    }

    /// (program, args) for every spawn, in order.
    pub fn received_calls(&self) -> Vec<(String, Vec<String>)> {
        self.received_calls.borrow().clone()
    }
}

impl FfmpegSpawner for MockFfmpegSpawner {
    type Process = MockFfmpegProcess;

    fn spawn(&self, mut cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        let inner = cmd.as_inner();
        let program = inner.get_program().to_string_lossy().into_owned();
        let args = inner
            .get_args()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        self.received_calls.borrow_mut().push((program, args));

        let mut results = self.results.borrow_mut();
        if results.is_empty() {
            log::warn!("MockFfmpegSpawner: no scripted result, reporting success");
            return Ok(MockFfmpegProcess {
                events_to_emit: Vec::new(),
                exit_status: exit_status(0),
            });
        }
        results.remove(0)
    }
}
