// ============================================================================
// vcompress-core/src/external/ffmpeg_executor.rs
// ============================================================================
//
// FFMPEG EXECUTOR: process seam between the encoder and ffmpeg-sidecar
//
// `FfmpegEncoder` never touches `FfmpegChild` directly. It asks an
// `FfmpegSpawner` for an `FfmpegProcess`, drains its events and waits for
// the exit status. Tests plug in `mocks::MockFfmpegSpawner` instead.

use crate::error::{CoreResult, command_failed_error, command_start_error, command_wait_error};
use ffmpeg_sidecar::child::FfmpegChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use std::process::ExitStatus;

/// A running ffmpeg process.
pub trait FfmpegProcess {
    /// Feeds every parsed event to `handler` until the process closes its output.
    ///
    /// If `handler` fails the process is stopped and the error returned.
    fn handle_events<F>(&mut self, handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>;

    /// Blocks until the process exits.
    fn wait(&mut self) -> CoreResult<ExitStatus>;
}

/// Launches ffmpeg commands.
pub trait FfmpegSpawner {
    type Process: FfmpegProcess;

    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process>;
}

/// `FfmpegProcess` backed by an `ffmpeg_sidecar` child.
pub struct SidecarProcess {
    child: FfmpegChild,
    program: String,
}

impl FfmpegProcess for SidecarProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        let events = self.child.iter().map_err(|e| {
            log::error!("Could not read events from {}: {}", self.program, e);
            command_failed_error(self.program.clone(), ExitStatus::default(), e.to_string())
        })?;

        for event in events {
            if let Err(e) = handler(event) {
                if let Err(kill_err) = self.child.kill() {
                    log::warn!("Could not stop {}: {}", self.program, kill_err);
                }
                return Err(e);
            }
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        self.child
            .wait()
            .map_err(|e| command_wait_error(self.program.clone(), e))
    }
}

/// Spawns commands through `ffmpeg_sidecar`.
#[derive(Debug, Clone, Default)]
pub struct SidecarSpawner;

impl FfmpegSpawner for SidecarSpawner {
    type Process = SidecarProcess;

    fn spawn(&self, mut cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        let program = cmd.as_inner().get_program().to_string_lossy().into_owned();
        match cmd.spawn() {
            Ok(child) => Ok(SidecarProcess { child, program }),
            Err(e) => Err(command_start_error(program, e)),
        }
    }
}
