//! FFmpeg-backed encoder.
//!
//! Builds the compression command line and runs it through an `FfmpegSpawner`.
//! The encoder never inspects the output file; deciding whether a result is
//! kept is the pipeline's job.

use crate::config::CoreConfig;
use crate::error::{CoreResult, command_failed_error};
use crate::external::ffmpeg_executor::{FfmpegProcess, FfmpegSpawner, SidecarSpawner};
use crate::external::{ToolKind, describe_command, tool_path};
use crate::terminal;

use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use std::path::{Path, PathBuf};

/// Codec and quality options for one encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeSettings {
    pub codec: String,
    pub quality: u8,
    pub debug: bool,
}

impl EncodeSettings {
    pub fn from_config(config: &CoreConfig) -> Self {
        Self {
            codec: config.codec.clone(),
            quality: config.quality,
            debug: config.debug,
        }
    }
}

/// Transcodes one input file into one output file.
pub trait Encoder {
    /// Creates (or overwrites) `output` from `input`.
    ///
    /// # Errors
    ///
    /// * `CoreError::DependencyNotFound` / `CoreError::CommandStart` if the tool cannot be launched
    /// * `CoreError::CommandFailed` if the tool exits non-zero
    fn compress(&self, input: &Path, output: &Path, settings: &EncodeSettings) -> CoreResult<()>;
}

/// Builds `ffmpeg [-loglevel quiet -stats] -y -i <input> -vcodec <codec> -crf <crf> <output>`.
///
/// The quiet flags are left out in debug mode so ffmpeg's own log reaches the debug log.
pub fn build_compress_command(
    ffmpeg: &Path,
    input: &Path,
    output: &Path,
    settings: &EncodeSettings,
) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::new_with_path(ffmpeg);
    if !settings.debug {
        cmd.args(["-loglevel", "quiet", "-stats"]);
    }
    cmd.arg("-y");
    cmd.input(&*input.to_string_lossy());
    cmd.args(["-vcodec", settings.codec.as_str()]);
    cmd.args(["-crf", settings.quality.to_string().as_str()]);
    cmd.output(&*output.to_string_lossy());
    cmd
}

/// `Encoder` implementation that shells out to ffmpeg.
#[derive(Debug, Clone)]
pub struct FfmpegEncoder<S: FfmpegSpawner = SidecarSpawner> {
    ffmpeg: PathBuf,
    spawner: S,
}

impl FfmpegEncoder<SidecarSpawner> {
    /// Encoder using `<binary_dir>/ffmpeg` (`ffmpeg.exe` on Windows).
    pub fn new(binary_dir: &Path) -> Self {
        Self::with_spawner(binary_dir, SidecarSpawner)
    }
}

impl<S: FfmpegSpawner> FfmpegEncoder<S> {
    pub fn with_spawner(binary_dir: &Path, spawner: S) -> Self {
        Self {
            ffmpeg: tool_path(binary_dir, ToolKind::Ffmpeg),
            spawner,
        }
    }

    pub fn ffmpeg_path(&self) -> &Path {
        &self.ffmpeg
    }
}

impl<S: FfmpegSpawner> Encoder for FfmpegEncoder<S> {
    fn compress(&self, input: &Path, output: &Path, settings: &EncodeSettings) -> CoreResult<()> {
        let mut cmd = build_compress_command(&self.ffmpeg, input, output, settings);
        let invocation = describe_command(cmd.as_inner());

        if settings.debug {
            terminal::print_command(&invocation);
        }
        log::debug!("Running compression command: {}", invocation);

        let mut process = self.spawner.spawn(cmd)?;

        let mut last_error: Option<String> = None;
        process.handle_events(|event| {
            match event {
                FfmpegEvent::Progress(progress) => {
                    terminal::set_progress_message(&format!(
                        "time={} speed={:.2}x",
                        progress.time, progress.speed
                    ));
                }
                FfmpegEvent::Error(line) => {
                    log::debug!("ffmpeg: {}", line);
                    last_error = Some(line);
                }
                FfmpegEvent::Log(_, line) if settings.debug => {
                    log::debug!("ffmpeg: {}", line);
                }
                _ => {}
            }
            Ok(())
        })?;

        let status = process.wait()?;
        terminal::set_progress_message("");

        if !status.success() {
            log::error!("ffmpeg exited with {} while compressing {}", status, input.display());
            return Err(command_failed_error(
                self.ffmpeg.display().to_string(),
                status,
                last_error.unwrap_or_else(|| format!("failed to compress {}", input.display())),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_of(cmd: &mut FfmpegCommand) -> Vec<String> {
        cmd.as_inner()
            .get_args()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }

    fn position(args: &[String], value: &str) -> usize {
        args.iter()
            .position(|arg| arg == value)
            .unwrap_or_else(|| panic!("missing argument {value} in {args:?}"))
    }

    #[test]
    fn test_compress_command_quiet() {
        let settings = EncodeSettings {
            codec: "libx264".to_string(),
            quality: 30,
            debug: false,
        };
        let mut cmd = build_compress_command(
            Path::new("/usr/bin/ffmpeg"),
            Path::new("/v/a.mp4"),
            Path::new("/v/a_compressed.mp4"),
            &settings,
        );
        let args = args_of(&mut cmd);

        assert_eq!(cmd.as_inner().get_program(), "/usr/bin/ffmpeg");
        assert_eq!(args[position(&args, "quiet") - 1], "-loglevel");
        assert!(args.contains(&"-stats".to_string()));
        assert_eq!(args[position(&args, "-i") + 1], "/v/a.mp4");
        assert_eq!(args[position(&args, "-vcodec") + 1], "libx264");
        assert_eq!(args[position(&args, "-crf") + 1], "30");
        assert_eq!(args.last().map(String::as_str), Some("/v/a_compressed.mp4"));
        assert!(position(&args, "-stats") < position(&args, "-i"));
        assert!(position(&args, "-y") < position(&args, "-i"));
    }

    #[test]
    fn test_compress_command_debug_keeps_logs() {
        let settings = EncodeSettings {
            codec: "libx265".to_string(),
            quality: 18,
            debug: true,
        };
        let mut cmd = build_compress_command(
            Path::new("ffmpeg"),
            Path::new("in.wmv"),
            Path::new("in_compressed.wmv"),
            &settings,
        );
        let args = args_of(&mut cmd);

        assert!(!args.contains(&"quiet".to_string()));
        assert!(!args.contains(&"-stats".to_string()));
        assert!(args.contains(&"-y".to_string()));
        assert_eq!(args[position(&args, "-vcodec") + 1], "libx265");
        assert_eq!(args[position(&args, "-crf") + 1], "18");
    }

    #[test]
    fn test_settings_from_config() {
        let mut config = CoreConfig::default();
        config.codec = "libsvtav1".to_string();
        config.quality = 35;
        config.debug = true;
        assert_eq!(
            EncodeSettings::from_config(&config),
            EncodeSettings {
                codec: "libsvtav1".to_string(),
                quality: 35,
                debug: true,
            }
        );
    }
}
