//! Running ffmpeg.
//!
//! Audio extraction talks to ffmpeg only through [`FfmpegSpawner`] and
//! [`FfmpegProcess`], so tests can hand it a fake process that writes PCM
//! directly. [`SidecarSpawner`] is the real implementation.

use std::process::ExitStatus;

use ffmpeg_sidecar::child::FfmpegChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;

use crate::error::{CoreResult, command_failed_error, command_start_error, command_wait_error};

/// A started ffmpeg run.
pub trait FfmpegProcess {
    /// Feeds every event of the run to `on_event`, stopping at the first error.
    fn handle_events<F>(&mut self, on_event: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>;

    fn wait(&mut self) -> CoreResult<ExitStatus>;
}

/// Starts ffmpeg runs.
pub trait FfmpegSpawner {
    type Process: FfmpegProcess;

    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process>;
}

pub struct SidecarProcess(FfmpegChild);

impl FfmpegProcess for SidecarProcess {
    fn handle_events<F>(&mut self, mut on_event: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        let events = match self.0.iter() {
            Ok(events) => events,
            Err(e) => {
                return Err(command_failed_error(
                    "ffmpeg (event stream)",
                    ExitStatus::default(),
                    e.to_string(),
                ));
            }
        };
        events.map(&mut on_event).collect()
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        self.0.wait().map_err(|e| command_wait_error("ffmpeg", e))
    }
}

/// Spawns the `ffmpeg` found on PATH via ffmpeg-sidecar.
#[derive(Debug, Clone, Copy, Default)]
pub struct SidecarSpawner;

impl FfmpegSpawner for SidecarSpawner {
    type Process = SidecarProcess;

    fn spawn(&self, mut cmd: FfmpegCommand) -> CoreResult<SidecarProcess> {
        match cmd.spawn() {
            Ok(child) => Ok(SidecarProcess(child)),
            Err(e) => Err(command_start_error("ffmpeg", e)),
        }
    }
}

/// Spawns `cmd`, drains its events and checks the exit status. On failure
/// the error carries every log line ffmpeg printed.
pub fn run_to_completion<S: FfmpegSpawner>(
    spawner: &S,
    mut cmd: FfmpegCommand,
    label: &str,
) -> CoreResult<()> {
    let command_line = cmd
        .as_inner()
        .get_args()
        .map(|arg| arg.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ");
    log::debug!("ffmpeg [{label}] {command_line}");

    let mut process = spawner.spawn(cmd)?;
    let mut log_lines = Vec::new();
    process.handle_events(|event| {
        if let FfmpegEvent::Log(_, line) | FfmpegEvent::Error(line) = event {
            log_lines.push(line);
        }
        Ok(())
    })?;

    let status = process.wait()?;
    if status.success() {
        return Ok(());
    }
    log::error!("ffmpeg [{label}] exited with {status}");
    Err(command_failed_error(
        format!("ffmpeg ({label})"),
        status,
        log_lines.join("\n"),
    ))
}
