//! Implementation of the 'analyze' subcommand.
//!
//! Replays recorded detector output for one video through the scoring-event
//! detector, stores the resulting frame trace and clips, and prints the clips.

use std::time::Instant;

use courtcut_core::analysis::{DetectionLog, PassThrough, StopMarker, analyze_video};
use courtcut_core::model::ClipInterval;
use courtcut_core::progress::{LogProgress, ProgressFile};
use courtcut_core::terminal::{self, TerminalProgress};
use courtcut_core::utils::video_id;
use courtcut_core::{CoreConfig, CoreError, RunStatus, format_duration};

use log::{info, warn};

use crate::cli::AnalyzeArgs;
use crate::error::CliResult;

use super::{open_catalog, probe_frame_rate};

/// Applies the per-run overrides to the base configuration.
fn analysis_config(args: &AnalyzeArgs, base: &CoreConfig) -> CliResult<CoreConfig> {
    let mut config = base.clone();
    if let Some(pad) = args.start_pad {
        config.events.start_pad_secs = pad;
    }
    if let Some(pad) = args.end_pad {
        config.events.end_pad_secs = pad;
    }
    config.validate()?;
    Ok(config)
}

pub fn run_analyze(args: AnalyzeArgs, base: &CoreConfig) -> CliResult<()> {
    let config = analysis_config(&args, base)?;
    let video = video_id(&args.video)?;
    let catalog = open_catalog(&config)?;

    let zone = catalog.zone(&video)?;
    if zone.is_none() {
        warn!("No goal zone stored for {video}; only the frame trace will be recorded");
    }

    let fps = args.fps.or_else(|| probe_frame_rate(&args.video));
    let mut source = DetectionLog::open(&args.detections, fps)?;

    terminal::print_section("Analysis");
    terminal::print_status("Video", &video, true);
    terminal::print_status("Detections", &args.detections.display().to_string(), false);
    terminal::print_status(
        "Frame rate",
        &fps.map_or_else(
            || format!("{} (default)", config.events.fallback_fps),
            |f| format!("{f:.3}"),
        ),
        false,
    );

    let marker = StopMarker::in_dir(&config.work_dir);
    marker.clear()?;
    let progress = (
        (ProgressFile::in_dir(&config.work_dir), LogProgress::default()),
        TerminalProgress::new(&video),
    );

    let started = Instant::now();
    let report = analyze_video(
        &video,
        &mut source,
        &mut PassThrough,
        zone,
        &marker,
        &progress,
        &config,
    );
    drop(progress);

    catalog.put_analysis(&report.record)?;
    info!(
        "Stored analysis of {} ({} frames) in {}",
        video,
        report.record.trace.len(),
        format_duration(started.elapsed().as_secs_f64())
    );

    print_clips(&report.record.clips);

    match report.status {
        RunStatus::Completed => {
            terminal::print_success(&format!(
                "Analysis complete: {} clip(s) from {} frames",
                report.record.clips.len(),
                report.record.trace.len()
            ));
            Ok(())
        }
        RunStatus::Cancelled => {
            marker.clear()?;
            terminal::print_warning(&format!(
                "Analysis stopped after {} frames; partial results stored",
                report.record.trace.len()
            ));
            Ok(())
        }
        RunStatus::Failed(reason) => Err(CoreError::OperationFailed(format!(
            "Analysis of {video} failed after {} frames: {reason}",
            report.record.trace.len()
        ))),
    }
}

/// Prints highlight clips as `start - end` lines.
pub fn print_clips(clips: &[ClipInterval]) {
    terminal::print_processing(&format!("Highlight clips ({})", clips.len()));
    if clips.is_empty() {
        terminal::print_sub_item("none");
    }
    for clip in clips {
        terminal::print_sub_item(&format!(
            "{:>9.2}s - {:>9.2}s  ({:.2}s)",
            clip.start,
            clip.end,
            clip.duration()
        ));
    }
}
