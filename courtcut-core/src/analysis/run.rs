// ============================================================================
// courtcut-core/src/analysis/run.rs
// ============================================================================
//
// ANALYSIS DRIVER: Single pass over one video
//
// Pulls frames from a FrameSource, runs the detector on each, reduces the
// detections to a FrameRecord, feeds the event state machine and keeps the
// full frame trace. Cancellation is polled before every frame. Whatever was
// processed before a stop or a failure is still returned.

use log::{error, info, warn};

use crate::analysis::cancel::CancellationSignal;
use crate::analysis::events::EventDetector;
use crate::analysis::intervals::merge_intervals;
use crate::analysis::source::{FrameSource, ObjectDetector};
use crate::config::CoreConfig;
use crate::model::{AnalysisRecord, FrameRecord, FrameTrace, GoalZone};
use crate::progress::{ProgressReporter, ProgressStatus, ProgressUpdate};

/// How an analysis run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    /// Stopped through the cancellation signal.
    Cancelled,
    /// The source or detector failed part-way.
    Failed(String),
}

impl RunStatus {
    fn progress_status(&self) -> ProgressStatus {
        match self {
            RunStatus::Completed => ProgressStatus::Done,
            RunStatus::Cancelled => ProgressStatus::Stopped,
            RunStatus::Failed(_) => ProgressStatus::Error,
        }
    }
}

/// Outcome of [`analyze_video`]. The record holds every frame processed,
/// whatever the status.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    pub status: RunStatus,
    pub record: AnalysisRecord,
}

fn percent(index: u64, total: Option<u64>) -> u8 {
    match total {
        Some(total) if total > 0 => ((index * 100) / total).min(100) as u8,
        _ => 0,
    }
}

/// Analyzes one video.
///
/// Frame indices are 1-based and frame `i` is stamped `i / fps`. A missing
/// goal zone only disables event detection; the frame trace is still built.
pub fn analyze_video<Src, Det, C, P>(
    video: &str,
    source: &mut Src,
    detector: &mut Det,
    zone: Option<GoalZone>,
    cancel: &C,
    progress: &P,
    config: &CoreConfig,
) -> AnalysisReport
where
    Src: FrameSource,
    Det: ObjectDetector<Src::Frame>,
    C: CancellationSignal + ?Sized,
    P: ProgressReporter + ?Sized,
{
    let mut events = EventDetector::new(
        zone,
        source.frame_rate().unwrap_or(0.0),
        &config.events,
    );
    let fps = events.fps();
    let total = source.frame_count();
    info!(
        "Analyzing {} at {:.3} fps ({} frames)",
        video,
        fps,
        total.map_or_else(|| "unknown".to_string(), |t| t.to_string())
    );

    progress.report(&ProgressUpdate::running(video, 0));

    let mut frames: Vec<FrameRecord> = Vec::new();
    let mut raw_clips = Vec::new();
    let mut index = 0u64;
    let mut last_percent = 0u8;

    let status = loop {
        if cancel.is_cancelled() {
            warn!("Stop requested; ending analysis of {video} after {index} frames");
            break RunStatus::Cancelled;
        }

        let frame = match source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => break RunStatus::Completed,
            Err(e) => {
                error!("Reading frame {} of {} failed: {}", index + 1, video, e);
                break RunStatus::Failed(e.to_string());
            }
        };
        index += 1;

        let detections = match detector.detect(&frame) {
            Ok(detections) => detections,
            Err(e) => {
                error!("Detection on frame {} of {} failed: {}", index, video, e);
                break RunStatus::Failed(e.to_string());
            }
        };

        let record =
            FrameRecord::from_detections(index as f64 / fps, &detections, &config.thresholds);
        if let Some(clip) = events.observe(index, &record) {
            raw_clips.push(clip);
        }
        frames.push(record);

        let current = percent(index, total);
        if current != last_percent {
            last_percent = current;
            progress.report(&ProgressUpdate::running(video, current));
        }
    };

    let clips = merge_intervals(&raw_clips);
    let final_percent = if status == RunStatus::Completed {
        100
    } else {
        last_percent
    };
    progress.report(&ProgressUpdate::finished(
        video,
        status.progress_status(),
        final_percent,
        &clips,
    ));

    info!(
        "Analysis of {} ended ({:?}): {} frames, {} raw events, {} clips",
        video,
        status,
        frames.len(),
        raw_clips.len(),
        clips.len()
    );

    AnalysisReport {
        status,
        record: AnalysisRecord::new(video, FrameTrace::new(fps, frames), clips),
    }
}
