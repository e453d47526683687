// ============================================================================
// courtcut-core/src/progress.rs
// ============================================================================
//
// PROGRESS REPORTING: Analysis progress callbacks
//
// The analysis driver reports the state of a run through the ProgressReporter
// trait. The JSON progress file lets another process (a web front end or a
// second CLI invocation) follow a running analysis; the terminal bar lives in
// terminal.rs.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::model::ClipInterval;

/// State of an analysis run as seen by observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStatus {
    Running,
    Done,
    Stopped,
    Error,
}

/// One progress notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Percentage of frames processed, 0-100.
    pub progress: u8,
    pub status: ProgressStatus,
    pub video: String,
    /// Merged clips, present once the run has finished.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clips: Option<Vec<ClipInterval>>,
}

impl ProgressUpdate {
    pub fn running(video: &str, progress: u8) -> Self {
        Self {
            progress: progress.min(100),
            status: ProgressStatus::Running,
            video: video.to_string(),
            clips: None,
        }
    }

    pub fn finished(video: &str, status: ProgressStatus, progress: u8, clips: &[ClipInterval]) -> Self {
        Self {
            progress: progress.min(100),
            status,
            video: video.to_string(),
            clips: Some(clips.to_vec()),
        }
    }
}

/// Receives progress notifications from the analysis driver.
pub trait ProgressReporter {
    fn report(&self, update: &ProgressUpdate);
}

/// Debug-level trace of status changes and every tenth percent.
#[derive(Debug, Default)]
pub struct LogProgress {
    last_decile: std::sync::atomic::AtomicU8,
}

impl ProgressReporter for LogProgress {
    fn report(&self, update: &ProgressUpdate) {
        use std::sync::atomic::Ordering;

        if update.status != ProgressStatus::Running {
            log::debug!(
                "Analysis of {} {:?} at {}%",
                update.video,
                update.status,
                update.progress
            );
            return;
        }
        let decile = update.progress / 10;
        if self.last_decile.swap(decile, Ordering::Relaxed) != decile {
            log::debug!("Analysis of {}: {}%", update.video, update.progress);
        }
    }
}

impl<A: ProgressReporter, B: ProgressReporter> ProgressReporter for (A, B) {
    fn report(&self, update: &ProgressUpdate) {
        self.0.report(update);
        self.1.report(update);
    }
}

/// Writes each update to a JSON file, replacing it atomically.
#[derive(Debug, Clone)]
pub struct ProgressFile {
    path: PathBuf,
}

impl ProgressFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `progress.json` inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join("progress.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, update: &ProgressUpdate) -> CoreResult<()> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)?;
        let mut file = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer(&mut file, update)?;
        file.flush()?;
        file.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    /// Last written update, if any.
    pub fn load(&self) -> CoreResult<Option<ProgressUpdate>> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl ProgressReporter for ProgressFile {
    fn report(&self, update: &ProgressUpdate) {
        // A broken progress file must not abort the analysis.
        if let Err(e) = self.write(update) {
            log::warn!("Failed to write progress to {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let file = ProgressFile::in_dir(dir.path());
        assert_eq!(file.load().unwrap(), None);

        file.report(&ProgressUpdate::running("game.mp4", 42));
        let loaded = file.load().unwrap().unwrap();
        assert_eq!(loaded.progress, 42);
        assert_eq!(loaded.status, ProgressStatus::Running);
        assert_eq!(loaded.clips, None);

        let clips = [ClipInterval::new(1.0, 4.0)];
        file.report(&ProgressUpdate::finished("game.mp4", ProgressStatus::Done, 100, &clips));
        let loaded = file.load().unwrap().unwrap();
        assert_eq!(loaded.status, ProgressStatus::Done);
        assert_eq!(loaded.clips.as_deref(), Some(&clips[..]));
    }

    #[test]
    fn status_uses_lowercase_names() {
        let json = serde_json::to_string(&ProgressUpdate::running("v.mp4", 5)).unwrap();
        assert!(json.contains("\"status\":\"running\""));
        assert!(!json.contains("clips"));
    }

    #[test]
    fn progress_is_capped() {
        assert_eq!(ProgressUpdate::running("v", 250).progress, 100);
    }

    #[test]
    fn log_progress_tracks_deciles() {
        use std::sync::atomic::Ordering;

        let log = LogProgress::default();
        log.report(&ProgressUpdate::running("v.mp4", 5));
        assert_eq!(log.last_decile.load(Ordering::Relaxed), 0);
        log.report(&ProgressUpdate::running("v.mp4", 37));
        assert_eq!(log.last_decile.load(Ordering::Relaxed), 3);
        log.report(&ProgressUpdate::finished("v.mp4", ProgressStatus::Done, 100, &[]));
        assert_eq!(log.last_decile.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn pair_reporter_forwards_to_both() {
        let dir = tempfile::tempdir().unwrap();
        let pair = (ProgressFile::in_dir(dir.path()), LogProgress::default());
        pair.report(&ProgressUpdate::running("v.mp4", 64));
        assert_eq!(pair.0.load().unwrap().unwrap().progress, 64);
        assert_eq!(pair.1.last_decile.load(std::sync::atomic::Ordering::Relaxed), 6);
    }
}
