//! Frame sources and object detectors consumed by the analysis driver.
//!
//! Decoding and inference happen outside this crate. A [`FrameSource`] yields
//! frames in order and an [`ObjectDetector`] turns each one into detections.
//! [`DetectionLog`] replays detector output recorded as JSON lines, one array
//! of detections per frame, through the [`PassThrough`] detector.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};
use crate::model::Detection;

/// Ordered frames of one video.
pub trait FrameSource {
    type Frame;

    /// Frames per second, if the container reports one.
    fn frame_rate(&self) -> Option<f64>;

    /// Total number of frames, if known in advance.
    fn frame_count(&self) -> Option<u64>;

    /// Next frame, or `None` at the end of the video.
    fn next_frame(&mut self) -> CoreResult<Option<Self::Frame>>;
}

/// Finds objects in a frame.
pub trait ObjectDetector<F> {
    fn detect(&mut self, frame: &F) -> CoreResult<Vec<Detection>>;
}

/// Detector for sources whose frames already are detections.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl ObjectDetector<Vec<Detection>> for PassThrough {
    fn detect(&mut self, frame: &Vec<Detection>) -> CoreResult<Vec<Detection>> {
        Ok(frame.clone())
    }
}

/// Recorded detector output read from a JSON-lines file.
#[derive(Debug)]
pub struct DetectionLog {
    path: PathBuf,
    fps: Option<f64>,
    frame_count: u64,
    lines: Lines<BufReader<File>>,
    line_number: usize,
}

impl DetectionLog {
    /// Opens `path`. `fps` is the frame rate of the video the log was
    /// recorded from, when known.
    pub fn open(path: &Path, fps: Option<f64>) -> CoreResult<Self> {
        let open = || {
            File::open(path).map_err(|e| {
                CoreError::InputUnavailable(format!("cannot open {}: {e}", path.display()))
            })
        };

        let mut frame_count = 0u64;
        for line in BufReader::new(open()?).lines() {
            if !line?.trim().is_empty() {
                frame_count += 1;
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            fps,
            frame_count,
            lines: BufReader::new(open()?).lines(),
            line_number: 0,
        })
    }
}

impl FrameSource for DetectionLog {
    type Frame = Vec<Detection>;

    fn frame_rate(&self) -> Option<f64> {
        self.fps
    }

    fn frame_count(&self) -> Option<u64> {
        Some(self.frame_count)
    }

    fn next_frame(&mut self) -> CoreResult<Option<Self::Frame>> {
        for line in self.lines.by_ref() {
            self.line_number += 1;
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let detections = serde_json::from_str(&line).map_err(|e| {
                CoreError::InputUnavailable(format!(
                    "{}: line {}: {e}",
                    self.path.display(),
                    self.line_number
                ))
            })?;
            return Ok(Some(detections));
        }
        Ok(None)
    }
}

/// Frames held in memory.
#[derive(Debug, Clone)]
pub struct MemorySource<F> {
    fps: Option<f64>,
    total: u64,
    frames: VecDeque<F>,
}

impl<F> MemorySource<F> {
    pub fn new(fps: Option<f64>, frames: impl IntoIterator<Item = F>) -> Self {
        let frames: VecDeque<F> = frames.into_iter().collect();
        Self {
            fps,
            total: frames.len() as u64,
            frames,
        }
    }
}

impl<F> FrameSource for MemorySource<F> {
    type Frame = F;

    fn frame_rate(&self) -> Option<f64> {
        self.fps
    }

    fn frame_count(&self) -> Option<u64> {
        Some(self.total)
    }

    fn next_frame(&mut self) -> CoreResult<Option<F>> {
        Ok(self.frames.pop_front())
    }
}
