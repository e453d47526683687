//! Configuration structures and constants for the courtcut-core library.
//!
//! Every heuristic the analysis components rely on is exposed here with its
//! default value.

mod builder;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

pub use builder::CoreConfigBuilder;

// Default constants

/// Seconds of footage kept before a confirmed score.
pub const DEFAULT_START_PAD_SECS: f64 = 5.0;

/// Seconds of footage kept after a confirmed score.
pub const DEFAULT_END_PAD_SECS: f64 = 3.0;

/// An attempt that is not confirmed within this many seconds is dropped.
pub const DEFAULT_ATTEMPT_TIMEOUT_SECS: f64 = 1.0;

/// Horizontal reach of the upper (attempt) zone, in goal-zone widths on each side.
pub const DEFAULT_UPPER_REACH: f64 = 2.0;

/// Horizontal reach of the lower (confirm) zone, in goal-zone widths on each side.
pub const DEFAULT_LOWER_REACH: f64 = 0.3;

/// Depth of the lower (confirm) zone below the goal zone, in goal-zone heights.
pub const DEFAULT_LOWER_DEPTH: f64 = 1.2;

/// Frame rate assumed when a source reports none or a nonsensical one.
pub const DEFAULT_FALLBACK_FPS: f64 = 30.0;

/// Minimum detector confidence for a ball detection to count.
pub const DEFAULT_BALL_CONFIDENCE: f32 = 0.25;

/// Minimum detector confidence for a person detection to count.
pub const DEFAULT_PERSON_CONFIDENCE: f32 = 0.25;

/// Leading seconds of audio used for sync.
pub const DEFAULT_AUDIO_WINDOW_SECS: f64 = 30.0;

/// Mono sample rate used for sync audio.
pub const DEFAULT_AUDIO_SAMPLE_RATE: u32 = 16_000;

/// Largest offset (either direction) the aligner will consider.
pub const DEFAULT_MAX_SHIFT_SECS: f64 = 30.0;

/// Sustain requirement for a weak camera-switch signal.
pub const DEFAULT_SUSTAIN_SECS: f64 = 2.0;

/// Person-count change at or below which a switch needs the full sustain time.
/// Also the strength of contrary evidence that cancels a pending switch.
pub const DEFAULT_WEAK_CHANGE: i64 = 2;

/// Person-count change at or above which the camera switches immediately.
pub const DEFAULT_STRONG_CHANGE: i64 = 8;

/// Tunables for the scoring-event state machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventConfig {
    pub start_pad_secs: f64,
    pub end_pad_secs: f64,
    pub attempt_timeout_secs: f64,
    pub upper_reach: f64,
    pub lower_reach: f64,
    pub lower_depth: f64,
    pub fallback_fps: f64,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            start_pad_secs: DEFAULT_START_PAD_SECS,
            end_pad_secs: DEFAULT_END_PAD_SECS,
            attempt_timeout_secs: DEFAULT_ATTEMPT_TIMEOUT_SECS,
            upper_reach: DEFAULT_UPPER_REACH,
            lower_reach: DEFAULT_LOWER_REACH,
            lower_depth: DEFAULT_LOWER_DEPTH,
            fallback_fps: DEFAULT_FALLBACK_FPS,
        }
    }
}

/// Confidence cut-offs applied when reducing raw detections to a frame record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionThresholds {
    pub ball: f32,
    pub person: f32,
}

impl Default for DetectionThresholds {
    fn default() -> Self {
        Self {
            ball: DEFAULT_BALL_CONFIDENCE,
            person: DEFAULT_PERSON_CONFIDENCE,
        }
    }
}

/// Tunables for audio-based sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignConfig {
    pub window_secs: f64,
    pub sample_rate: u32,
    pub max_shift_secs: f64,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            window_secs: DEFAULT_AUDIO_WINDOW_SECS,
            sample_rate: DEFAULT_AUDIO_SAMPLE_RATE,
            max_shift_secs: DEFAULT_MAX_SHIFT_SECS,
        }
    }
}

/// Tunables for camera coverage segmentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmenterConfig {
    pub sustain_secs: f64,
    pub weak_change: i64,
    pub strong_change: i64,
    pub fallback_fps: f64,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            sustain_secs: DEFAULT_SUSTAIN_SECS,
            weak_change: DEFAULT_WEAK_CHANGE,
            strong_change: DEFAULT_STRONG_CHANGE,
            fallback_fps: DEFAULT_FALLBACK_FPS,
        }
    }
}

/// Main configuration structure for the courtcut-core library.
///
/// Holds the working directory used for persisted state and scratch files,
/// plus the tunables of each analysis component. Consumers (e.g. courtcut-cli)
/// usually start from [`CoreConfig::default`] or the builder and override a
/// few fields.
///
/// # Examples
///
/// ```rust
/// use courtcut_core::config::CoreConfigBuilder;
/// use std::path::PathBuf;
///
/// let config = CoreConfigBuilder::new()
///     .work_dir(PathBuf::from("/tmp/courtcut"))
///     .start_pad(4.0)
///     .end_pad(2.0)
///     .sustain_secs(1.5)
///     .build();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CoreConfig {
    /// Root directory for the persisted store and the stop marker
    pub work_dir: PathBuf,

    /// Optional directory for scratch files (defaults to `work_dir/tmp`)
    pub temp_dir: Option<PathBuf>,

    pub events: EventConfig,
    pub thresholds: DetectionThresholds,
    pub align: AlignConfig,
    pub segmenter: SegmenterConfig,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("."),
            temp_dir: None,
            events: EventConfig::default(),
            thresholds: DetectionThresholds::default(),
            align: AlignConfig::default(),
            segmenter: SegmenterConfig::default(),
        }
    }
}

impl CoreConfig {
    /// Creates a configuration rooted at `work_dir` with default tunables.
    pub fn new(work_dir: PathBuf) -> Self {
        Self {
            work_dir,
            ..Self::default()
        }
    }

    /// Directory where scratch files (extracted audio) are written.
    pub fn scratch_dir(&self) -> PathBuf {
        self.temp_dir
            .clone()
            .unwrap_or_else(|| self.work_dir.join("tmp"))
    }

    /// Directory backing the persisted key-value store.
    pub fn store_dir(&self) -> PathBuf {
        self.work_dir.join("store")
    }

    /// Checks that every tunable is in a usable range.
    pub fn validate(&self) -> CoreResult<()> {
        let events = &self.events;
        if !(events.start_pad_secs >= 0.0 && events.end_pad_secs >= 0.0) {
            return Err(CoreError::Config(format!(
                "clip padding must be non-negative (start={}, end={})",
                events.start_pad_secs, events.end_pad_secs
            )));
        }
        if !(events.attempt_timeout_secs > 0.0) {
            return Err(CoreError::Config(format!(
                "attempt timeout must be positive, got {}",
                events.attempt_timeout_secs
            )));
        }
        if !(events.upper_reach > 0.0 && events.lower_reach > 0.0 && events.lower_depth > 0.0) {
            return Err(CoreError::Config(format!(
                "zone multipliers must be positive (upper={}, lower={}, depth={})",
                events.upper_reach, events.lower_reach, events.lower_depth
            )));
        }
        if !(events.fallback_fps > 0.0 && self.segmenter.fallback_fps > 0.0) {
            return Err(CoreError::Config("fallback fps must be positive".to_string()));
        }

        for (name, value) in [
            ("ball", self.thresholds.ball),
            ("person", self.thresholds.person),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(CoreError::Config(format!(
                    "{name} confidence threshold must be within [0, 1], got {value}"
                )));
            }
        }

        let align = &self.align;
        if align.sample_rate == 0 {
            return Err(CoreError::Config("audio sample rate must be positive".to_string()));
        }
        if !(align.window_secs > 0.0 && align.max_shift_secs >= 0.0) {
            return Err(CoreError::Config(format!(
                "audio window must be positive and max shift non-negative (window={}, shift={})",
                align.window_secs, align.max_shift_secs
            )));
        }

        let seg = &self.segmenter;
        if !(seg.sustain_secs >= 0.0) {
            return Err(CoreError::Config(format!(
                "sustain duration must be non-negative, got {}",
                seg.sustain_secs
            )));
        }
        if seg.weak_change < 0 || seg.strong_change <= seg.weak_change {
            return Err(CoreError::Config(format!(
                "switch thresholds must satisfy 0 <= weak < strong (weak={}, strong={})",
                seg.weak_change, seg.strong_change
            )));
        }

        Ok(())
    }
}
