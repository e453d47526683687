//! Fluent construction of [`CoreConfig`]. Unset fields keep their defaults.

use std::path::PathBuf;

use super::{AlignConfig, CoreConfig, DetectionThresholds, EventConfig, SegmenterConfig};

/// # Examples
///
/// ```rust
/// use courtcut_core::config::CoreConfigBuilder;
/// use std::path::PathBuf;
///
/// let config = CoreConfigBuilder::new()
///     .work_dir(PathBuf::from("/srv/courtcut"))
///     .fallback_fps(25.0)
///     .audio_sample_rate(8_000)
///     .build();
/// assert_eq!(config.events.fallback_fps, 25.0);
/// assert_eq!(config.segmenter.fallback_fps, 25.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CoreConfigBuilder {
    work_dir: Option<PathBuf>,
    temp_dir: Option<PathBuf>,
    events: EventConfig,
    thresholds: DetectionThresholds,
    align: AlignConfig,
    segmenter: SegmenterConfig,
}

impl CoreConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory holding the store, the progress file and the stop marker.
    pub fn work_dir(mut self, work_dir: PathBuf) -> Self {
        self.work_dir = Some(work_dir);
        self
    }

    pub fn temp_dir(mut self, temp_dir: PathBuf) -> Self {
        self.temp_dir = Some(temp_dir);
        self
    }

    /// Seconds kept before each confirmed score.
    pub fn start_pad(mut self, secs: f64) -> Self {
        self.events.start_pad_secs = secs;
        self
    }

    /// Seconds kept after each confirmed score.
    pub fn end_pad(mut self, secs: f64) -> Self {
        self.events.end_pad_secs = secs;
        self
    }

    /// How long an attempt may stay unconfirmed.
    pub fn attempt_timeout(mut self, secs: f64) -> Self {
        self.events.attempt_timeout_secs = secs;
        self
    }

    /// Zone multipliers: upper reach, lower reach and lower depth.
    pub fn zone_multipliers(mut self, upper_reach: f64, lower_reach: f64, lower_depth: f64) -> Self {
        self.events.upper_reach = upper_reach;
        self.events.lower_reach = lower_reach;
        self.events.lower_depth = lower_depth;
        self
    }

    /// Frame rate assumed when a video reports none. Applies to both the
    /// event detector and the coverage segmenter.
    pub fn fallback_fps(mut self, fps: f64) -> Self {
        self.events.fallback_fps = fps;
        self.segmenter.fallback_fps = fps;
        self
    }

    /// Minimum confidence for ball and person detections.
    pub fn confidence_thresholds(mut self, ball: f32, person: f32) -> Self {
        self.thresholds = DetectionThresholds { ball, person };
        self
    }

    /// Leading audio window used for sync.
    pub fn audio_window(mut self, secs: f64) -> Self {
        self.align.window_secs = secs;
        self
    }

    /// Sample rate of the extracted sync audio.
    pub fn audio_sample_rate(mut self, rate: u32) -> Self {
        self.align.sample_rate = rate;
        self
    }

    /// Largest offset considered by the aligner.
    pub fn max_shift(mut self, secs: f64) -> Self {
        self.align.max_shift_secs = secs;
        self
    }

    /// Sustain requirement for a weak camera-switch signal.
    pub fn sustain_secs(mut self, secs: f64) -> Self {
        self.segmenter.sustain_secs = secs;
        self
    }

    /// Weak and strong person-count change thresholds.
    pub fn switch_thresholds(mut self, weak: i64, strong: i64) -> Self {
        self.segmenter.weak_change = weak;
        self.segmenter.strong_change = strong;
        self
    }

    /// Builds the CoreConfig. The working directory defaults to `.`.
    pub fn build(self) -> CoreConfig {
        CoreConfig {
            work_dir: self.work_dir.unwrap_or_else(|| PathBuf::from(".")),
            temp_dir: self.temp_dir,
            events: self.events,
            thresholds: self.thresholds,
            align: self.align,
            segmenter: self.segmenter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = CoreConfigBuilder::new().build();
        assert_eq!(config, CoreConfig::default());
    }

    #[test]
    fn test_builder_overrides() {
        let config = CoreConfigBuilder::new()
            .work_dir(PathBuf::from("/work"))
            .temp_dir(PathBuf::from("/scratch"))
            .start_pad(2.0)
            .end_pad(1.0)
            .attempt_timeout(0.5)
            .zone_multipliers(1.5, 0.2, 1.0)
            .confidence_thresholds(0.4, 0.3)
            .max_shift(10.0)
            .switch_thresholds(3, 9)
            .build();

        assert_eq!(config.work_dir, PathBuf::from("/work"));
        assert_eq!(config.scratch_dir(), PathBuf::from("/scratch"));
        assert_eq!(config.events.start_pad_secs, 2.0);
        assert_eq!(config.events.end_pad_secs, 1.0);
        assert_eq!(config.events.attempt_timeout_secs, 0.5);
        assert_eq!(config.events.upper_reach, 1.5);
        assert_eq!(config.thresholds.ball, 0.4);
        assert_eq!(config.align.max_shift_secs, 10.0);
        assert_eq!(config.segmenter.weak_change, 3);
        assert_eq!(config.segmenter.strong_change, 9);
        assert!(config.validate().is_ok());
    }
}
