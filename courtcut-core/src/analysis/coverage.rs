// ============================================================================
// courtcut-core/src/analysis/coverage.rs
// ============================================================================
//
// CAMERA COVERAGE: Hysteresis-filtered camera selection
//
// Two recordings of the same game are compared once per video-second. The
// change in person count over the preceding second is taken on each side and
// the side whose count rises relative to the other is preferred. A strong
// signal switches cameras at once; a moderate one has to persist for a
// sustain time that shrinks as the signal grows. A confirmed switch is
// backdated to the sample where the evidence first appeared.
//
// The output always covers [0, duration] without gaps or overlaps.

use log::{debug, info, warn};

use crate::config::SegmenterConfig;
use crate::model::{ClipInterval, CoverageSegment, FrameTrace, Side};
use crate::utils::effective_fps;

/// Person-count change of both sides over one stride, at a common time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivitySample {
    pub time: f64,
    pub left_delta: i64,
    pub right_delta: i64,
}

impl ActivitySample {
    /// Positive when the right side gained relative to the left.
    pub fn change(&self) -> i64 {
        self.right_delta - self.left_delta
    }

    pub fn desired(&self) -> Side {
        if self.change() > 0 { Side::Right } else { Side::Left }
    }
}

/// Pending camera switch waiting for confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum Candidate {
    #[default]
    None,
    Pending {
        side: Side,
        start: f64,
        threshold: f64,
    },
}

/// Builds coverage segments for a pair of frame traces.
#[derive(Debug, Clone)]
pub struct CoverageSegmenter {
    config: SegmenterConfig,
}

impl CoverageSegmenter {
    pub fn new(config: &SegmenterConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Seconds a switch signal of strength `abs_change` must persist.
    ///
    /// Falls linearly from the sustain time at the weak threshold to zero at
    /// the strong threshold.
    pub fn compute_threshold(&self, abs_change: i64) -> f64 {
        let SegmenterConfig {
            sustain_secs,
            weak_change,
            strong_change,
            ..
        } = self.config;
        if abs_change >= strong_change {
            return 0.0;
        }
        if abs_change <= weak_change {
            return sustain_secs;
        }
        let span = (strong_change - weak_change) as f64;
        let scaled = sustain_secs * (1.0 - (abs_change - weak_change) as f64 / span);
        scaled.clamp(0.0, sustain_secs)
    }

    /// Partitions the shared timeline between the two cameras.
    ///
    /// `offset` is added to right-side timestamps. `duration_hint` wins over
    /// the duration derived from the traces when it is a positive number. A
    /// missing or empty trace yields one left segment over the whole duration.
    pub fn segment(
        &self,
        left: Option<&FrameTrace>,
        right: Option<&FrameTrace>,
        offset: f64,
        duration_hint: Option<f64>,
    ) -> Vec<CoverageSegment> {
        let hint = duration_hint.filter(|d| d.is_finite() && *d > 0.0);

        let (left, right) = match (left, right) {
            (Some(l), Some(r)) if !l.is_empty() && !r.is_empty() => (l, r),
            (left, right) => {
                warn!("Frame trace missing for one side; covering everything from the left camera");
                let derived = left
                    .map(|l| l.duration())
                    .into_iter()
                    .chain(right.map(|r| r.duration() + offset))
                    .fold(f64::INFINITY, f64::min);
                let duration = hint.unwrap_or(if derived.is_finite() { derived } else { 0.0 });
                return vec![single_segment(duration)];
            }
        };

        let duration = hint.unwrap_or_else(|| left.duration().min(right.duration() + offset));
        if !(duration > 0.0) {
            warn!("Non-positive coverage duration {duration}; emitting a single left segment");
            return vec![single_segment(duration)];
        }

        let samples = self.activity_samples(left, right, offset, duration);
        if samples.is_empty() {
            warn!("Frame traces too short to sample; covering everything from the left camera");
            return vec![single_segment(duration)];
        }

        let segments = self.decide(&samples, duration);
        info!(
            "Built {} coverage segments over {:.2}s from {} samples",
            segments.len(),
            duration,
            samples.len()
        );
        segments
    }

    /// Samples both traces once per video-second on the shared timeline.
    pub fn activity_samples(
        &self,
        left: &FrameTrace,
        right: &FrameTrace,
        offset: f64,
        duration: f64,
    ) -> Vec<ActivitySample> {
        let fps = effective_fps(left.fps, self.config.fallback_fps)
            .min(effective_fps(right.fps, self.config.fallback_fps));
        let mut step = fps.round() as usize;
        if step == 0 {
            step = self.config.fallback_fps.round().max(1.0) as usize;
        }

        let n = left.len().min(right.len());
        (step..n)
            .step_by(step)
            .map(|i| {
                let (l, r) = (&left.frames[i], &right.frames[i]);
                let (l_prev, r_prev) = (&left.frames[i - step], &right.frames[i - step]);
                let time = l.time.min(r.time + offset).clamp(0.0, duration);
                ActivitySample {
                    time,
                    left_delta: i64::from(l.person_count) - i64::from(l_prev.person_count),
                    right_delta: i64::from(r.person_count) - i64::from(r_prev.person_count),
                }
            })
            .collect()
    }

    fn decide(&self, samples: &[ActivitySample], duration: f64) -> Vec<CoverageSegment> {
        let weak = self.config.weak_change;
        let strong = self.config.strong_change;

        let mut timeline = Timeline::new(Side::Left);
        let mut candidate = Candidate::None;
        let mut prev_abs = 0i64;

        for sample in samples {
            let t = sample.time;
            let abs_change = sample.change().abs();
            let desired = sample.desired();

            if let Candidate::Pending { side, .. } = candidate {
                if desired != side && abs_change >= weak {
                    debug!("Pending switch to {side} cancelled at {t:.2}s");
                    candidate = Candidate::None;
                }
            }

            if abs_change >= strong && desired != timeline.current {
                debug!("Immediate switch to {desired} at {t:.2}s (change {abs_change})");
                timeline.switch(t, desired);
                candidate = Candidate::None;
                prev_abs = abs_change;
                continue;
            }

            if let Candidate::Pending {
                side, threshold, ..
            } = &mut candidate
            {
                if *side == desired && abs_change > prev_abs {
                    *threshold = threshold.min(self.compute_threshold(abs_change));
                }
            }

            if candidate == Candidate::None && desired != timeline.current {
                candidate = Candidate::Pending {
                    side: desired,
                    start: t,
                    threshold: self.compute_threshold(abs_change),
                };
            }

            if let Candidate::Pending {
                side,
                start,
                threshold,
            } = candidate
            {
                if t - start >= threshold {
                    debug!("Switch to {side} confirmed at {t:.2}s, backdated to {start:.2}s");
                    timeline.switch(start, side);
                    candidate = Candidate::None;
                }
            }

            prev_abs = abs_change;
        }

        timeline.finish(duration)
    }
}

/// Segments closed so far plus the open one.
struct Timeline {
    current: Side,
    segment_start: f64,
    segments: Vec<CoverageSegment>,
}

impl Timeline {
    fn new(side: Side) -> Self {
        Self {
            current: side,
            segment_start: 0.0,
            segments: Vec::new(),
        }
    }

    fn switch(&mut self, at: f64, side: Side) {
        let end = at.max(self.segment_start);
        if end > self.segment_start {
            self.segments
                .push(CoverageSegment::new(self.segment_start, end, self.current));
            self.segment_start = end;
        }
        self.current = side;
    }

    fn finish(mut self, duration: f64) -> Vec<CoverageSegment> {
        if duration > self.segment_start || self.segments.is_empty() {
            self.segments.push(CoverageSegment::new(
                self.segment_start,
                duration.max(self.segment_start),
                self.current,
            ));
        }
        self.segments
    }
}

fn single_segment(duration: f64) -> CoverageSegment {
    CoverageSegment::new(0.0, duration.max(0.0), Side::Left)
}

/// Drops segments that do not span any time.
pub fn normalize_segments(segments: &[CoverageSegment]) -> Vec<CoverageSegment> {
    segments
        .iter()
        .filter(|s| s.end > s.start)
        .copied()
        .collect()
}

/// Groups segments by camera, returning `(left, right)` clip lists.
pub fn split_by_side(segments: &[CoverageSegment]) -> (Vec<ClipInterval>, Vec<ClipInterval>) {
    segments.iter().fold(
        (Vec::new(), Vec::new()),
        |(mut left, mut right), segment| {
            let clip = ClipInterval::new(segment.start, segment.end);
            match segment.target {
                Side::Left => left.push(clip),
                Side::Right => right.push(clip),
            }
            (left, right)
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BallObservation, FrameRecord};

    const FPS: f64 = 2.0;

    /// One person count per video-second; two frames per second.
    fn trace(counts: &[u32]) -> FrameTrace {
        let frames = counts
            .iter()
            .flat_map(|&c| [c, c])
            .enumerate()
            .map(|(i, c)| FrameRecord::new(i as f64 / FPS, BallObservation::missing(), c))
            .collect();
        FrameTrace::new(FPS, frames)
    }

    fn segmenter() -> CoverageSegmenter {
        CoverageSegmenter::new(&SegmenterConfig::default())
    }

    fn assert_contiguous(segments: &[CoverageSegment], duration: f64) {
        assert_eq!(segments[0].start, 0.0);
        assert_eq!(segments.last().unwrap().end, duration);
        for pair in segments.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn threshold_interpolates_and_clamps() {
        let s = segmenter();
        assert_eq!(s.compute_threshold(0), 2.0);
        assert_eq!(s.compute_threshold(2), 2.0);
        assert_eq!(s.compute_threshold(5), 1.0);
        assert_eq!(s.compute_threshold(8), 0.0);
        assert_eq!(s.compute_threshold(20), 0.0);
    }

    #[test]
    fn strong_change_switches_immediately() {
        let left = trace(&[5, 5, 5, 5, 5, 5]);
        let right = trace(&[0, 0, 0, 10, 10, 10]);
        let segments = segmenter().segment(Some(&left), Some(&right), 0.0, Some(6.0));
        assert_eq!(
            segments,
            vec![
                CoverageSegment::new(0.0, 3.0, Side::Left),
                CoverageSegment::new(3.0, 6.0, Side::Right),
            ]
        );
    }

    #[test]
    fn strong_change_overrides_pending_candidate() {
        // A moderate gain at 1 s starts a candidate; the strong gain at 2 s
        // switches on the spot instead of backdating to 1 s.
        let left = trace(&[0; 6]);
        let right = trace(&[0, 3, 12, 12, 12, 12]);
        let segments = segmenter().segment(Some(&left), Some(&right), 0.0, Some(6.0));
        assert_eq!(
            segments,
            vec![
                CoverageSegment::new(0.0, 2.0, Side::Left),
                CoverageSegment::new(2.0, 3.0, Side::Right),
                CoverageSegment::new(3.0, 6.0, Side::Left),
            ]
        );
    }

    #[test]
    fn sustained_moderate_change_is_backdated() {
        // Right gains 3 people per second for three seconds.
        let left = trace(&[0; 6]);
        let right = trace(&[0, 3, 6, 9, 9, 9]);
        let segments = segmenter().segment(Some(&left), Some(&right), 0.0, Some(6.0));
        assert_eq!(
            segments,
            vec![
                CoverageSegment::new(0.0, 1.0, Side::Left),
                CoverageSegment::new(1.0, 6.0, Side::Right),
            ]
        );
    }

    #[test]
    fn weak_contrary_evidence_keeps_candidate() {
        let left = trace(&[0, 0, 1, 1, 1, 1]);
        let right = trace(&[0, 3, 3, 3, 3, 3]);
        let segments = segmenter().segment(Some(&left), Some(&right), 0.0, Some(6.0));
        assert_eq!(
            segments,
            vec![
                CoverageSegment::new(0.0, 1.0, Side::Left),
                CoverageSegment::new(1.0, 6.0, Side::Right),
            ]
        );
    }

    #[test]
    fn contrary_evidence_cancels_candidate() {
        let left = trace(&[0, 0, 3, 3, 3, 3, 3]);
        let right = trace(&[0, 3, 3, 3, 3, 3, 3]);
        let segments = segmenter().segment(Some(&left), Some(&right), 0.0, Some(7.0));
        assert_eq!(segments, vec![CoverageSegment::new(0.0, 7.0, Side::Left)]);
    }

    #[test]
    fn missing_trace_gives_single_left_segment() {
        let left = trace(&[1, 2, 3]);
        let segments = segmenter().segment(Some(&left), None, 0.0, Some(42.0));
        assert_eq!(segments, vec![CoverageSegment::new(0.0, 42.0, Side::Left)]);

        let segments = segmenter().segment(None, None, 0.0, None);
        assert_eq!(segments, vec![CoverageSegment::new(0.0, 0.0, Side::Left)]);
    }

    #[test]
    fn offset_moves_right_samples_onto_shared_timeline() {
        let left = trace(&[5; 10]);
        let right = trace(&[0, 0, 0, 10, 10, 10, 10, 10, 10, 10]);
        let segmenter = segmenter();
        let samples = segmenter.activity_samples(&left, &right, -1.5, 10.0);
        assert_eq!(samples[0].time, 0.0);
        assert_eq!(samples[2].time, 1.5);

        let segments = segmenter.segment(Some(&left), Some(&right), -1.5, None);
        assert_contiguous(&segments, 8.0);
        assert_eq!(segments[0], CoverageSegment::new(0.0, 1.5, Side::Left));
        assert_eq!(segments[1].target, Side::Right);
    }

    #[test]
    fn coverage_is_contiguous_for_noisy_input() {
        let counts_l: Vec<u32> = (0..60).map(|i| (i * 7 % 13) as u32).collect();
        let counts_r: Vec<u32> = (0..60).map(|i| (i * 5 % 11) as u32).collect();
        let segments = segmenter().segment(Some(&trace(&counts_l)), Some(&trace(&counts_r)), 0.0, None);
        assert_contiguous(&segments, 59.5);
        assert!(segments.iter().all(|s| s.end > s.start));
    }

    #[test]
    fn split_and_normalize() {
        let segments = vec![
            CoverageSegment::new(0.0, 2.0, Side::Left),
            CoverageSegment::new(2.0, 2.0, Side::Right),
            CoverageSegment::new(2.0, 5.0, Side::Right),
            CoverageSegment::new(5.0, 6.0, Side::Left),
        ];
        let normalized = normalize_segments(&segments);
        assert_eq!(normalized.len(), 3);

        let (left, right) = split_by_side(&normalized);
        assert_eq!(left, vec![ClipInterval::new(0.0, 2.0), ClipInterval::new(5.0, 6.0)]);
        assert_eq!(right, vec![ClipInterval::new(2.0, 5.0)]);
    }
}
