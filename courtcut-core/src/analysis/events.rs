// ============================================================================
// courtcut-core/src/analysis/events.rs
// ============================================================================
//
// SCORING EVENT DETECTION: Two-zone ball state machine
//
// A shot attempt is registered when the ball shows up in the wide zone above
// the goal. It is confirmed as a score when, within the attempt timeout, the
// ball moves downward through the narrow zone at and below the goal. Each
// confirmed score yields a padded highlight window.
//
// The detector is fed one frame at a time so it can run inside the decode
// loop; `detect_events` replays a stored frame trace through it.

use log::{debug, warn};

use crate::config::EventConfig;
use crate::model::{ClipInterval, FrameRecord, FrameTrace, GoalZone};
use crate::utils::{effective_fps, round_to};

/// Attempt tracking state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttemptState {
    #[default]
    Idle,
    /// Ball was last seen above the goal at this 1-based frame index.
    Attempt { frame_index: u64 },
}

/// Per-video scoring-event state machine.
#[derive(Debug, Clone)]
pub struct EventDetector {
    zone: Option<GoalZone>,
    fps: f64,
    config: EventConfig,
    state: AttemptState,
    prev_cy: Option<f64>,
}

impl EventDetector {
    /// Creates a detector for one video. A missing zone turns detection off;
    /// an unusable `fps` is replaced with the configured fallback.
    pub fn new(zone: Option<GoalZone>, fps: f64, config: &EventConfig) -> Self {
        let effective = effective_fps(fps, config.fallback_fps);
        if effective != fps {
            warn!(
                "Invalid frame rate {}, falling back to {} fps",
                fps, config.fallback_fps
            );
        }
        if zone.is_none() {
            warn!("No goal zone set; collecting frame trace without event detection");
        }
        Self {
            zone,
            fps: effective,
            config: config.clone(),
            state: AttemptState::Idle,
            prev_cy: None,
        }
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn state(&self) -> AttemptState {
        self.state
    }

    /// Returns the detector to its initial state.
    pub fn reset(&mut self) {
        self.state = AttemptState::Idle;
        self.prev_cy = None;
    }

    /// Feeds the next frame. `frame_index` is 1-based and increases by one
    /// per decoded frame. Returns a clip when this frame confirms a score.
    pub fn observe(&mut self, frame_index: u64, frame: &FrameRecord) -> Option<ClipInterval> {
        let Some((cx, cy)) = frame.ball.position() else {
            self.prev_cy = None;
            return None;
        };

        let Some(zone) = self.zone else {
            self.prev_cy = Some(cy);
            return None;
        };

        if zone.contains_above(cx, cy, self.config.upper_reach) {
            self.state = AttemptState::Attempt { frame_index };
        }

        if let AttemptState::Attempt {
            frame_index: started,
        } = self.state
        {
            let elapsed = frame_index.saturating_sub(started) as f64;
            if elapsed > self.fps * self.config.attempt_timeout_secs {
                debug!("Attempt from frame {started} timed out at frame {frame_index}");
                self.state = AttemptState::Idle;
            }
        }

        let mut clip = None;
        if let (Some(prev_cy), AttemptState::Attempt { .. }) = (self.prev_cy, self.state) {
            let downward = cy > prev_cy;
            let in_lower = zone.contains_below(
                cx,
                cy,
                self.config.lower_reach,
                self.config.lower_depth,
            );
            if downward && in_lower {
                let interval = self.clip_around(frame.time);
                debug!(
                    "Score confirmed at {:.2}s (frame {}): clip {:.2}-{:.2}",
                    frame.time, frame_index, interval.start, interval.end
                );
                self.state = AttemptState::Idle;
                clip = Some(interval);
            }
        }

        self.prev_cy = Some(cy);
        clip
    }

    fn clip_around(&self, time: f64) -> ClipInterval {
        let start = (time - self.config.start_pad_secs).max(0.0);
        let end = time + self.config.end_pad_secs;
        ClipInterval::new(round_to(start, 2), round_to(end, 2))
    }
}

/// Replays a stored frame trace and returns the raw (unmerged) clips.
pub fn detect_events(
    trace: &FrameTrace,
    zone: Option<&GoalZone>,
    config: &EventConfig,
) -> Vec<ClipInterval> {
    let detector = EventDetector::new(zone.copied(), trace.fps, config);
    trace
        .frames
        .iter()
        .zip(1u64..)
        .scan(detector, |detector, (frame, index)| {
            Some(detector.observe(index, frame))
        })
        .flatten()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BallObservation;

    const FPS: f64 = 10.0;

    fn zone() -> GoalZone {
        GoalZone::new(100.0, 100.0, 120.0, 110.0)
    }

    fn frame(index: u64, ball: Option<(f64, f64)>) -> FrameRecord {
        let ball = match ball {
            Some((cx, cy)) => BallObservation::at(cx, cy),
            None => BallObservation::missing(),
        };
        FrameRecord::new(index as f64 / FPS, ball, 0)
    }

    fn run(detector: &mut EventDetector, frames: &[(u64, Option<(f64, f64)>)]) -> Vec<ClipInterval> {
        frames
            .iter()
            .filter_map(|&(i, ball)| detector.observe(i, &frame(i, ball)))
            .collect()
    }

    #[test]
    fn downward_pass_after_attempt_is_a_score() {
        let mut detector = EventDetector::new(Some(zone()), FPS, &EventConfig::default());
        let clips = run(
            &mut detector,
            &[(200, Some((110.0, 90.0))), (201, Some((110.0, 95.0))), (202, Some((110.0, 105.0)))],
        );
        assert_eq!(clips, vec![ClipInterval::new(15.2, 23.2)]);
        assert_eq!(detector.state(), AttemptState::Idle);
    }

    #[test]
    fn score_at_twenty_seconds_pads_both_sides() {
        let mut detector = EventDetector::new(Some(zone()), FPS, &EventConfig::default());
        let clips = run(
            &mut detector,
            &[(198, Some((110.0, 90.0))), (199, Some((110.0, 95.0))), (200, Some((110.0, 105.0)))],
        );
        assert_eq!(clips, vec![ClipInterval::new(15.0, 23.0)]);
    }

    #[test]
    fn clip_start_is_clamped_at_zero() {
        let mut detector = EventDetector::new(Some(zone()), FPS, &EventConfig::default());
        let clips = run(&mut detector, &[(19, Some((110.0, 95.0))), (20, Some((110.0, 104.0)))]);
        assert_eq!(clips, vec![ClipInterval::new(0.0, 5.0)]);
    }

    #[test]
    fn attempt_times_out_without_confirmation() {
        let mut detector = EventDetector::new(Some(zone()), FPS, &EventConfig::default());
        let mut frames = vec![(1, Some((110.0, 95.0)))];
        // Ball hovers to the side of the goal, below the rim line, for 1.1 s.
        for i in 2..=12 {
            frames.push((i, Some((200.0, 105.0 + i as f64))));
        }
        assert!(run(&mut detector, &frames).is_empty());
        assert_eq!(detector.state(), AttemptState::Idle);

        // A later downward pass through the goal no longer counts.
        let clips = run(&mut detector, &[(13, Some((110.0, 104.0))), (14, Some((110.0, 106.0)))]);
        assert!(clips.is_empty());
    }

    #[test]
    fn lost_ball_breaks_motion_continuity() {
        let mut detector = EventDetector::new(Some(zone()), FPS, &EventConfig::default());
        let clips = run(
            &mut detector,
            &[(10, Some((110.0, 95.0))), (11, None), (12, Some((110.0, 105.0)))],
        );
        assert!(clips.is_empty());
        assert_eq!(detector.state(), AttemptState::Attempt { frame_index: 10 });
    }

    #[test]
    fn upward_motion_through_goal_is_ignored() {
        let mut detector = EventDetector::new(Some(zone()), FPS, &EventConfig::default());
        let clips = run(
            &mut detector,
            &[
                (10, Some((110.0, 95.0))),
                (11, Some((200.0, 118.0))),
                (12, Some((110.0, 108.0))),
                (13, Some((110.0, 104.0))),
            ],
        );
        assert!(clips.is_empty());
        assert_eq!(detector.state(), AttemptState::Attempt { frame_index: 10 });
    }

    #[test]
    fn missing_zone_never_detects() {
        let frames: Vec<FrameRecord> = (1..=100)
            .map(|i| frame(i, Some((110.0, 80.0 + (i % 40) as f64))))
            .collect();
        let trace = FrameTrace::new(FPS, frames);
        assert!(detect_events(&trace, None, &EventConfig::default()).is_empty());
        assert!(!detect_events(&trace, Some(&zone()), &EventConfig::default()).is_empty());
    }

    #[test]
    fn reset_forgets_pending_attempt() {
        let mut detector = EventDetector::new(Some(zone()), FPS, &EventConfig::default());
        run(&mut detector, &[(10, Some((110.0, 95.0)))]);
        detector.reset();
        assert_eq!(detector.state(), AttemptState::Idle);
        assert!(run(&mut detector, &[(11, Some((110.0, 105.0)))]).is_empty());
    }

    #[test]
    fn invalid_fps_uses_fallback() {
        let detector = EventDetector::new(Some(zone()), 0.0, &EventConfig::default());
        assert_eq!(detector.fps(), 30.0);
    }

    #[test]
    fn replay_uses_one_based_indices() {
        let trace = FrameTrace::new(
            FPS,
            vec![
                frame(1, Some((110.0, 95.0))),
                frame(2, Some((110.0, 101.0))),
            ],
        );
        let clips = detect_events(&trace, Some(&zone()), &EventConfig::default());
        assert_eq!(clips, vec![ClipInterval::new(0.0, 3.2)]);
    }
}
