//! Data model shared by the analysis components.
//!
//! The serialized field names of [`FrameRecord`] (`t`, `ball`, `persons`)
//! match the frame traces already persisted by earlier runs, so stored
//! analyses stay readable.

use serde::{Deserialize, Serialize};

use crate::config::DetectionThresholds;
use crate::utils::round_to;

/// Class of an object reported by the external detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionLabel {
    Ball,
    Person,
    #[serde(other)]
    Other,
}

/// Axis-aligned box in pixel space. Serialized as `[x1, y1, x2, y2]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn center(&self) -> (f64, f64) {
        ((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from(v: [f64; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x1, b.y1, b.x2, b.y2]
    }
}

/// One object found in one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: DetectionLabel,
    pub confidence: f32,
    pub bbox: BoundingBox,
}

/// Ball observation of a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BallObservation {
    pub found: bool,
    pub cx: Option<f64>,
    pub cy: Option<f64>,
}

impl BallObservation {
    pub fn at(cx: f64, cy: f64) -> Self {
        Self {
            found: true,
            cx: Some(cx),
            cy: Some(cy),
        }
    }

    pub fn missing() -> Self {
        Self::default()
    }

    /// Ball centroid, if the ball was seen.
    pub fn position(&self) -> Option<(f64, f64)> {
        match (self.found, self.cx, self.cy) {
            (true, Some(cx), Some(cy)) => Some((cx, cy)),
            _ => None,
        }
    }
}

/// Per-frame summary of detector output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    #[serde(rename = "t")]
    pub time: f64,
    pub ball: BallObservation,
    #[serde(rename = "persons")]
    pub person_count: u32,
}

impl FrameRecord {
    pub fn new(time: f64, ball: BallObservation, person_count: u32) -> Self {
        Self {
            time,
            ball,
            person_count,
        }
    }

    /// Reduces raw detections of one frame to a record.
    ///
    /// Persons at or above the person threshold are counted. The ball is the
    /// highest-confidence ball detection at or above the ball threshold.
    pub fn from_detections(
        time: f64,
        detections: &[Detection],
        thresholds: &DetectionThresholds,
    ) -> Self {
        let mut person_count = 0u32;
        let mut best_ball: Option<&Detection> = None;

        for detection in detections {
            match detection.label {
                DetectionLabel::Person if detection.confidence >= thresholds.person => {
                    person_count += 1;
                }
                DetectionLabel::Ball if detection.confidence >= thresholds.ball => {
                    if best_ball.is_none_or(|b| detection.confidence > b.confidence) {
                        best_ball = Some(detection);
                    }
                }
                _ => {}
            }
        }

        let ball = match best_ball {
            Some(d) => {
                let (cx, cy) = d.bbox.center();
                BallObservation::at(cx, cy)
            }
            None => BallObservation::missing(),
        };

        Self::new(round_to(time, 4), ball, person_count)
    }
}

/// Ordered frame records of one video plus the rate they were sampled at.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameTrace {
    pub fps: f64,
    pub frames: Vec<FrameRecord>,
}

impl FrameTrace {
    pub fn new(fps: f64, frames: Vec<FrameRecord>) -> Self {
        Self { fps, frames }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Time of the last recorded frame, or 0 for an empty trace.
    pub fn duration(&self) -> f64 {
        self.frames.last().map_or(0.0, |f| f.time)
    }
}

/// Rectangle marking the goal/basket in one video's pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalZone {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl GoalZone {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Ball above the zone, within `reach` zone-widths of it horizontally.
    pub fn contains_above(&self, cx: f64, cy: f64, reach: f64) -> bool {
        let margin = reach * self.width();
        (self.x1 - margin..=self.x2 + margin).contains(&cx) && cy <= self.y1
    }

    /// Ball inside the zone or up to `depth` zone-heights below it, within
    /// `reach` zone-widths horizontally.
    pub fn contains_below(&self, cx: f64, cy: f64, reach: f64, depth: f64) -> bool {
        let margin = reach * self.width();
        (self.x1 - margin..=self.x2 + margin).contains(&cx)
            && (self.y1..=self.y2 + depth * self.height()).contains(&cy)
    }
}

/// Time range in seconds with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipInterval {
    pub start: f64,
    pub end: f64,
}

impl ClipInterval {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// One of the two camera feeds of a cross-edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// Range of the cross-edited timeline shown from one camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverageSegment {
    pub start: f64,
    pub end: f64,
    pub target: Side,
}

impl CoverageSegment {
    pub fn new(start: f64, end: f64, target: Side) -> Self {
        Self { start, end, target }
    }
}

/// Relative start offset between two recordings, in seconds.
///
/// Positive means the right (B) recording's audio is delayed relative to the
/// left (A) one, so B has to be trimmed from its start to line up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SyncOffset {
    pub seconds: f64,
    #[serde(default)]
    pub confirmed: bool,
}

/// Seconds to cut from the start of each recording to align them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimPlan {
    pub left_trim: f64,
    pub right_trim: f64,
}

impl SyncOffset {
    /// Offset computed from audio.
    pub fn estimated(seconds: f64) -> Self {
        Self {
            seconds,
            confirmed: false,
        }
    }

    /// Offset chosen or confirmed by an operator.
    pub fn confirmed(seconds: f64) -> Self {
        Self {
            seconds,
            confirmed: true,
        }
    }

    /// Offset of the reversed pair.
    pub fn reversed(self) -> Self {
        Self {
            seconds: -self.seconds,
            ..self
        }
    }

    pub fn trim_plan(&self) -> TrimPlan {
        if self.seconds > 0.0 {
            TrimPlan {
                left_trim: 0.0,
                right_trim: self.seconds,
            }
        } else {
            TrimPlan {
                left_trim: -self.seconds,
                right_trim: 0.0,
            }
        }
    }
}

/// Stored result of analyzing one video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub video: String,
    /// Local time the analysis finished, `YYYY-MM-DD HH:MM:SS`.
    pub created: String,
    #[serde(flatten)]
    pub trace: FrameTrace,
    /// Merged highlight clips.
    pub clips: Vec<ClipInterval>,
}

impl AnalysisRecord {
    pub fn new(video: impl Into<String>, trace: FrameTrace, clips: Vec<ClipInterval>) -> Self {
        Self {
            video: video.into(),
            created: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            trace,
            clips,
        }
    }
}

/// Cross-edit plan for a pair of recordings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageSession {
    pub left_video: String,
    pub right_video: String,
    pub offset: f64,
    pub duration: f64,
    pub segments: Vec<CoverageSegment>,
}

impl CoverageSession {
    /// Non-empty segments grouped by camera, as `(left, right)` clip lists.
    pub fn clips_by_side(&self) -> (Vec<ClipInterval>, Vec<ClipInterval>) {
        use crate::analysis::coverage::{normalize_segments, split_by_side};
        split_by_side(&normalize_segments(&self.segments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn det(label: DetectionLabel, confidence: f32, bbox: [f64; 4]) -> Detection {
        Detection {
            label,
            confidence,
            bbox: bbox.into(),
        }
    }

    #[test]
    fn reduction_counts_confident_persons_only() {
        let detections = vec![
            det(DetectionLabel::Person, 0.9, [0.0, 0.0, 10.0, 10.0]),
            det(DetectionLabel::Person, 0.25, [0.0, 0.0, 10.0, 10.0]),
            det(DetectionLabel::Person, 0.1, [0.0, 0.0, 10.0, 10.0]),
            det(DetectionLabel::Other, 0.99, [0.0, 0.0, 10.0, 10.0]),
        ];
        let record = FrameRecord::from_detections(1.0, &detections, &DetectionThresholds::default());
        assert_eq!(record.person_count, 2);
        assert!(record.ball.position().is_none());
    }

    #[test]
    fn reduction_picks_most_confident_ball() {
        let detections = vec![
            det(DetectionLabel::Ball, 0.4, [0.0, 0.0, 10.0, 10.0]),
            det(DetectionLabel::Ball, 0.8, [100.0, 200.0, 110.0, 220.0]),
            det(DetectionLabel::Ball, 0.2, [500.0, 500.0, 510.0, 510.0]),
        ];
        let record = FrameRecord::from_detections(0.5, &detections, &DetectionThresholds::default());
        assert_eq!(record.ball.position(), Some((105.0, 210.0)));
    }

    #[test]
    fn reduction_rounds_time() {
        let record = FrameRecord::from_detections(1.0 / 3.0, &[], &DetectionThresholds::default());
        assert_eq!(record.time, 0.3333);
    }

    #[test]
    fn detection_json_shape() {
        let json = r#"{"label":"sports ball","confidence":0.5,"bbox":[1,2,3,4]}"#;
        let parsed: Detection = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.label, DetectionLabel::Other);
        assert_eq!(parsed.bbox, BoundingBox::new(1.0, 2.0, 3.0, 4.0));

        let ball: Detection =
            serde_json::from_str(r#"{"label":"ball","confidence":0.9,"bbox":[0,0,2,2]}"#).unwrap();
        assert_eq!(ball.label, DetectionLabel::Ball);
    }

    #[test]
    fn frame_record_uses_stored_field_names() {
        let record = FrameRecord::new(1.5, BallObservation::at(3.0, 4.0), 7);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["t"], 1.5);
        assert_eq!(value["persons"], 7);
        assert_eq!(value["ball"]["found"], true);
    }

    #[test]
    fn zone_tests_use_multipliers() {
        let zone = GoalZone::new(100.0, 100.0, 120.0, 110.0);
        assert!(zone.contains_above(60.0, 90.0, 2.0));
        assert!(!zone.contains_above(59.0, 90.0, 2.0));
        assert!(!zone.contains_above(110.0, 101.0, 2.0));

        assert!(zone.contains_below(94.0, 105.0, 0.3, 1.2));
        assert!(!zone.contains_below(93.0, 105.0, 0.3, 1.2));
        assert!(zone.contains_below(110.0, 122.0, 0.3, 1.2));
        assert!(!zone.contains_below(110.0, 122.5, 0.3, 1.2));
    }

    #[test]
    fn trim_plan_follows_offset_sign() {
        let plan = SyncOffset::estimated(1.5).trim_plan();
        assert_eq!(plan.left_trim, 0.0);
        assert_eq!(plan.right_trim, 1.5);

        let plan = SyncOffset::estimated(-0.5).trim_plan();
        assert_eq!(plan.left_trim, 0.5);
        assert_eq!(plan.right_trim, 0.0);
    }
}
