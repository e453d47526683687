//! Highlight detection and camera coverage.
//!
//! - `intervals`: merging raw highlight windows
//! - `events`: the two-zone scoring state machine
//! - `coverage`: hysteresis-filtered camera selection
//! - `run`: the per-video analysis driver, with its `source` and `cancel` seams

pub mod cancel;
pub mod coverage;
pub mod events;
pub mod intervals;
pub mod run;
pub mod source;

pub use cancel::{CancellationSignal, CancellationToken, NeverCancel, StopMarker};
pub use coverage::{ActivitySample, CoverageSegmenter, normalize_segments, split_by_side};
pub use events::{AttemptState, EventDetector, detect_events};
pub use intervals::merge_intervals;
pub use run::{AnalysisReport, RunStatus, analyze_video};
pub use source::{DetectionLog, FrameSource, MemorySource, ObjectDetector, PassThrough};
