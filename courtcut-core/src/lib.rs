//! Core library for basketball highlight detection and two-camera cross-editing.
//!
//! This crate turns object-detector output into scoring-event clips, aligns two
//! recordings of the same game by their audio, and decides second by second
//! which camera to show in a cross-edited timeline.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use courtcut_core::analysis::{DetectionLog, NeverCancel, PassThrough, analyze_video};
//! use courtcut_core::progress::LogProgress;
//! use courtcut_core::store::{Catalog, JsonFileStore};
//! use courtcut_core::CoreConfig;
//! use std::path::{Path, PathBuf};
//!
//! let config = CoreConfig::new(PathBuf::from("/srv/courtcut"));
//! config.validate().unwrap();
//! let catalog = Catalog::new(JsonFileStore::open(config.store_dir()).unwrap());
//!
//! let zone = catalog.zone("left.mp4").unwrap();
//! let mut source = DetectionLog::open(Path::new("left.jsonl"), Some(29.97)).unwrap();
//! let report = analyze_video(
//!     "left.mp4",
//!     &mut source,
//!     &mut PassThrough,
//!     zone,
//!     &NeverCancel,
//!     &LogProgress::default(),
//!     &config,
//! );
//! catalog.put_analysis(&report.record).unwrap();
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod external;
pub mod model;
pub mod progress;
pub mod session;
pub mod store;
pub mod sync;
pub mod temp_files;
pub mod terminal;
pub mod utils;

// Re-exports for public API
pub use analysis::{
    AnalysisReport, CoverageSegmenter, EventDetector, RunStatus, analyze_video, detect_events,
    merge_intervals,
};
pub use config::{CoreConfig, CoreConfigBuilder};
pub use error::{CoreError, CoreResult};
pub use external::{MediaInfo, SidecarSpawner, get_media_info};
pub use model::{
    AnalysisRecord, BallObservation, ClipInterval, CoverageSegment, CoverageSession, Detection,
    DetectionLabel, FrameRecord, FrameTrace, GoalZone, Side, SyncOffset,
};
pub use session::plan_coverage;
pub use sync::{AudioAligner, estimate_offset};
pub use utils::{format_duration, format_offset};
