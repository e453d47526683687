//! Cross-edit session planning from stored analyses.

use log::{info, warn};

use crate::analysis::coverage::CoverageSegmenter;
use crate::config::SegmenterConfig;
use crate::error::CoreResult;
use crate::model::CoverageSession;
use crate::store::{Catalog, KeyValueStore};

/// Length of the shared timeline given the container durations of both
/// recordings: the shorter of `left` and `right + offset`. A side whose
/// duration is unknown is ignored; `None` when neither gives a positive value.
pub fn aligned_duration(left: Option<f64>, right: Option<f64>, offset: f64) -> Option<f64> {
    let right = right.map(|r| r + offset);
    let duration = match (left, right) {
        (Some(l), Some(r)) => Some(l.min(r)),
        (l, r) => l.or(r),
    };
    duration.filter(|d| d.is_finite() && *d > 0.0)
}

/// Builds and stores the coverage session for a recording pair.
///
/// Uses the stored frame traces of both videos and their stored sync offset
/// (zero when none is stored). A missing trace degrades to a single left
/// segment rather than failing.
pub fn plan_coverage<S: KeyValueStore>(
    catalog: &Catalog<S>,
    left: &str,
    right: &str,
    duration_hint: Option<f64>,
    config: &SegmenterConfig,
) -> CoreResult<CoverageSession> {
    let offset = match catalog.sync(left, right)? {
        Some(offset) => offset.seconds,
        None => {
            warn!("No sync offset stored for {left} / {right}; assuming 0");
            0.0
        }
    };

    let left_record = catalog.analysis(left)?;
    let right_record = catalog.analysis(right)?;
    for (video, record) in [(left, &left_record), (right, &right_record)] {
        if record.is_none() {
            warn!("No analysis stored for {video}");
        }
    }

    let segments = CoverageSegmenter::new(config).segment(
        left_record.as_ref().map(|r| &r.trace),
        right_record.as_ref().map(|r| &r.trace),
        offset,
        duration_hint,
    );
    let duration = segments.last().map_or(0.0, |s| s.end);

    let session = CoverageSession {
        left_video: left.to_string(),
        right_video: right.to_string(),
        offset,
        duration,
        segments,
    };
    catalog.put_coverage(&session)?;
    info!(
        "Stored coverage for {} / {}: {} segments over {:.2}s",
        left,
        right,
        session.segments.len(),
        duration
    );
    Ok(session)
}
