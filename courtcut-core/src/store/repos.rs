//! Typed access to the values kept in a [`KeyValueStore`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::KeyValueStore;
use crate::analysis::normalize_segments;
use crate::error::{CoreError, CoreResult};
use crate::model::{AnalysisRecord, CoverageSegment, CoverageSession, GoalZone, SyncOffset};

const ZONE_PREFIX: &str = "zone/";
const ANALYSIS_PREFIX: &str = "analysis/";
const SYNC_PREFIX: &str = "sync/";
const COVERAGE_PREFIX: &str = "coverage/";
const EDIT_PREFIX: &str = "edit/";

fn pair_key(prefix: &str, left: &str, right: &str) -> String {
    format!("{prefix}{left}__{right}")
}

/// A stored sync offset together with its pair, kept in sorted pair order so
/// both orders of the same two videos share one entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncPair {
    pub left: String,
    pub right: String,
    /// Offset of `right` relative to `left`.
    pub offset: SyncOffset,
}

impl SyncPair {
    fn canonical(left: &str, right: &str, offset: SyncOffset) -> Self {
        if left <= right {
            Self {
                left: left.to_string(),
                right: right.to_string(),
                offset,
            }
        } else {
            Self {
                left: right.to_string(),
                right: left.to_string(),
                offset: offset.reversed(),
            }
        }
    }

    fn key(&self) -> String {
        sync_key(&self.left, &self.right)
    }

    /// Offset as seen from `left`, whichever side of the pair it is.
    fn offset_from(&self, left: &str) -> SyncOffset {
        if left == self.left {
            self.offset
        } else {
            self.offset.reversed()
        }
    }
}

fn sync_key(a: &str, b: &str) -> String {
    if a <= b {
        pair_key(SYNC_PREFIX, a, b)
    } else {
        pair_key(SYNC_PREFIX, b, a)
    }
}

/// Goal zones, analysis records, sync offsets and coverage sessions over any
/// key-value store.
#[derive(Debug)]
pub struct Catalog<S> {
    store: S,
}

impl<S: KeyValueStore> Catalog<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> CoreResult<Option<T>> {
        let Some(bytes) = self.store.get(key)? else {
            return Ok(None);
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| CoreError::Store(format!("corrupt entry '{key}': {e}")))
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) -> CoreResult<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.store.update(key, |_| Ok(Some(bytes)))
    }

    // ---- Goal zones ----

    pub fn put_zone(&self, video: &str, zone: &GoalZone) -> CoreResult<()> {
        self.save(&format!("{ZONE_PREFIX}{video}"), zone)
    }

    pub fn zone(&self, video: &str) -> CoreResult<Option<GoalZone>> {
        self.load(&format!("{ZONE_PREFIX}{video}"))
    }

    // ---- Analysis records ----

    pub fn put_analysis(&self, record: &AnalysisRecord) -> CoreResult<()> {
        self.save(&format!("{ANALYSIS_PREFIX}{}", record.video), record)
    }

    pub fn analysis(&self, video: &str) -> CoreResult<Option<AnalysisRecord>> {
        self.load(&format!("{ANALYSIS_PREFIX}{video}"))
    }

    /// Videos with a stored analysis record.
    pub fn analyzed_videos(&self) -> CoreResult<Vec<String>> {
        Ok(self
            .store
            .keys(ANALYSIS_PREFIX)?
            .into_iter()
            .filter_map(|k| k.strip_prefix(ANALYSIS_PREFIX).map(str::to_string))
            .collect())
    }

    // ---- Sync offsets ----

    /// Stores the offset of `right` relative to `left`, replacing whatever
    /// was stored for the pair in either order.
    pub fn put_sync(&self, left: &str, right: &str, offset: SyncOffset) -> CoreResult<()> {
        let pair = SyncPair::canonical(left, right, offset);
        self.save(&pair.key(), &pair)
    }

    /// Offset of `right` relative to `left`.
    pub fn sync(&self, left: &str, right: &str) -> CoreResult<Option<SyncOffset>> {
        Ok(self
            .load::<SyncPair>(&sync_key(left, right))?
            .map(|pair| pair.offset_from(left)))
    }

    /// Every stored offset, ordered by pair.
    pub fn sync_pairs(&self) -> CoreResult<Vec<SyncPair>> {
        self.store
            .keys(SYNC_PREFIX)?
            .iter()
            .filter_map(|key| self.load::<SyncPair>(key).transpose())
            .collect()
    }

    // ---- Coverage sessions ----

    pub fn put_coverage(&self, session: &CoverageSession) -> CoreResult<()> {
        self.save(
            &pair_key(COVERAGE_PREFIX, &session.left_video, &session.right_video),
            session,
        )
    }

    pub fn coverage(&self, left: &str, right: &str) -> CoreResult<Option<CoverageSession>> {
        self.load(&pair_key(COVERAGE_PREFIX, left, right))
    }

    // ---- Operator edits ----

    /// Stores a hand-edited segment list for a pair. Empty segments are
    /// dropped and the rest sorted by start. Planning a session never
    /// touches this entry.
    pub fn put_edited_segments(
        &self,
        left: &str,
        right: &str,
        segments: &[CoverageSegment],
    ) -> CoreResult<Vec<CoverageSegment>> {
        let mut segments = normalize_segments(segments);
        segments.sort_by(|a, b| a.start.total_cmp(&b.start));
        self.save(&pair_key(EDIT_PREFIX, left, right), &segments)?;
        Ok(segments)
    }

    pub fn edited_segments(&self, left: &str, right: &str) -> CoreResult<Option<Vec<CoverageSegment>>> {
        self.load(&pair_key(EDIT_PREFIX, left, right))
    }
}
