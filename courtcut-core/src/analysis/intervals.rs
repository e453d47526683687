//! Consolidation of raw highlight windows into continuous clips.

use crate::model::ClipInterval;

/// Merges touching or overlapping intervals.
///
/// The result is sorted by start and strictly separated: for adjacent
/// entries `a.end < b.start`. The input is left untouched.
#[must_use]
pub fn merge_intervals(intervals: &[ClipInterval]) -> Vec<ClipInterval> {
    let mut sorted = intervals.to_vec();
    sorted.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut merged: Vec<ClipInterval> = Vec::with_capacity(sorted.len());
    for interval in sorted {
        match merged.last_mut() {
            Some(current) if interval.start <= current.end => {
                current.end = current.end.max(interval.end);
            }
            _ => merged.push(interval),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(start: f64, end: f64) -> ClipInterval {
        ClipInterval::new(start, end)
    }

    #[test]
    fn merges_overlapping_neighbours() {
        let merged = merge_intervals(&[iv(0.0, 5.0), iv(4.0, 10.0), iv(12.0, 15.0)]);
        assert_eq!(merged, vec![iv(0.0, 10.0), iv(12.0, 15.0)]);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(merge_intervals(&[]).is_empty());
    }

    #[test]
    fn touching_intervals_are_joined() {
        let merged = merge_intervals(&[iv(5.0, 8.0), iv(0.0, 5.0)]);
        assert_eq!(merged, vec![iv(0.0, 8.0)]);
    }

    #[test]
    fn contained_interval_does_not_shrink_span() {
        let merged = merge_intervals(&[iv(0.0, 20.0), iv(3.0, 4.0), iv(19.0, 21.0)]);
        assert_eq!(merged, vec![iv(0.0, 21.0)]);
    }

    #[test]
    fn merging_is_idempotent() {
        let input = [
            iv(30.0, 33.0),
            iv(1.0, 2.0),
            iv(2.5, 9.0),
            iv(8.0, 8.5),
            iv(31.0, 40.0),
        ];
        let once = merge_intervals(&input);
        assert_eq!(merge_intervals(&once), once);
        for pair in once.windows(2) {
            assert!(pair[0].end < pair[1].start);
        }
    }
}
