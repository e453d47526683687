use courtcut_core::config::SegmenterConfig;
use courtcut_core::model::{AnalysisRecord, BallObservation, FrameRecord, FrameTrace};
use courtcut_core::store::{Catalog, JsonFileStore, KeyValueStore};
use courtcut_core::{ClipInterval, GoalZone, Side, SyncOffset, plan_coverage};
use tempfile::tempdir;

fn record(video: &str, counts: &[u32]) -> AnalysisRecord {
    let frames = counts
        .iter()
        .enumerate()
        .map(|(i, &c)| FrameRecord::new(i as f64 * 0.5, BallObservation::missing(), c))
        .collect();
    AnalysisRecord::new(
        video,
        FrameTrace::new(2.0, frames),
        vec![ClipInterval::new(0.0, 3.0)],
    )
}

#[test]
fn test_catalog_survives_reopen() {
    let dir = tempdir().unwrap();
    let zone = GoalZone::new(310.0, 120.0, 350.0, 150.0);

    {
        let catalog = Catalog::new(JsonFileStore::open(dir.path()).unwrap());
        catalog.put_zone("court 1/left.mp4", &zone).unwrap();
        catalog.put_analysis(&record("left.mp4", &[3, 3, 3])).unwrap();
        catalog
            .put_sync("left.mp4", "right.mp4", SyncOffset::estimated(1.5))
            .unwrap();
    }

    let catalog = Catalog::new(JsonFileStore::open(dir.path()).unwrap());
    assert_eq!(catalog.zone("court 1/left.mp4").unwrap(), Some(zone));
    assert_eq!(catalog.zone("left.mp4").unwrap(), None);

    let analysis = catalog.analysis("left.mp4").unwrap().unwrap();
    assert_eq!(analysis.trace.len(), 3);
    assert_eq!(analysis.clips, vec![ClipInterval::new(0.0, 3.0)]);
    assert_eq!(catalog.analyzed_videos().unwrap(), vec!["left.mp4".to_string()]);

    assert_eq!(catalog.sync("right.mp4", "left.mp4").unwrap().unwrap().seconds, -1.5);
}

#[test]
fn test_confirmed_offset_replaces_reversed_estimate() {
    let dir = tempdir().unwrap();
    let catalog = Catalog::new(JsonFileStore::open(dir.path()).unwrap());

    catalog
        .put_sync("left.mp4", "right.mp4", SyncOffset::estimated(2.0))
        .unwrap();
    catalog
        .put_sync("right.mp4", "left.mp4", SyncOffset::confirmed(-2.25))
        .unwrap();

    let offset = catalog.sync("left.mp4", "right.mp4").unwrap().unwrap();
    assert_eq!(offset.seconds, 2.25);
    assert!(offset.confirmed);
    assert_eq!(catalog.store().keys("sync/").unwrap().len(), 1);
}

#[test]
fn test_corrupt_entry_is_a_store_error() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::open(dir.path()).unwrap();
    store.put("zone/left.mp4", b"{ not json").unwrap();

    let catalog = Catalog::new(store);
    let err = catalog.zone("left.mp4").unwrap_err();
    assert!(err.to_string().contains("zone/left.mp4"));
}

#[test]
fn test_plan_coverage_over_file_store() {
    let dir = tempdir().unwrap();
    let catalog = Catalog::new(JsonFileStore::open(dir.path()).unwrap());

    // Ten people arrive on the right camera two seconds in.
    catalog
        .put_analysis(&record("left.mp4", &[5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5]))
        .unwrap();
    catalog
        .put_analysis(&record("right.mp4", &[0, 0, 0, 0, 10, 10, 10, 10, 10, 10, 10, 10]))
        .unwrap();

    let session = plan_coverage(
        &catalog,
        "left.mp4",
        "right.mp4",
        Some(5.5),
        &SegmenterConfig::default(),
    )
    .unwrap();

    assert_eq!(session.offset, 0.0);
    assert_eq!(session.duration, 5.5);
    assert_eq!(session.segments.first().unwrap().target, Side::Left);
    assert!(session.segments.iter().any(|s| s.target == Side::Right));
    for pair in session.segments.windows(2) {
        assert_eq!(pair[0].end, pair[1].start);
    }

    let reopened = Catalog::new(JsonFileStore::open(dir.path()).unwrap());
    assert_eq!(reopened.coverage("left.mp4", "right.mp4").unwrap(), Some(session));
}
