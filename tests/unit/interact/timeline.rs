use super::*;
use crate::document::model::{Asset, AssetKind};

/// Two clips at [0, 5) and [8, 12); content ends at 12.
fn doc() -> (ProjectDocument, String, String) {
    let mut doc = ProjectDocument::default();
    doc.add_assets([Asset {
        id: "a".into(),
        kind: AssetKind::Video,
        name: "a".into(),
        duration: 30.0,
        url: None,
        element_kind: None,
        content: None,
    }]);
    let track = doc.add_track("Track 1");
    let first = doc.add_clip(&track, "a", 0.0, 5.0, 0.0).unwrap();
    let second = doc.add_clip(&track, "a", 8.0, 4.0, 0.0).unwrap();
    (doc, first, second)
}

// 15 px at 30 px/s puts the snap radius at half a second.
fn opts() -> SnapOptions {
    SnapOptions::new(30.0)
}

#[test]
fn snaps_to_the_closest_clip_edge() {
    let (doc, _, _) = doc();
    assert_eq!(snap_time(&doc, 5.3, 100.0, None, &opts()), Some(5.0));
    assert_eq!(snap_time(&doc, 7.8, 100.0, None, &opts()), Some(8.0));
    assert_eq!(snap_time(&doc, 6.5, 100.0, None, &opts()), None);
}

#[test]
fn snaps_to_zero_playhead_and_timeline_end() {
    let (doc, _, _) = doc();
    assert_eq!(snap_time(&doc, 0.3, 100.0, None, &opts()), Some(0.0));
    assert_eq!(snap_time(&doc, 6.4, 6.2, None, &opts()), Some(6.2));
    // Content ends at 12, so the padded timeline runs to 30.
    assert_eq!(doc.timeline_duration(), 30.0);
    assert_eq!(snap_time(&doc, 29.7, 100.0, None, &opts()), Some(30.0));
    assert_eq!(snap_time(&doc, 11.8, 100.0, None, &opts()), Some(12.0));
}

#[test]
fn ignored_clip_contributes_no_edges() {
    let (doc, first, _) = doc();
    assert_eq!(snap_time(&doc, 4.8, 100.0, None, &opts()), Some(5.0));
    assert_eq!(snap_time(&doc, 4.8, 100.0, Some(&first), &opts()), None);
}

#[test]
fn disabled_snapping_returns_nothing() {
    let (doc, _, _) = doc();
    assert_eq!(snap_time(&doc, 5.0, 5.0, None, &SnapOptions::off()), None);
}

#[test]
fn trim_end_extends_and_clamps_to_minimum() {
    let (doc, _, second) = doc();
    let r = trim_end(&doc, &second, 8.0, 4.0, 0.0, 1.5, None, 100.0, &SnapOptions::off());
    assert_eq!(r, TrimResult { start: 8.0, duration: 5.5, offset: 0.0 });

    let r = trim_end(&doc, &second, 8.0, 4.0, 0.0, -10.0, None, 100.0, &SnapOptions::off());
    assert_eq!(r.duration, MIN_CLIP_DURATION);
}

#[test]
fn trim_end_caps_at_remaining_source_material() {
    let (doc, _, second) = doc();
    let r = trim_end(
        &doc,
        &second,
        8.0,
        4.0,
        2.0,
        100.0,
        Some(10.0),
        100.0,
        &SnapOptions::off(),
    );
    // 10 seconds of material minus a 2 second offset.
    assert_eq!(r.duration, 8.0);
    assert_eq!(r.offset, 2.0);
}

#[test]
fn trim_end_snaps_to_a_neighboring_edge() {
    let (doc, _, second) = doc();
    // End lands at 4.7, within range of the first clip's end at 5.
    let r = trim_end(&doc, &second, 2.0, 2.7, 0.0, 0.0, None, 100.0, &opts());
    assert_eq!(r.duration, 3.0);
}

#[test]
fn trim_end_rejects_snaps_below_minimum_duration() {
    let (doc, _, second) = doc();
    let r = trim_end(&doc, &second, 4.95, 0.1, 0.0, 0.25, None, 100.0, &opts());
    // Snapping to 5.0 would leave 0.05 seconds; the raw trim stands.
    assert!((r.duration - 0.35).abs() < 1e-9);
}

#[test]
fn trim_start_moves_the_left_edge_and_offset_together() {
    let (doc, _, second) = doc();
    let r = trim_start(&doc, &second, 2.0, 3.0, 1.0, 0.5, None, 100.0, &SnapOptions::off());
    assert_eq!(r, TrimResult { start: 2.5, duration: 2.5, offset: 1.5 });
}

#[test]
fn trim_start_pins_the_offset_at_the_source_head() {
    let (doc, _, second) = doc();
    let r = trim_start(&doc, &second, 2.0, 3.0, 1.0, -2.0, None, 100.0, &SnapOptions::off());
    // Only one second of leading material exists.
    assert_eq!(r, TrimResult { start: 1.0, duration: 4.0, offset: 0.0 });
}

#[test]
fn trim_start_keeps_the_minimum_duration() {
    let (doc, _, second) = doc();
    let r = trim_start(&doc, &second, 2.0, 3.0, 1.0, 10.0, None, 100.0, &SnapOptions::off());
    assert!((r.start - 4.9).abs() < 1e-9);
    assert!((r.duration - MIN_CLIP_DURATION).abs() < 1e-9);
    assert!((r.offset - 3.9).abs() < 1e-9);
}

#[test]
fn trim_start_snaps_before_following_the_offset() {
    let (doc, _, second) = doc();
    let r = trim_start(&doc, &second, 5.6, 3.0, 1.0, -0.3, None, 100.0, &opts());
    assert_eq!(r.start, 5.0);
    assert!((r.offset - 0.4).abs() < 1e-9);
    assert!((r.duration - 3.6).abs() < 1e-9);
}

#[test]
fn trim_start_caps_the_offset_at_the_source_tail() {
    let (doc, _, second) = doc();
    let r = trim_start(&doc, &second, 2.0, 3.0, 1.0, 2.5, Some(3.0), 100.0, &SnapOptions::off());
    assert_eq!(r.start, 4.5);
    assert_eq!(r.offset, 3.0);
    assert_eq!(r.duration, 0.5);
}

#[test]
fn move_drop_passes_through_without_snap() {
    let (doc, _, second) = doc();
    assert_eq!(move_drop(&doc, &second, 6.4, 1.0, 100.0, &opts()), 6.4);
    // Drops never land before the timeline origin.
    assert_eq!(move_drop(&doc, &second, -2.0, 1.0, 100.0, &SnapOptions::off()), 0.0);
}

#[test]
fn move_drop_snaps_either_edge() {
    let (doc, _, second) = doc();
    // Leading edge near the first clip's end.
    assert_eq!(move_drop(&doc, &second, 4.8, 2.0, 100.0, &opts()), 5.0);
    // Trailing edge near the first clip's end.
    assert_eq!(move_drop(&doc, &second, 2.7, 2.0, 100.0, &opts()), 3.0);
}

#[test]
fn move_drop_prefers_the_closer_snap() {
    let (doc, _, second) = doc();
    // Start could snap to 5 (0.4 away); end could snap to 12 (0.2 away).
    let start = move_drop(&doc, &second, 4.6, 7.2, 100.0, &opts());
    assert!((start - 4.8).abs() < 1e-9);
}
