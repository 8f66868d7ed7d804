use super::*;
use crate::document::model::{Asset, AssetKind};
use crate::document::ops::AssetPatch;
use std::sync::Arc;

fn doc_with_asset() -> ProjectDocument {
    let mut doc = ProjectDocument::default();
    doc.add_assets([Asset {
        id: "a".into(),
        kind: AssetKind::Video,
        name: "clip.mp4".into(),
        duration: 0.0,
        url: None,
        element_kind: None,
        content: Some(Arc::new(vec![0u8; 8])),
    }]);
    doc
}

#[test]
fn undo_and_redo_walk_track_edits() {
    let mut history = History::new(ProjectDocument::default());
    assert!(!history.can_undo() && !history.can_redo());
    assert!(!history.undo());
    assert!(!history.redo());

    history.checkpoint();
    history.present.add_track("A");
    history.checkpoint();
    history.present.add_track("B");
    assert_eq!(history.present.tracks.len(), 2);

    assert!(history.undo());
    assert_eq!(history.present.tracks.len(), 1);
    assert!(history.undo());
    assert!(history.present.tracks.is_empty());
    assert!(!history.can_undo());

    assert!(history.redo());
    assert!(history.redo());
    assert_eq!(history.present.tracks.len(), 2);
    assert!(!history.can_redo());
}

#[test]
fn checkpoint_clears_the_redo_stack() {
    let mut history = History::new(ProjectDocument::default());
    history.checkpoint();
    history.present.add_track("A");
    assert!(history.undo());
    assert!(history.can_redo());

    history.checkpoint();
    history.present.add_track("C");
    assert!(!history.can_redo());
    assert!(!history.redo());
}

#[test]
fn undo_keeps_the_current_asset_list() {
    let mut history = History::new(doc_with_asset());
    history.checkpoint();
    // A probe finishing after the checkpoint must survive undo.
    history.present.update_asset(
        "a",
        AssetPatch { duration: Some(12.0), ..Default::default() },
    );

    assert!(history.undo());
    assert_eq!(history.present.assets[0].duration, 12.0);

    assert!(history.redo());
    assert_eq!(history.present.assets[0].duration, 12.0);
}

#[test]
fn asset_content_is_shared_not_copied() {
    let mut history = History::new(doc_with_asset());
    let original = history.present.assets[0].content.clone().unwrap();
    history.checkpoint();
    history.present.add_track("A");

    assert!(history.undo());
    let restored = history.present.assets[0].content.clone().unwrap();
    assert!(Arc::ptr_eq(&original, &restored));
}
