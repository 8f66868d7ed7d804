use super::*;

#[test]
fn clip_span_is_half_open() {
    let clip = TimelineClip {
        id: "c".into(),
        asset_id: "a".into(),
        start: 2.0,
        duration: 3.0,
        offset: 0.0,
        track_id: "t".into(),
        properties: ClipProperties::default(),
    };
    assert_eq!(clip.end(), 5.0);
    assert!(clip.contains(2.0));
    assert!(clip.contains(4.999));
    assert!(!clip.contains(5.0));
    assert!(!clip.contains(1.999));
}

#[test]
fn properties_default_to_neutral_values() {
    let p = ClipProperties::default();
    assert_eq!(p.scale, 1.0);
    assert_eq!(p.opacity, 100.0);
    assert_eq!(p.volume, 100.0);
    assert_eq!(p.playback_rate, 1.0);
    assert_eq!(p.fit, Fit::Contain);
    assert!(!p.flip_h && !p.flip_v);
    assert!(p.keyframes.is_empty());
}

#[test]
fn sparse_json_fills_property_defaults() {
    let p: ClipProperties = serde_json::from_str(r#"{"x": 5.0}"#).unwrap();
    assert_eq!(p.x, 5.0);
    assert_eq!(p.scale, 1.0);
    assert_eq!(p.opacity, 100.0);
    assert_eq!(p.volume, 100.0);
}

#[test]
fn asset_kind_boundedness() {
    assert!(AssetKind::Video.is_bounded());
    assert!(AssetKind::Audio.is_bounded());
    assert!(!AssetKind::Image.is_bounded());
    assert!(!AssetKind::Text.is_bounded());
    assert!(!AssetKind::Element.is_bounded());
}

#[test]
fn asset_content_is_not_serialized() {
    let asset = Asset {
        id: "a".into(),
        kind: AssetKind::Image,
        name: "pic".into(),
        duration: 0.0,
        url: None,
        element_kind: None,
        content: Some(Arc::new(vec![1, 2, 3])),
    };
    let json = serde_json::to_string(&asset).unwrap();
    assert!(!json.contains("content\":[1,2,3]"));
    let back: Asset = serde_json::from_str(&json).unwrap();
    assert!(back.content.is_none());
}

#[test]
fn document_round_trips_through_json() {
    let mut doc = ProjectDocument::default();
    doc.id = "proj".into();
    doc.tracks.push(Track {
        id: "t1".into(),
        name: "Video".into(),
        clips: vec![TimelineClip {
            id: "c1".into(),
            asset_id: "a1".into(),
            start: 0.0,
            duration: 4.0,
            offset: 1.0,
            track_id: "t1".into(),
            properties: ClipProperties {
                transition_in: Some(TransitionConfig {
                    kind: crate::effects::transition::TransitionKind::Fade,
                    duration: 0.5,
                }),
                ..ClipProperties::default()
            },
        }],
        muted: false,
        hidden: false,
        locked: false,
    });

    let json = serde_json::to_string(&doc).unwrap();
    let back: ProjectDocument = serde_json::from_str(&json).unwrap();
    assert_eq!(back.id, "proj");
    assert_eq!(back.tracks.len(), 1);
    let clip = &back.tracks[0].clips[0];
    assert_eq!(clip.duration, 4.0);
    assert_eq!(clip.properties.transition_in.unwrap().duration, 0.5);
}

#[test]
fn canvas_defaults_to_full_hd_black() {
    let c = CanvasSettings::default();
    assert_eq!((c.width, c.height), (1920, 1080));
    assert_eq!(c.background, "#000000");
}
