use super::*;
use crate::animation::ease::Ease;
use crate::animation::keyframe::Keyframe;
use crate::document::model::{CanvasSettings, Track};
use crate::effects::transition::{TransitionConfig, TransitionKind};
use crate::media::sim::SimMedia;

fn clip(id: &str, start: f64, duration: f64) -> TimelineClip {
    TimelineClip {
        id: id.into(),
        asset_id: format!("asset-{id}"),
        start,
        duration,
        offset: 0.0,
        track_id: "t".into(),
        properties: ClipProperties::default(),
    }
}

fn track(id: &str, clips: Vec<TimelineClip>) -> Track {
    Track {
        id: id.into(),
        name: id.into(),
        clips,
        muted: false,
        hidden: false,
        locked: false,
    }
}

#[test]
fn render_state_defaults_are_neutral() {
    let c = clip("a", 0.0, 10.0);
    let s = clip_render_state(&c, 5.0, 1920.0, 1080.0, &InteractionOverlay::default());
    assert_eq!(s.offset, Vec2::ZERO);
    assert_eq!(s.rotation, 0.0);
    assert_eq!(s.scale, 1.0);
    assert_eq!(s.opacity, 1.0);
    assert_eq!((s.flip_x, s.flip_y), (1.0, 1.0));
    assert!(s.clip_rect.is_none());
}

#[test]
fn render_state_evaluates_keyframes_in_clip_time() {
    let mut c = clip("a", 10.0, 4.0);
    c.properties.keyframes.insert(
        AnimProp::X,
        vec![
            Keyframe { time: 0.0, value: 0.0, ease: Ease::Linear },
            Keyframe { time: 4.0, value: 100.0, ease: Ease::Linear },
        ],
    );
    let s = clip_render_state(&c, 12.0, 1920.0, 1080.0, &InteractionOverlay::default());
    assert_eq!(s.offset.x, 50.0);
}

#[test]
fn render_state_composes_fade_transition_and_opacity() {
    let mut c = clip("a", 0.0, 10.0);
    c.properties.opacity = 50.0;
    c.properties.fade_in = 2.0;
    c.properties.transition_in =
        Some(TransitionConfig { kind: TransitionKind::Fade, duration: 2.0 });
    let s = clip_render_state(&c, 1.0, 1920.0, 1080.0, &InteractionOverlay::default());
    assert_eq!(s.opacity, 0.5 * 0.5 * 0.5);
}

#[test]
fn render_state_multiplies_transition_scale() {
    let mut c = clip("a", 0.0, 10.0);
    c.properties.scale = 2.0;
    c.properties.transition_in =
        Some(TransitionConfig { kind: TransitionKind::ZoomIn, duration: 2.0 });
    let s = clip_render_state(&c, 1.0, 1920.0, 1080.0, &InteractionOverlay::default());
    assert_eq!(s.scale, 1.0);
}

#[test]
fn render_state_flips_mirror_axes() {
    let mut c = clip("a", 0.0, 10.0);
    c.properties.flip_h = true;
    c.properties.flip_v = true;
    let s = clip_render_state(&c, 5.0, 1920.0, 1080.0, &InteractionOverlay::default());
    assert_eq!((s.flip_x, s.flip_y), (-1.0, -1.0));
}

#[test]
fn drag_offset_applies_only_to_the_dragged_clip() {
    let c = clip("a", 0.0, 10.0);
    let other = clip("b", 0.0, 10.0);
    let overlay = InteractionOverlay {
        selected_clip: Some("a".into()),
        dragging: true,
        resizing: false,
        drag_offset: Vec2::new(30.0, -10.0),
    };

    let s = clip_render_state(&c, 5.0, 1920.0, 1080.0, &overlay);
    assert_eq!(s.offset, Vec2::new(30.0, -10.0));

    let s = clip_render_state(&other, 5.0, 1920.0, 1080.0, &overlay);
    assert_eq!(s.offset, Vec2::ZERO);

    // A resize gesture suppresses the move preview.
    let resizing = InteractionOverlay { resizing: true, ..overlay };
    let s = clip_render_state(&c, 5.0, 1920.0, 1080.0, &resizing);
    assert_eq!(s.offset, Vec2::ZERO);
}

#[test]
fn active_clips_skip_hidden_tracks_and_order_bottom_first() {
    let mut doc = ProjectDocument::default();
    doc.tracks = vec![
        track("bottom", vec![clip("a", 0.0, 10.0)]),
        track("hidden", vec![clip("h", 0.0, 10.0)]),
        track("top", vec![clip("b", 2.0, 4.0), clip("c", 8.0, 4.0)]),
    ];
    doc.tracks[1].hidden = true;

    let active = active_clips(&doc, 3.0);
    let ids: Vec<&str> = active.iter().map(|(_, c)| c.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);

    // The clip end is exclusive.
    let at_end = active_clips(&doc, 6.0);
    let ids: Vec<&str> = at_end.iter().map(|(_, c)| c.id.as_str()).collect();
    assert_eq!(ids, vec!["a"]);
}

#[test]
fn render_frame_rejects_degenerate_canvases() {
    let mut compositor = Compositor::new();
    let mut media = MediaCache::with_factory(Box::new(|_| None));
    let overlay = InteractionOverlay::default();

    let mut doc = ProjectDocument::default();
    doc.canvas = CanvasSettings { width: 0, height: 100, background: "#000000".into() };
    assert!(compositor.render_frame(&doc, 0.0, &mut media, &overlay).is_err());

    doc.canvas.width = 100_000;
    assert!(compositor.render_frame(&doc, 0.0, &mut media, &overlay).is_err());
}

#[test]
fn render_frame_sizes_the_surface_to_the_canvas() {
    let mut compositor = Compositor::new();
    let mut media = MediaCache::with_factory(Box::new(|_| None));
    let overlay = InteractionOverlay::default();

    let mut doc = ProjectDocument::default();
    doc.canvas = CanvasSettings { width: 64, height: 32, background: "#ff0000".into() };

    assert!(compositor.surface_size().is_none());
    compositor.render_frame(&doc, 0.0, &mut media, &overlay).unwrap();
    assert_eq!(compositor.surface_size(), Some((64, 32)));
    assert_eq!(compositor.surface_bytes().unwrap().len(), 64 * 32 * 4);

    // Resizing the canvas reallocates the surface.
    doc.canvas.height = 48;
    compositor.render_frame(&doc, 0.0, &mut media, &overlay).unwrap();
    assert_eq!(compositor.surface_size(), Some((64, 48)));
}

#[test]
fn render_frame_draws_media_clips() {
    let mut compositor = Compositor::new();
    let mut media = MediaCache::with_factory(Box::new(|a: &Asset| {
        Some(Box::new(SimMedia::new(
            a.duration as u32,
            a.duration as u32,
            a.duration,
        )))
    }));
    let overlay = InteractionOverlay::default();

    let mut doc = ProjectDocument::default();
    doc.canvas = CanvasSettings { width: 64, height: 64, background: "#000000".into() };
    doc.add_assets([Asset {
        id: "asset-a".into(),
        kind: AssetKind::Image,
        name: "a".into(),
        duration: 64.0,
        url: None,
        element_kind: None,
        content: None,
    }]);
    doc.tracks = vec![track("t", vec![clip("a", 0.0, 10.0)])];

    media.sync_assets(&doc);
    compositor.render_frame(&doc, 5.0, &mut media, &overlay).unwrap();
    assert_eq!(compositor.surface_size(), Some((64, 64)));
}
