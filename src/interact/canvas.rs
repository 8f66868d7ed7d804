//! Canvas pointer gestures: selection, move, and handle resize.
//!
//! The controller owns the [`InteractionOverlay`] the compositor reads.
//! Moves stay uncommitted in the overlay until pointer-up so undo captures
//! one edit per gesture; resizes write the scale live because the handles
//! themselves are derived from it.

use crate::document::model::{AssetKind, ProjectDocument};
use crate::foundation::core::{Point, Vec2};
use crate::foundation::geometry::{
    clip_content_size, local_to_screen, screen_delta_to_canvas, screen_to_canvas,
    screen_to_local, unrotate_about, ContentProbe, ScreenRect,
};
use crate::render::compositor::{active_clips, InteractionOverlay};

/// Handle hit radius in screen pixels.
const HANDLE_HIT_RADIUS_PX: f64 = 12.0;

/// Smallest scale a resize gesture may produce.
const MIN_SCALE: f64 = 0.1;

/// One of the eight resize handles around a selected clip.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Handle {
    /// Top-left corner.
    TopLeft,
    /// Top-right corner.
    TopRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom-right corner.
    BottomRight,
    /// Top edge midpoint.
    Top,
    /// Bottom edge midpoint.
    Bottom,
    /// Left edge midpoint.
    Left,
    /// Right edge midpoint.
    Right,
}

impl Handle {
    const ALL: [Handle; 8] = [
        Handle::TopLeft,
        Handle::TopRight,
        Handle::BottomLeft,
        Handle::BottomRight,
        Handle::Top,
        Handle::Bottom,
        Handle::Left,
        Handle::Right,
    ];

    /// Handle position in clip-local space for a content half-size.
    fn local(self, half_w: f64, half_h: f64) -> Point {
        match self {
            Handle::TopLeft => Point::new(-half_w, -half_h),
            Handle::TopRight => Point::new(half_w, -half_h),
            Handle::BottomLeft => Point::new(-half_w, half_h),
            Handle::BottomRight => Point::new(half_w, half_h),
            Handle::Top => Point::new(0.0, -half_h),
            Handle::Bottom => Point::new(0.0, half_h),
            Handle::Left => Point::new(-half_w, 0.0),
            Handle::Right => Point::new(half_w, 0.0),
        }
    }

    fn is_corner(self) -> bool {
        matches!(
            self,
            Handle::TopLeft | Handle::TopRight | Handle::BottomLeft | Handle::BottomRight
        )
    }
}

#[derive(Clone, Copy, Debug)]
struct ResizeStart {
    handle: Handle,
    /// Pointer-down position in clip-local space (scale-divided).
    local: Point,
    x: f64,
    y: f64,
    scale: f64,
    rotation: f64,
}

#[derive(Clone, Copy, Debug)]
enum Gesture {
    Idle,
    Dragging { start_screen: Point, initial_x: f64, initial_y: f64 },
    Resizing(ResizeStart),
}

/// Pointer gesture state machine over the canvas.
pub struct CanvasController {
    overlay: InteractionOverlay,
    gesture: Gesture,
}

impl Default for CanvasController {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasController {
    /// A controller with nothing selected.
    pub fn new() -> Self {
        Self { overlay: InteractionOverlay::default(), gesture: Gesture::Idle }
    }

    /// The overlay the compositor should render with.
    pub fn overlay(&self) -> &InteractionOverlay {
        &self.overlay
    }

    /// Currently selected clip id.
    pub fn selected(&self) -> Option<&str> {
        self.overlay.selected_clip.as_deref()
    }

    /// Select a clip directly, bypassing hit-testing.
    pub fn select(&mut self, clip_id: Option<String>) {
        self.overlay.selected_clip = clip_id;
        self.gesture = Gesture::Idle;
        self.overlay.dragging = false;
        self.overlay.resizing = false;
        self.overlay.drag_offset = Vec2::ZERO;
    }

    /// Handle pointer-down at `pt` (screen space) with the playhead at
    /// `time`.
    ///
    /// Priority order: a resize handle on the selected clip, then the
    /// topmost visible clip under the pointer. Clicking the already selected
    /// clip starts a move; clicking empty canvas deselects.
    pub fn pointer_down(
        &mut self,
        doc: &ProjectDocument,
        time: f64,
        probe: &mut dyn ContentProbe,
        pt: Point,
        rect: ScreenRect,
    ) {
        if let Some(start) = self.hit_handle(doc, time, probe, pt, rect) {
            self.gesture = Gesture::Resizing(start);
            self.overlay.resizing = true;
            return;
        }

        let hit = self.hit_clip(doc, time, probe, pt, rect);
        match hit {
            Some((clip_id, kind)) => {
                let already = self.overlay.selected_clip.as_deref() == Some(clip_id.as_str());
                if already && kind != AssetKind::Audio {
                    if let Some((_, clip)) = doc.find_clip(&clip_id) {
                        self.gesture = Gesture::Dragging {
                            start_screen: pt,
                            initial_x: clip.properties.x,
                            initial_y: clip.properties.y,
                        };
                        self.overlay.dragging = true;
                        self.overlay.drag_offset = Vec2::ZERO;
                    }
                } else {
                    self.overlay.selected_clip = Some(clip_id);
                }
            }
            None => {
                self.overlay.selected_clip = None;
            }
        }
    }

    /// Handle pointer movement. Updates the drag offset or writes the
    /// resized scale live.
    pub fn pointer_move(&mut self, doc: &mut ProjectDocument, pt: Point, rect: ScreenRect) {
        match self.gesture {
            Gesture::Idle => {}
            Gesture::Dragging { start_screen, .. } => {
                let delta = Vec2::new(pt.x - start_screen.x, pt.y - start_screen.y);
                self.overlay.drag_offset = screen_delta_to_canvas(delta, &doc.canvas, rect);
            }
            Gesture::Resizing(start) => {
                let Some(clip_id) = self.overlay.selected_clip.clone() else {
                    return;
                };
                let canvas_pt = screen_to_canvas(pt, &doc.canvas, rect);
                let center = Point::new(
                    f64::from(doc.canvas.width) / 2.0 + start.x,
                    f64::from(doc.canvas.height) / 2.0 + start.y,
                );
                let local = unrotate_about(canvas_pt, center, start.rotation);

                let new_scale = if start.handle.is_corner() {
                    let down_dist = start.local.to_vec2().hypot() * start.scale;
                    if down_dist == 0.0 {
                        return;
                    }
                    start.scale * canvas_pt.distance(center) / down_dist
                } else {
                    let (measure, down) = match start.handle {
                        Handle::Top | Handle::Bottom => (local.y.abs(), start.local.y.abs()),
                        _ => (local.x.abs(), start.local.x.abs()),
                    };
                    let denom = down * start.scale;
                    if denom == 0.0 {
                        return;
                    }
                    start.scale * measure / denom
                };

                let new_scale = new_scale.max(MIN_SCALE);
                doc.with_clip_properties(&clip_id, |p| p.scale = new_scale);
            }
        }
    }

    /// Handle pointer-up: commit the move, end the gesture.
    pub fn pointer_up(&mut self, doc: &mut ProjectDocument) {
        match self.gesture {
            Gesture::Idle => {}
            Gesture::Dragging { initial_x, initial_y, .. } => {
                if let Some(clip_id) = self.overlay.selected_clip.clone() {
                    let offset = self.overlay.drag_offset;
                    doc.with_clip_properties(&clip_id, |p| {
                        p.x = initial_x + offset.x;
                        p.y = initial_y + offset.y;
                    });
                }
            }
            Gesture::Resizing(_) => {}
        }
        self.gesture = Gesture::Idle;
        self.overlay.dragging = false;
        self.overlay.resizing = false;
        self.overlay.drag_offset = Vec2::ZERO;
    }

    fn hit_handle(
        &self,
        doc: &ProjectDocument,
        time: f64,
        probe: &mut dyn ContentProbe,
        pt: Point,
        rect: ScreenRect,
    ) -> Option<ResizeStart> {
        let clip_id = self.overlay.selected_clip.as_deref()?;
        let (track_idx, clip) = doc.find_clip(clip_id)?;
        if doc.tracks[track_idx].hidden || !clip.contains(time) {
            return None;
        }
        let asset = doc.asset(&clip.asset_id)?;
        if asset.kind == AssetKind::Audio {
            return None;
        }
        let props = clip.properties.clone();
        let (w, h) = clip_content_size(&props, asset, &doc.canvas, probe);

        for handle in Handle::ALL {
            let local = handle.local(w / 2.0, h / 2.0);
            let screen = local_to_screen(local, &props, &doc.canvas, rect);
            if screen.distance(pt) <= HANDLE_HIT_RADIUS_PX {
                return Some(ResizeStart {
                    handle,
                    local: screen_to_local(pt, &props, &doc.canvas, rect),
                    x: props.x,
                    y: props.y,
                    scale: props.scale,
                    rotation: props.rotation,
                });
            }
        }
        None
    }

    /// Topmost visible clip containing the pointer, with its asset kind.
    fn hit_clip(
        &self,
        doc: &ProjectDocument,
        time: f64,
        probe: &mut dyn ContentProbe,
        pt: Point,
        rect: ScreenRect,
    ) -> Option<(String, AssetKind)> {
        for (_, clip) in active_clips(doc, time).into_iter().rev() {
            let kind = match doc.asset(&clip.asset_id) {
                Some(a) => a.kind,
                None if clip.properties.text.is_some() => AssetKind::Text,
                None => continue,
            };
            if kind == AssetKind::Audio {
                continue;
            }
            let asset = doc.asset(&clip.asset_id);
            let (w, h) = match asset {
                Some(a) => clip_content_size(&clip.properties, a, &doc.canvas, probe),
                None => {
                    let style = clip.properties.text.clone().unwrap_or_default();
                    probe.text_size(&style).unwrap_or((0.0, 0.0))
                }
            };
            let local = screen_to_local(pt, &clip.properties, &doc.canvas, rect);
            if local.x.abs() <= w / 2.0 && local.y.abs() <= h / 2.0 {
                return Some((clip.id.clone(), kind));
            }
        }
        None
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interact/canvas.rs"]
mod tests;
