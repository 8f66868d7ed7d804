//! Coordinate mapping between clip-local, canvas, and screen space.
//!
//! The canvas is composited at `CanvasSettings` resolution but displayed
//! inside an arbitrary on-screen rectangle. All hit-testing goes through the
//! same forward mapping the compositor uses for placement: scale, then
//! rotate, then translate to canvas center plus the clip offset.

use crate::document::model::{Asset, AssetKind, CanvasSettings, ClipProperties, Fit, TextStyle};
use kurbo::{Point, Vec2};

/// On-screen rectangle the canvas is displayed in, in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenRect {
    /// Left edge in screen space.
    pub left: f64,
    /// Top edge in screen space.
    pub top: f64,
    /// Displayed width.
    pub width: f64,
    /// Displayed height.
    pub height: f64,
}

/// Map a clip-local point to screen space using the clip's base placement.
pub fn local_to_screen(
    local: Point,
    props: &ClipProperties,
    canvas: &CanvasSettings,
    rect: ScreenRect,
) -> Point {
    let cx = f64::from(canvas.width) / 2.0 + props.x;
    let cy = f64::from(canvas.height) / 2.0 + props.y;
    let rot = props.rotation.to_radians();

    let sx = local.x * props.scale;
    let sy = local.y * props.scale;
    let rx = sx * rot.cos() - sy * rot.sin();
    let ry = sx * rot.sin() + sy * rot.cos();

    let screen_scale_x = rect.width / f64::from(canvas.width);
    let screen_scale_y = rect.height / f64::from(canvas.height);
    Point::new(
        rect.left + (cx + rx) * screen_scale_x,
        rect.top + (cy + ry) * screen_scale_y,
    )
}

/// Map a screen-space point into canvas coordinates.
pub fn screen_to_canvas(pt: Point, canvas: &CanvasSettings, rect: ScreenRect) -> Point {
    let scale_x = f64::from(canvas.width) / rect.width;
    let scale_y = f64::from(canvas.height) / rect.height;
    Point::new((pt.x - rect.left) * scale_x, (pt.y - rect.top) * scale_y)
}

/// Rotate a canvas-space point into a clip's unrotated frame about `center`.
pub fn unrotate_about(pt: Point, center: Point, rotation_deg: f64) -> Point {
    let rot = (-rotation_deg).to_radians();
    let dx = pt.x - center.x;
    let dy = pt.y - center.y;
    Point::new(
        dx * rot.cos() - dy * rot.sin(),
        dx * rot.sin() + dy * rot.cos(),
    )
}

/// Inverse of [`local_to_screen`]: map a screen point to clip-local space.
pub fn screen_to_local(
    pt: Point,
    props: &ClipProperties,
    canvas: &CanvasSettings,
    rect: ScreenRect,
) -> Point {
    let canvas_pt = screen_to_canvas(pt, canvas, rect);
    let center = Point::new(
        f64::from(canvas.width) / 2.0 + props.x,
        f64::from(canvas.height) / 2.0 + props.y,
    );
    let unrotated = unrotate_about(canvas_pt, center, props.rotation);
    let s = if props.scale != 0.0 { props.scale } else { 1.0 };
    Point::new(unrotated.x / s, unrotated.y / s)
}

/// Convert a screen-pixel delta into canvas units.
pub fn screen_delta_to_canvas(delta: Vec2, canvas: &CanvasSettings, rect: ScreenRect) -> Vec2 {
    Vec2::new(
        delta.x * f64::from(canvas.width) / rect.width,
        delta.y * f64::from(canvas.height) / rect.height,
    )
}

/// Source sub-rect and draw size produced by crop plus fit resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitRect {
    /// Source sub-rect left, in source pixels.
    pub src_x: f64,
    /// Source sub-rect top, in source pixels.
    pub src_y: f64,
    /// Source sub-rect width, in source pixels.
    pub src_w: f64,
    /// Source sub-rect height, in source pixels.
    pub src_h: f64,
    /// Draw width in canvas units.
    pub draw_w: f64,
    /// Draw height in canvas units.
    pub draw_h: f64,
}

/// Resolve crop and fit for a source of `src_w` x `src_h` pixels.
///
/// The aspect ratio preserved is that of the cropped (visible) region, not
/// the full source. `Fit::Contain` letterboxes inside the canvas,
/// `Fit::Cover` fills it.
pub fn fit_rect(
    props: &ClipProperties,
    src_w: f64,
    src_h: f64,
    canvas_w: f64,
    canvas_h: f64,
) -> FitRect {
    let (mut sx, mut sy, mut sw, mut sh) = (0.0, 0.0, src_w, src_h);
    if let Some(crop) = &props.crop {
        sx = crop.x * src_w;
        sy = crop.y * src_h;
        sw = crop.width * src_w;
        sh = crop.height * src_h;
    }

    let visible_ratio = if sh != 0.0 { sw / sh } else { 1.0 };
    let canvas_ratio = if canvas_h != 0.0 {
        canvas_w / canvas_h
    } else {
        1.0
    };

    let (draw_w, draw_h) = match props.fit {
        Fit::Cover => {
            if visible_ratio > canvas_ratio {
                (canvas_h * visible_ratio, canvas_h)
            } else {
                (canvas_w, canvas_w / visible_ratio)
            }
        }
        Fit::Contain => {
            if visible_ratio > canvas_ratio {
                (canvas_w, canvas_w / visible_ratio)
            } else {
                (canvas_h * visible_ratio, canvas_h)
            }
        }
    };

    FitRect {
        src_x: sx,
        src_y: sy,
        src_w: sw,
        src_h: sh,
        draw_w,
        draw_h,
    }
}

/// Source of natural content sizes for hit-testing and compositing.
///
/// Implemented over the media cache plus the text layout engine so the
/// renderer and the interaction controller share one measurement path.
pub trait ContentProbe {
    /// Natural pixel size of a media-backed asset, when known.
    fn natural_size(&mut self, asset: &Asset) -> Option<(f64, f64)>;
    /// Measured size of styled text, when a font is available.
    fn text_size(&mut self, style: &TextStyle) -> Option<(f64, f64)>;
}

/// Unscaled content size of a clip in canvas units.
///
/// Media whose natural size is not yet known falls back to the canvas size,
/// matching what the compositor would cover while the source loads. The
/// normalized crop shrinks the result.
pub fn clip_content_size(
    props: &ClipProperties,
    asset: &Asset,
    canvas: &CanvasSettings,
    probe: &mut dyn ContentProbe,
) -> (f64, f64) {
    let fallback = (f64::from(canvas.width), f64::from(canvas.height));
    let (mut w, mut h) = match asset.kind {
        AssetKind::Video | AssetKind::Image | AssetKind::Element => {
            probe.natural_size(asset).unwrap_or(fallback)
        }
        AssetKind::Text => {
            let style = props.text.clone().unwrap_or_default();
            probe.text_size(&style).unwrap_or_else(|| {
                // Rough metrics fallback when no font is registered.
                let w = style.content.chars().count() as f64 * style.font_size * 0.6;
                (w.max(1.0), style.font_size * style.line_height)
            })
        }
        AssetKind::Audio => fallback,
    };

    if let Some(crop) = &props.crop {
        w *= crop.width;
        h *= crop.height;
    }
    (w, h)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/geometry.rs"]
mod tests;
