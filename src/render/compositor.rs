//! Renders one timeline instant to pixels.
//!
//! Draw order is bottom track first; within a frame each clip applies, in
//! order, its wipe clip rectangle (canvas space), center translation plus
//! animated offset, rotation, flip and scale, then an opacity layer around
//! the content fill. The same inputs always produce the same pixels, so the
//! preview loop and the exporter share this path.

use crate::animation::keyframe::{self, AnimProp};
use crate::document::model::{
    Asset, AssetKind, ClipProperties, ProjectDocument, TextStyle, TimelineClip,
};
use crate::effects::filters::FilterChain;
use crate::effects::transition;
use crate::foundation::core::{parse_hex_rgba, Affine, Rect, Rgba8Premul, Vec2};
use crate::foundation::error::{CutlineError, CutlineResult};
use crate::foundation::geometry::fit_rect;
use crate::media::cache::MediaCache;
use crate::media::element::{MediaFrame, ReadyState};
use crate::media::text::TextLayoutEngine;
use smallvec::SmallVec;
use std::sync::Arc;

/// Padding around text behind its background rectangle, canvas units.
const TEXT_BG_PAD: f64 = 20.0;

/// Live interaction state folded into rendering.
///
/// The compositor treats this as read-only; controllers in
/// [`crate::interact`] keep it current while a gesture is in flight.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InteractionOverlay {
    /// Currently selected clip, if any.
    pub selected_clip: Option<String>,
    /// A move gesture is in flight on the selected clip.
    pub dragging: bool,
    /// A resize gesture is in flight on the selected clip.
    pub resizing: bool,
    /// Uncommitted move delta in canvas units.
    pub drag_offset: Vec2,
}

/// Resolved per-frame draw parameters for one clip.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ClipRenderState {
    /// Translation from canvas center, canvas units.
    pub(crate) offset: Vec2,
    /// Rotation in degrees.
    pub(crate) rotation: f64,
    /// Uniform scale after transitions.
    pub(crate) scale: f64,
    /// Final opacity in `[0, 1]`.
    pub(crate) opacity: f64,
    /// Horizontal flip factor, -1 or 1.
    pub(crate) flip_x: f64,
    /// Vertical flip factor, -1 or 1.
    pub(crate) flip_y: f64,
    /// Canvas-space wipe rectangle.
    pub(crate) clip_rect: Option<Rect>,
}

/// Evaluate a clip's animated properties, fades and transitions at `time`.
pub(crate) fn clip_render_state(
    clip: &TimelineClip,
    time: f64,
    canvas_w: f64,
    canvas_h: f64,
    overlay: &InteractionOverlay,
) -> ClipRenderState {
    let props = &clip.properties;
    let into = time - clip.start;
    let anim = |prop: AnimProp, base: f64| -> f64 {
        match props.keyframes.get(&prop) {
            Some(keys) => keyframe::evaluate(base, keys, into),
            None => base,
        }
    };

    let mut x = anim(AnimProp::X, props.x);
    let mut y = anim(AnimProp::Y, props.y);
    let scale = anim(AnimProp::Scale, props.scale);
    let rotation = anim(AnimProp::Rotation, props.rotation);
    let opacity = anim(AnimProp::Opacity, props.opacity);

    let fade = transition::fade_multiplier(props.fade_in, props.fade_out, into, clip.duration);
    let tr = transition::evaluate(
        props.transition_in.as_ref(),
        props.transition_out.as_ref(),
        into,
        clip.duration,
        canvas_w,
        canvas_h,
    );

    if overlay.dragging
        && !overlay.resizing
        && overlay.selected_clip.as_deref() == Some(clip.id.as_str())
    {
        x += overlay.drag_offset.x;
        y += overlay.drag_offset.y;
    }

    ClipRenderState {
        offset: Vec2::new(x + tr.offset.x, y + tr.offset.y),
        rotation,
        scale: scale * tr.scale,
        opacity: ((opacity / 100.0) * fade * tr.opacity).clamp(0.0, 1.0),
        flip_x: if props.flip_h { -1.0 } else { 1.0 },
        flip_y: if props.flip_v { -1.0 } else { 1.0 },
        clip_rect: tr.clip_rect,
    }
}

/// Clips under the playhead on visible tracks, bottom track first.
pub(crate) fn active_clips(
    doc: &ProjectDocument,
    time: f64,
) -> SmallVec<[(usize, &TimelineClip); 8]> {
    let mut out: SmallVec<[(usize, &TimelineClip); 8]> = doc
        .tracks
        .iter()
        .enumerate()
        .filter(|(_, t)| !t.hidden)
        .flat_map(|(ti, t)| t.clips.iter().map(move |c| (ti, c)))
        .filter(|(_, c)| c.contains(time))
        .collect();
    out.sort_by_key(|(ti, _)| *ti);
    out
}

/// Stateful frame renderer with reusable contexts and scratch buffers.
pub struct Compositor {
    ctx: Option<vello_cpu::RenderContext>,
    surface: Option<vello_cpu::Pixmap>,
    text_engine: TextLayoutEngine,
    filter_scratch_a: Vec<u8>,
    filter_scratch_b: Vec<u8>,
    frame_scratch: Vec<u8>,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compositor {
    /// Construct a compositor with no fonts registered.
    pub fn new() -> Self {
        Self {
            ctx: None,
            surface: None,
            text_engine: TextLayoutEngine::new(),
            filter_scratch_a: Vec::new(),
            filter_scratch_b: Vec::new(),
            frame_scratch: Vec::new(),
        }
    }

    /// Register font bytes for text clips under a family name.
    pub fn register_font(&mut self, family: impl Into<String>, bytes: Vec<u8>) {
        self.text_engine.register_font(family, bytes);
    }

    pub(crate) fn text_engine_mut(&mut self) -> &mut TextLayoutEngine {
        &mut self.text_engine
    }

    /// Dimensions of the last rendered frame.
    pub fn surface_size(&self) -> Option<(u32, u32)> {
        self.surface
            .as_ref()
            .map(|s| (u32::from(s.width()), u32::from(s.height())))
    }

    /// Pixels of the last rendered frame, premultiplied rgba8.
    pub fn surface_bytes(&self) -> Option<&[u8]> {
        self.surface.as_ref().map(|s| s.data_as_u8_slice())
    }

    /// Render the document at `time` into the internal surface.
    pub fn render_frame(
        &mut self,
        doc: &ProjectDocument,
        time: f64,
        media: &mut MediaCache,
        overlay: &InteractionOverlay,
    ) -> CutlineResult<()> {
        let width: u16 = doc
            .canvas
            .width
            .try_into()
            .map_err(|_| CutlineError::render("canvas width exceeds u16"))?;
        let height: u16 = doc
            .canvas
            .height
            .try_into()
            .map_err(|_| CutlineError::render("canvas height exceeds u16"))?;
        if width == 0 || height == 0 {
            return Err(CutlineError::render("canvas dimensions must be non-zero"));
        }

        let mut surface = match self.surface.take() {
            Some(s) if s.width() == width && s.height() == height => s,
            _ => vello_cpu::Pixmap::new(width, height),
        };
        let bg = parse_hex_rgba(&doc.canvas.background).unwrap_or([0, 0, 0, 255]);
        let bg = Rgba8Premul::from_straight_rgba(bg[0], bg[1], bg[2], bg[3]);
        clear_pixmap(&mut surface, [bg.r, bg.g, bg.b, bg.a]);

        let canvas_w = f64::from(width);
        let canvas_h = f64::from(height);
        let clips: Vec<(usize, TimelineClip)> = active_clips(doc, time)
            .into_iter()
            .map(|(ti, c)| (ti, c.clone()))
            .collect();

        let result = self.with_ctx_mut(width, height, |this, ctx| {
            for (_, clip) in &clips {
                let state = clip_render_state(clip, time, canvas_w, canvas_h, overlay);
                if state.opacity <= 0.0 || state.scale <= 0.0 {
                    continue;
                }
                let asset = doc.asset(&clip.asset_id);
                this.draw_clip(doc, clip, asset, &state, media, ctx)?;
            }
            ctx.flush();
            ctx.render_to_pixmap(&mut surface);
            Ok(())
        });
        self.surface = Some(surface);
        result
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut Self, &mut vello_cpu::RenderContext) -> CutlineResult<R>,
    ) -> CutlineResult<R> {
        let mut ctx = match self.ctx.take() {
            None => vello_cpu::RenderContext::new(width, height),
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            Some(_) => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(self, &mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_clip(
        &mut self,
        doc: &ProjectDocument,
        clip: &TimelineClip,
        asset: Option<&Asset>,
        state: &ClipRenderState,
        media: &mut MediaCache,
        ctx: &mut vello_cpu::RenderContext,
    ) -> CutlineResult<()> {
        let canvas_w = doc.canvas.width as f64;
        let canvas_h = doc.canvas.height as f64;

        let mut layers = 0usize;
        if let Some(rect) = state.clip_rect {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.push_clip_layer(&rect_to_cpu_path(rect));
            layers += 1;
        }

        let tr = Affine::translate((
            canvas_w / 2.0 + state.offset.x,
            canvas_h / 2.0 + state.offset.y,
        )) * Affine::rotate(state.rotation.to_radians())
            * Affine::scale_non_uniform(state.flip_x * state.scale, state.flip_y * state.scale);

        if state.opacity < 1.0 {
            ctx.set_transform(affine_to_cpu(tr));
            ctx.push_opacity_layer(state.opacity as f32);
            layers += 1;
        }

        match asset.map(|a| a.kind) {
            Some(AssetKind::Video | AssetKind::Image | AssetKind::Element) => {
                if let Some(a) = asset {
                    self.draw_media(a, &clip.properties, tr, canvas_w, canvas_h, media, ctx)?;
                }
            }
            Some(AssetKind::Text) | None => {
                if let Some(style) = clip.properties.text.clone() {
                    self.draw_text(&style, &clip.properties, tr, ctx)?;
                }
            }
            Some(AssetKind::Audio) => {}
        }

        for _ in 0..layers {
            ctx.pop_layer();
        }
        Ok(())
    }

    fn draw_media(
        &mut self,
        asset: &Asset,
        props: &ClipProperties,
        tr: Affine,
        canvas_w: f64,
        canvas_h: f64,
        media: &mut MediaCache,
        ctx: &mut vello_cpu::RenderContext,
    ) -> CutlineResult<()> {
        let Some(el) = media.get_mut(&asset.id) else {
            return Ok(());
        };
        // Sources draw only once their pixels can be trusted: video needs
        // metadata, stills need a decoded frame.
        match asset.kind {
            AssetKind::Video => {
                if el.ready_state() < ReadyState::HaveMetadata {
                    return Ok(());
                }
            }
            _ => {
                if el.ready_state() < ReadyState::HaveCurrentData {
                    return Ok(());
                }
            }
        }
        let Some(frame) = el.current_frame() else {
            return Ok(());
        };

        let chain = FilterChain::from_properties(props);
        let paint = self.frame_paint(&frame, &chain)?;

        let fr = fit_rect(
            props,
            frame.width as f64,
            frame.height as f64,
            canvas_w,
            canvas_h,
        );
        if fr.src_w <= 0.0 || fr.src_h <= 0.0 || fr.draw_w <= 0.0 || fr.draw_h <= 0.0 {
            return Ok(());
        }

        let paint_tr = Affine::translate((-fr.draw_w / 2.0, -fr.draw_h / 2.0))
            * Affine::scale_non_uniform(fr.draw_w / fr.src_w, fr.draw_h / fr.src_h)
            * Affine::translate((-fr.src_x, -fr.src_y));

        ctx.set_transform(affine_to_cpu(tr));
        ctx.set_paint_transform(affine_to_cpu(paint_tr));
        ctx.set_paint(paint);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            -fr.draw_w / 2.0,
            -fr.draw_h / 2.0,
            fr.draw_w / 2.0,
            fr.draw_h / 2.0,
        ));
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        Ok(())
    }

    fn frame_paint(
        &mut self,
        frame: &MediaFrame,
        chain: &FilterChain,
    ) -> CutlineResult<vello_cpu::Image> {
        let pixmap = if chain.is_identity() {
            pixmap_from_premul_bytes(&frame.rgba8_premul, frame.width, frame.height)?
        } else {
            self.frame_scratch.clear();
            self.frame_scratch.extend_from_slice(&frame.rgba8_premul);
            let mut bytes = std::mem::take(&mut self.frame_scratch);
            chain.apply_in_place(
                &mut bytes,
                frame.width,
                frame.height,
                &mut self.filter_scratch_a,
                &mut self.filter_scratch_b,
            )?;
            let pixmap = pixmap_from_premul_bytes(&bytes, frame.width, frame.height)?;
            self.frame_scratch = bytes;
            pixmap
        };
        Ok(vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        })
    }

    fn draw_text(
        &mut self,
        style: &TextStyle,
        props: &ClipProperties,
        tr: Affine,
        ctx: &mut vello_cpu::RenderContext,
    ) -> CutlineResult<()> {
        let chain = FilterChain::from_properties(props);
        let fill = chain.transform_color(parse_hex_rgba(&style.color).unwrap_or([255; 4]));

        let shaped = self.text_engine.shape(style, fill);
        let (text_w, text_h) = match &shaped {
            Some(l) => (l.width, l.height),
            None => self
                .text_engine
                .measure(style)
                .unwrap_or((0.0, style.font_size * style.line_height)),
        };

        if let Some(bg) = style.background.as_deref().and_then(parse_hex_rgba) {
            let bg = chain.transform_color(bg);
            ctx.set_transform(affine_to_cpu(tr));
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(bg[0], bg[1], bg[2], bg[3]));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                -text_w / 2.0 - TEXT_BG_PAD,
                -text_h / 2.0 - TEXT_BG_PAD,
                text_w / 2.0 + TEXT_BG_PAD,
                text_h / 2.0 + TEXT_BG_PAD,
            ));
        }

        let Some(shaped) = shaped else {
            return Ok(());
        };

        ctx.set_transform(affine_to_cpu(
            tr * Affine::translate((-text_w / 2.0, -text_h / 2.0)),
        ));
        for line in shaped.layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph { id: g.id, x: g.x, y: g.y });
                ctx.glyph_run(&shaped.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        Ok(())
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu_path(rect: Rect) -> vello_cpu::kurbo::BezPath {
    let mut p = vello_cpu::kurbo::BezPath::new();
    p.move_to(vello_cpu::kurbo::Point::new(rect.x0, rect.y0));
    p.line_to(vello_cpu::kurbo::Point::new(rect.x1, rect.y0));
    p.line_to(vello_cpu::kurbo::Point::new(rect.x1, rect.y1));
    p.line_to(vello_cpu::kurbo::Point::new(rect.x0, rect.y1));
    p.close_path();
    p
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap, rgba: [u8; 4]) {
    for px in pixmap.data_as_u8_slice_mut().chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> CutlineResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| CutlineError::render("frame width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| CutlineError::render("frame height exceeds u16"))?;
    let expected = width as usize * height as usize * 4;
    if bytes.len() != expected {
        return Err(CutlineError::render(format!(
            "frame buffer is {} bytes, expected {expected}",
            bytes.len()
        )));
    }
    // Pixmap stores PremulRgba8; our bytes are already premultiplied.
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
