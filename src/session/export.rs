//! Deterministic frame-by-frame export.
//!
//! Export never free-runs media: every element is paused and seeked to the
//! exact source time for each frame before the compositor renders it, so the
//! output is identical across runs and machines.

use crate::document::model::{AssetKind, ProjectDocument};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{CutlineError, CutlineResult};
use crate::media::cache::MediaCache;
use crate::render::compositor::{Compositor, InteractionOverlay};
use crate::session::sink::{FrameRgba, FrameSink, SinkConfig};

/// Summary of one export run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ExportStats {
    /// Frames pushed to the sink.
    pub frames_rendered: u64,
}

/// Renders a document's full content range into a [`FrameSink`].
pub struct ExportSession {
    fps: Fps,
}

impl ExportSession {
    /// An export session at the given frame rate.
    pub fn new(fps: Fps) -> Self {
        Self { fps }
    }

    /// Render every frame of the document's content into `sink`.
    ///
    /// Frames cover `[0, content_duration)` at the session frame rate and
    /// are pushed in strictly increasing order.
    pub fn render(
        &self,
        doc: &ProjectDocument,
        media: &mut MediaCache,
        compositor: &mut Compositor,
        sink: &mut dyn FrameSink,
    ) -> CutlineResult<ExportStats> {
        let duration = doc.content_duration();
        let frame_count = self.fps.secs_to_frames_ceil(duration);

        sink.begin(SinkConfig {
            width: doc.canvas.width,
            height: doc.canvas.height,
            fps: self.fps,
        })?;

        media.sync_assets(doc);
        let overlay = InteractionOverlay::default();
        let mut stats = ExportStats::default();

        for frame in 0..frame_count {
            let time = self.fps.frames_to_secs(frame);
            self.position_media(doc, media, time);
            compositor.render_frame(doc, time, media, &overlay)?;

            let (width, height) = compositor
                .surface_size()
                .ok_or_else(|| CutlineError::render("compositor produced no surface"))?;
            let data = compositor
                .surface_bytes()
                .ok_or_else(|| CutlineError::render("compositor produced no surface"))?
                .to_vec();
            sink.push_frame(FrameIndex(frame), &FrameRgba { width, height, data })?;
            stats.frames_rendered += 1;
        }

        sink.end()?;
        tracing::info!(frames = stats.frames_rendered, "export finished");
        Ok(stats)
    }

    /// Pause every element and seek it to the exact source time for `time`.
    fn position_media(&self, doc: &ProjectDocument, media: &mut MediaCache, time: f64) {
        for track in &doc.tracks {
            for clip in &track.clips {
                let Some(asset) = doc.asset(&clip.asset_id) else {
                    continue;
                };
                if !matches!(asset.kind, AssetKind::Video | AssetKind::Audio) {
                    continue;
                }
                let Some(el) = media.get_mut(&asset.id) else {
                    continue;
                };
                if !el.is_paused() {
                    el.pause();
                }
                if !track.hidden && clip.contains(time) {
                    let target = (time - clip.start) * clip.properties.playback_rate + clip.offset;
                    if el.current_time() != target {
                        el.seek(target);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/export.rs"]
mod tests;
