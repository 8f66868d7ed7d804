//! Still image elements decoded in process.

use crate::document::model::Asset;
use crate::media::element::{MediaElement, MediaFrame, ReadyState};
use std::sync::Arc;

/// A still source backed by an asset's in-memory encoded bytes.
///
/// Decodes on [`MediaElement::load`]; an asset without content stays in the
/// loading state and renders nothing.
pub(crate) struct ImageMedia {
    asset: Asset,
    state: ReadyState,
    frame: Option<MediaFrame>,
}

impl ImageMedia {
    pub(crate) fn new(asset: Asset) -> Self {
        Self { asset, state: ReadyState::Unloaded, frame: None }
    }

    fn decode(&mut self) {
        let Some(bytes) = self.asset.content.as_deref() else {
            tracing::debug!(asset_id = %self.asset.id, "image asset has no content yet");
            self.state = ReadyState::Loading;
            return;
        };
        match image::load_from_memory(bytes) {
            Ok(img) => {
                let rgba = img.to_rgba8();
                let (width, height) = rgba.dimensions();
                let mut data = rgba.into_raw();
                premultiply_rgba8(&mut data);
                self.frame = Some(MediaFrame { width, height, rgba8_premul: Arc::new(data) });
                self.state = ReadyState::HaveCurrentData;
            }
            Err(err) => {
                tracing::warn!(asset_id = %self.asset.id, error = %err, "image decode failed");
                self.state = ReadyState::Loading;
            }
        }
    }
}

impl MediaElement for ImageMedia {
    fn load(&mut self) {
        if self.state == ReadyState::Unloaded {
            self.decode();
        }
    }

    fn unload(&mut self) {
        self.frame = None;
        self.state = ReadyState::Unloaded;
    }

    fn ready_state(&self) -> ReadyState {
        self.state
    }

    fn natural_size(&self) -> Option<(f64, f64)> {
        self.frame.as_ref().map(|f| (f.width as f64, f.height as f64))
    }

    fn duration(&self) -> Option<f64> {
        None
    }

    fn current_time(&self) -> f64 {
        0.0
    }

    fn seek(&mut self, _time: f64) {}

    fn play(&mut self) {}

    fn pause(&mut self) {}

    fn is_paused(&self) -> bool {
        true
    }

    fn rate(&self) -> f64 {
        1.0
    }

    fn set_rate(&mut self, _rate: f64) {}

    fn volume(&self) -> f64 {
        0.0
    }

    fn set_volume(&mut self, _volume: f64) {}

    fn muted(&self) -> bool {
        true
    }

    fn set_muted(&mut self, _muted: bool) {}

    fn current_frame(&mut self) -> Option<MediaFrame> {
        self.frame.clone()
    }
}

pub(crate) fn premultiply_rgba8(data: &mut [u8]) {
    for px in data.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 255 {
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}
