//! Media elements, decoding, and the per-document element cache.

pub mod cache;
pub mod element;
#[cfg(feature = "media-ffmpeg")]
pub(crate) mod ffmpeg;
pub(crate) mod image;
pub mod sim;
pub(crate) mod text;

use crate::document::model::{Asset, AssetKind, TextStyle};
use crate::foundation::geometry::ContentProbe;
use cache::MediaCache;
use text::TextLayoutEngine;

/// Element factory used when none is supplied: images and elements decode in
/// process, video and audio go through ffmpeg when the `media-ffmpeg` feature
/// is enabled.
pub fn default_factory(asset: &Asset) -> Option<Box<dyn element::MediaElement>> {
    match asset.kind {
        AssetKind::Image | AssetKind::Element => {
            Some(Box::new(image::ImageMedia::new(asset.clone())))
        }
        #[cfg(feature = "media-ffmpeg")]
        AssetKind::Video | AssetKind::Audio => {
            Some(Box::new(ffmpeg::FfmpegMedia::new(asset.clone())))
        }
        #[cfg(not(feature = "media-ffmpeg"))]
        AssetKind::Video | AssetKind::Audio => None,
        AssetKind::Text => None,
    }
}

/// Measures content against live media elements and laid-out text.
///
/// Borrows the cache and text engine for the duration of one geometry query.
pub(crate) struct CacheProbe<'a> {
    pub(crate) cache: &'a mut MediaCache,
    pub(crate) text: &'a mut TextLayoutEngine,
}

impl ContentProbe for CacheProbe<'_> {
    fn natural_size(&mut self, asset: &Asset) -> Option<(f64, f64)> {
        self.cache.get_mut(&asset.id).and_then(|el| el.natural_size())
    }

    fn text_size(&mut self, style: &TextStyle) -> Option<(f64, f64)> {
        self.text.measure(style)
    }
}
