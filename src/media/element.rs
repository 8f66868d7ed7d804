//! The media element abstraction the engine and compositor drive.
//!
//! An element models one loaded asset: it owns playback position, rate,
//! volume and mute state, and can produce the current frame for video-like
//! sources. Implementations decide how time advances; decoders that follow
//! an external clock may ignore [`MediaElement::advance`].

use std::sync::Arc;

/// Load progress of a media element.
///
/// Ordering matters: a state at or past [`ReadyState::HaveMetadata`] means
/// dimensions and duration are known.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum ReadyState {
    /// Nothing fetched yet.
    Unloaded,
    /// Fetch or decode in flight.
    Loading,
    /// Dimensions and duration known, no frame yet.
    HaveMetadata,
    /// A frame is available at the current position.
    HaveCurrentData,
}

/// One decoded frame in premultiplied rgba8.
#[derive(Clone, Debug)]
pub struct MediaFrame {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Pixel data, `width * height * 4` bytes.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Playback-controllable handle over one asset's media.
pub trait MediaElement: Send {
    /// Begin loading. Idempotent.
    fn load(&mut self);

    /// Release decoded data. The element may be loaded again later.
    fn unload(&mut self);

    /// Current load progress.
    fn ready_state(&self) -> ReadyState;

    /// Intrinsic pixel dimensions, once metadata is known.
    fn natural_size(&self) -> Option<(f64, f64)>;

    /// Intrinsic duration in seconds, once metadata is known. `None` for
    /// still sources.
    fn duration(&self) -> Option<f64>;

    /// Current playback position in seconds.
    fn current_time(&self) -> f64;

    /// Jump to a position in seconds.
    fn seek(&mut self, time: f64);

    /// Start advancing with the clock.
    fn play(&mut self);

    /// Stop advancing.
    fn pause(&mut self);

    /// Whether the element is paused.
    fn is_paused(&self) -> bool;

    /// Current playback rate.
    fn rate(&self) -> f64;

    /// Set the playback rate.
    fn set_rate(&mut self, rate: f64);

    /// Current volume in `[0, 1]`.
    fn volume(&self) -> f64;

    /// Set the volume in `[0, 1]`.
    fn set_volume(&mut self, volume: f64);

    /// Whether audio output is muted.
    fn muted(&self) -> bool;

    /// Mute or unmute audio output.
    fn set_muted(&mut self, muted: bool);

    /// Advance the element clock by `dt` seconds while playing. Elements
    /// driven by an external clock ignore this.
    fn advance(&mut self, dt: f64) {
        let _ = dt;
    }

    /// The frame at the current position, if decoded.
    fn current_frame(&mut self) -> Option<MediaFrame>;
}
