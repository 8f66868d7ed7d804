//! The interactive playback loop.
//!
//! Each tick advances the playhead, reconciles every media element with
//! where the timeline says it should be, and renders the frame. Element
//! control writes are change-gated: position is corrected only past a drift
//! tolerance, and rate, volume and mute are written only when the target
//! value differs from what the element already holds.

use crate::document::model::{AssetKind, ProjectDocument, TimelineClip, Track};
use crate::effects::transition;
use crate::foundation::error::CutlineResult;
use crate::media::cache::MediaCache;
use crate::media::element::MediaElement;
use crate::render::compositor::{Compositor, InteractionOverlay};

/// Seek tolerance for video while playing, seconds.
const VIDEO_DRIFT_PLAYING: f64 = 0.5;

/// Seek tolerance for video while paused or scrubbing, seconds.
const VIDEO_DRIFT_PAUSED: f64 = 0.05;

/// Seek tolerance for audio, seconds.
const AUDIO_DRIFT: f64 = 0.3;

/// Smallest volume change worth writing.
const VOLUME_EPS: f64 = 0.01;

/// Whether the playhead is advancing.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum PlaybackState {
    /// Playhead advances with wall time on each tick.
    Playing,
    /// Playhead moves only through seeks.
    #[default]
    Paused,
}

/// Drift-corrected playback driver.
#[derive(Clone, Debug)]
pub struct PlaybackEngine {
    current_time: f64,
    speed: f64,
    state: PlaybackState,
}

impl Default for PlaybackEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackEngine {
    /// A paused engine at time zero.
    pub fn new() -> Self {
        Self { current_time: 0.0, speed: 1.0, state: PlaybackState::Paused }
    }

    /// Current playhead position in seconds.
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Current playback state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Global speed multiplier.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Start playback.
    pub fn play(&mut self) {
        self.state = PlaybackState::Playing;
    }

    /// Pause playback.
    pub fn pause(&mut self) {
        self.state = PlaybackState::Paused;
    }

    /// Flip between playing and paused.
    pub fn toggle(&mut self) {
        self.state = match self.state {
            PlaybackState::Playing => PlaybackState::Paused,
            PlaybackState::Paused => PlaybackState::Playing,
        };
    }

    /// Move the playhead. Elements re-sync on the next tick.
    pub fn seek(&mut self, time: f64) {
        self.current_time = time.max(0.0);
    }

    /// Set the global speed multiplier. Non-positive values are ignored.
    pub fn set_speed(&mut self, speed: f64) {
        if speed > 0.0 && speed.is_finite() {
            self.speed = speed;
        }
    }

    /// Advance one frame: move the playhead, sync media, render.
    ///
    /// Playback auto-pauses when the playhead reaches the end of the
    /// timeline.
    pub fn tick(
        &mut self,
        dt: f64,
        doc: &ProjectDocument,
        media: &mut MediaCache,
        compositor: &mut Compositor,
        overlay: &InteractionOverlay,
    ) -> CutlineResult<()> {
        if self.state == PlaybackState::Playing {
            let end = doc.timeline_duration();
            let next = self.current_time + dt * self.speed;
            if next >= end {
                self.current_time = end;
                self.state = PlaybackState::Paused;
                tracing::debug!(time = end, "playhead reached timeline end");
            } else {
                self.current_time = next;
            }
        }

        media.sync_assets(doc);
        media.advance_all(dt);

        let playing = self.state == PlaybackState::Playing;
        for track in &doc.tracks {
            for clip in &track.clips {
                let Some(asset) = doc.asset(&clip.asset_id) else {
                    continue;
                };
                let Some(el) = media.get_mut(&asset.id) else {
                    continue;
                };
                match asset.kind {
                    AssetKind::Video => self.sync_video(track, clip, el, playing),
                    AssetKind::Audio => self.sync_audio(track, clip, el, playing),
                    _ => {}
                }
            }
        }

        compositor.render_frame(doc, self.current_time, media, overlay)
    }

    fn sync_video(
        &self,
        track: &Track,
        clip: &TimelineClip,
        el: &mut dyn MediaElement,
        playing: bool,
    ) {
        let visible = !track.hidden && clip.contains(self.current_time);
        if !visible {
            if !el.is_paused() {
                el.pause();
            }
            return;
        }

        let props = &clip.properties;
        let clip_rate = props.playback_rate;
        let target = (self.current_time - clip.start) * clip_rate + clip.offset;
        let rate = clip_rate * self.speed;
        let gain = transition::fade_multiplier(
            props.fade_in,
            props.fade_out,
            self.current_time - clip.start,
            clip.duration,
        );
        let volume = (props.volume / 100.0 * gain).clamp(0.0, 1.0);
        let should_mute = track.muted || volume == 0.0;

        if el.muted() != should_mute {
            el.set_muted(should_mute);
        }
        if !should_mute && (el.volume() - volume).abs() > VOLUME_EPS {
            el.set_volume(volume);
        }

        if playing {
            if (el.current_time() - target).abs() > VIDEO_DRIFT_PLAYING {
                el.seek(target);
            }
            if el.rate() != rate {
                el.set_rate(rate);
            }
            if el.is_paused() {
                el.play();
            }
        } else {
            if !el.is_paused() {
                el.pause();
            }
            if (el.current_time() - target).abs() > VIDEO_DRIFT_PAUSED {
                el.seek(target);
            }
        }
    }

    fn sync_audio(
        &self,
        track: &Track,
        clip: &TimelineClip,
        el: &mut dyn MediaElement,
        playing: bool,
    ) {
        let audible = !track.muted && clip.contains(self.current_time);
        if !audible || !playing {
            if !el.is_paused() {
                el.pause();
            }
            return;
        }

        let props = &clip.properties;
        let target = (self.current_time - clip.start) + clip.offset;
        let gain = transition::fade_multiplier(
            props.fade_in,
            props.fade_out,
            self.current_time - clip.start,
            clip.duration,
        );
        let volume = (props.volume / 100.0 * gain).clamp(0.0, 1.0);

        if (el.volume() - volume).abs() > VOLUME_EPS {
            el.set_volume(volume);
        }
        if (el.current_time() - target).abs() > AUDIO_DRIFT {
            el.seek(target);
        }
        if el.rate() != self.speed {
            el.set_rate(self.speed);
        }
        if el.is_paused() {
            el.play();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/engine.rs"]
mod tests;
