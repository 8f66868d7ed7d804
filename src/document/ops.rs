//! Structural mutations on [`ProjectDocument`].
//!
//! Operations that cannot be applied (unknown ids, locked tracks, degenerate
//! parameters) return `false` or `None` instead of erroring; playback must
//! never be interrupted by a rejected edit.

use crate::animation::keyframe::{self, AnimProp, Keyframe};
use crate::document::model::{
    Asset, CanvasSettings, ClipProperties, ProjectDocument, TimelineClip, Track,
};
use std::sync::atomic::{AtomicU64, Ordering};
use xxhash_rust::xxh3::xxh3_64;

/// Shortest a clip may become through trimming or splitting, seconds.
pub const MIN_CLIP_DURATION: f64 = 0.1;

static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a short process-unique id with the given prefix.
pub(crate) fn new_id(prefix: &str) -> String {
    let n = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    let t = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    let mut buf = [0u8; 16];
    buf[..8].copy_from_slice(&n.to_le_bytes());
    buf[8..].copy_from_slice(&t.to_le_bytes());
    format!("{prefix}-{:012x}", xxh3_64(&buf) & 0xffff_ffff_ffff)
}

/// Field-wise patch for [`Asset`] metadata.
#[derive(Clone, Debug, Default)]
pub struct AssetPatch {
    /// New display name.
    pub name: Option<String>,
    /// Probed intrinsic duration in seconds.
    pub duration: Option<f64>,
    /// New source URL.
    pub url: Option<String>,
}

/// Field-wise patch for [`TimelineClip`] placement.
#[derive(Clone, Debug, Default)]
pub struct ClipPatch {
    /// New timeline start.
    pub start: Option<f64>,
    /// New timeline duration.
    pub duration: Option<f64>,
    /// New source offset.
    pub offset: Option<f64>,
    /// Move the clip to another track.
    pub track_id: Option<String>,
    /// Replace the clip's properties wholesale.
    pub properties: Option<ClipProperties>,
}

impl ProjectDocument {
    /// Look up an asset by id.
    pub fn asset(&self, id: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == id)
    }

    /// Look up a clip by id together with its track index.
    pub fn find_clip(&self, clip_id: &str) -> Option<(usize, &TimelineClip)> {
        self.tracks.iter().enumerate().find_map(|(ti, t)| {
            t.clips
                .iter()
                .find(|c| c.id == clip_id)
                .map(|c| (ti, c))
        })
    }

    fn find_clip_mut(&mut self, clip_id: &str) -> Option<(usize, &mut TimelineClip)> {
        self.tracks.iter_mut().enumerate().find_map(|(ti, t)| {
            t.clips
                .iter_mut()
                .find(|c| c.id == clip_id)
                .map(|c| (ti, c))
        })
    }

    /// Append imported assets.
    pub fn add_assets(&mut self, assets: impl IntoIterator<Item = Asset>) {
        self.assets.extend(assets);
    }

    /// Patch asset metadata, typically with probe results.
    ///
    /// A positive probed duration also repairs clips that were placed before
    /// the probe finished and still carry a zero duration. Results for an
    /// asset that has since been removed are discarded.
    pub fn update_asset(&mut self, asset_id: &str, patch: AssetPatch) -> bool {
        let Some(asset) = self.assets.iter_mut().find(|a| a.id == asset_id) else {
            tracing::debug!(asset_id, "dropping update for removed asset");
            return false;
        };
        if let Some(name) = patch.name {
            asset.name = name;
        }
        if let Some(url) = patch.url {
            asset.url = Some(url);
        }
        if let Some(duration) = patch.duration {
            asset.duration = duration;
            if duration > 0.0 {
                for track in &mut self.tracks {
                    for clip in &mut track.clips {
                        if clip.asset_id == asset_id && clip.duration == 0.0 {
                            clip.duration = duration;
                        }
                    }
                }
            }
        }
        true
    }

    /// Remove an asset. Clips referencing it stay in place and simply render
    /// nothing; the media cache tears the element down on its next sync.
    pub fn remove_asset(&mut self, asset_id: &str) -> bool {
        let before = self.assets.len();
        self.assets.retain(|a| a.id != asset_id);
        before != self.assets.len()
    }

    /// Append a new empty track and return its id.
    pub fn add_track(&mut self, name: impl Into<String>) -> String {
        let id = new_id("track");
        self.tracks.push(Track {
            id: id.clone(),
            name: name.into(),
            clips: Vec::new(),
            muted: false,
            hidden: false,
            locked: false,
        });
        id
    }

    /// Move the track at `from` to position `to`.
    pub fn reorder_tracks(&mut self, from: usize, to: usize) -> bool {
        if from >= self.tracks.len() || to >= self.tracks.len() {
            return false;
        }
        let track = self.tracks.remove(from);
        self.tracks.insert(to, track);
        true
    }

    /// Toggle a track's edit lock.
    pub fn toggle_track_lock(&mut self, track_id: &str) -> bool {
        self.with_track(track_id, |t| t.locked = !t.locked)
    }

    /// Toggle a track's visibility.
    pub fn toggle_track_visibility(&mut self, track_id: &str) -> bool {
        self.with_track(track_id, |t| t.hidden = !t.hidden)
    }

    /// Toggle a track's audio mute.
    pub fn toggle_track_mute(&mut self, track_id: &str) -> bool {
        self.with_track(track_id, |t| t.muted = !t.muted)
    }

    /// Rename a track.
    pub fn rename_track(&mut self, track_id: &str, name: impl Into<String>) -> bool {
        let name = name.into();
        self.with_track(track_id, |t| t.name = name)
    }

    fn with_track(&mut self, track_id: &str, f: impl FnOnce(&mut Track)) -> bool {
        match self.tracks.iter_mut().find(|t| t.id == track_id) {
            Some(t) => {
                f(t);
                true
            }
            None => false,
        }
    }

    /// Place a new clip of `asset_id` on a track, returning the clip id.
    ///
    /// Fails on unknown or locked tracks.
    pub fn add_clip(
        &mut self,
        track_id: &str,
        asset_id: &str,
        start: f64,
        duration: f64,
        offset: f64,
    ) -> Option<String> {
        let track = self.tracks.iter_mut().find(|t| t.id == track_id)?;
        if track.locked {
            return None;
        }
        let id = new_id("clip");
        track.clips.push(TimelineClip {
            id: id.clone(),
            asset_id: asset_id.to_string(),
            start: start.max(0.0),
            duration: duration.max(0.0),
            offset: offset.max(0.0),
            track_id: track_id.to_string(),
            properties: ClipProperties::default(),
        });
        Some(id)
    }

    /// Patch a clip's placement, moving it between tracks when the patch
    /// names a different track. Locked source or target tracks reject the
    /// edit.
    pub fn update_clip(&mut self, clip_id: &str, patch: ClipPatch) -> bool {
        let Some((track_idx, _)) = self.find_clip(clip_id) else {
            return false;
        };
        if self.tracks[track_idx].locked {
            return false;
        }

        let target_track = patch
            .track_id
            .as_deref()
            .filter(|tid| *tid != self.tracks[track_idx].id)
            .map(String::from);
        if let Some(tid) = &target_track {
            match self.tracks.iter().find(|t| t.id == *tid) {
                Some(t) if !t.locked => {}
                _ => return false,
            }
        }

        let Some((_, clip)) = self.find_clip_mut(clip_id) else {
            return false;
        };
        if let Some(start) = patch.start {
            clip.start = start.max(0.0);
        }
        if let Some(duration) = patch.duration {
            clip.duration = duration.max(0.0);
        }
        if let Some(offset) = patch.offset {
            clip.offset = offset.max(0.0);
        }
        if let Some(props) = patch.properties {
            clip.properties = props;
        }

        if let Some(tid) = target_track {
            let Some(pos) = self.tracks[track_idx].clips.iter().position(|c| c.id == clip_id)
            else {
                return false;
            };
            let mut moved = self.tracks[track_idx].clips.remove(pos);
            moved.track_id = tid.clone();
            if let Some(t) = self.tracks.iter_mut().find(|t| t.id == tid) {
                t.clips.push(moved);
            }
        }
        true
    }

    /// Mutate a clip's properties in place. Rejected on locked tracks.
    pub fn with_clip_properties(
        &mut self,
        clip_id: &str,
        f: impl FnOnce(&mut ClipProperties),
    ) -> bool {
        let Some((track_idx, _)) = self.find_clip(clip_id) else {
            return false;
        };
        if self.tracks[track_idx].locked {
            return false;
        }
        if let Some((_, clip)) = self.find_clip_mut(clip_id) {
            f(&mut clip.properties);
            true
        } else {
            false
        }
    }

    /// Delete a clip. With `ripple`, later clips on the same track shift left
    /// by the deleted duration to close the gap (clamped at zero).
    pub fn delete_clip(&mut self, clip_id: &str, ripple: bool) -> bool {
        for track in &mut self.tracks {
            if track.locked {
                continue;
            }
            let Some(pos) = track.clips.iter().position(|c| c.id == clip_id) else {
                continue;
            };
            let removed = track.clips.remove(pos);
            if ripple {
                for clip in &mut track.clips {
                    if clip.start >= removed.start {
                        clip.start = (clip.start - removed.duration).max(0.0);
                    }
                }
            }
            return true;
        }
        false
    }

    /// Split a clip at an absolute timeline instant strictly inside its span.
    ///
    /// The first half keeps the clip id; the second half gets a fresh id, its
    /// source offset advanced by the split point, and a deep copy of the
    /// properties. Returns the new clip's id.
    pub fn split_clip(&mut self, clip_id: &str, split_time: f64) -> Option<String> {
        let (track_idx, clip) = self.find_clip(clip_id)?;
        if self.tracks[track_idx].locked {
            return None;
        }
        let relative = split_time - clip.start;
        if relative <= 0.0 || relative >= clip.duration {
            return None;
        }

        let second_id = new_id("clip");
        let track = &mut self.tracks[track_idx];
        let pos = track.clips.iter().position(|c| c.id == clip_id)?;
        let first = &mut track.clips[pos];
        let remainder = first.duration - relative;
        first.duration = relative;

        let second = TimelineClip {
            id: second_id.clone(),
            asset_id: first.asset_id.clone(),
            start: split_time,
            duration: remainder,
            offset: first.offset + relative,
            track_id: first.track_id.clone(),
            properties: first.properties.clone(),
        };
        track.clips.insert(pos + 1, second);
        Some(second_id)
    }

    /// Insert or replace a keyframe on one of a clip's animatable properties.
    pub fn upsert_keyframe(&mut self, clip_id: &str, prop: AnimProp, kf: Keyframe) -> bool {
        self.with_clip_properties(clip_id, |props| {
            keyframe::upsert(props.keyframes.entry(prop).or_default(), kf);
        })
    }

    /// Remove the keyframe nearest `time` on a property, if one is close.
    pub fn remove_keyframe(&mut self, clip_id: &str, prop: AnimProp, time: f64) -> bool {
        let mut removed = false;
        self.with_clip_properties(clip_id, |props| {
            if let Some(keys) = props.keyframes.get_mut(&prop) {
                removed = keyframe::remove_at(keys, time);
                if keys.is_empty() {
                    props.keyframes.remove(&prop);
                }
            }
        }) && removed
    }

    /// Drop all keyframes on a clip.
    pub fn clear_keyframes(&mut self, clip_id: &str) -> bool {
        self.with_clip_properties(clip_id, |props| props.keyframes.clear())
    }

    /// Replace canvas settings.
    pub fn update_canvas(&mut self, canvas: CanvasSettings) {
        self.canvas = canvas;
    }

    /// Latest clip end across all tracks, in seconds.
    pub fn content_duration(&self) -> f64 {
        self.tracks
            .iter()
            .flat_map(|t| t.clips.iter())
            .map(TimelineClip::end)
            .fold(0.0, f64::max)
    }

    /// Visible timeline length: content plus tail room, at least 30 seconds.
    pub fn timeline_duration(&self) -> f64 {
        (self.content_duration() + 10.0).max(30.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/ops.rs"]
mod tests;
