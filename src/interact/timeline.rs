//! Timeline trims, moves, and edge snapping.
//!
//! All functions here are pure: they take the gesture's initial state plus
//! the current pointer delta and return the placement the caller should
//! apply. Snapping works in seconds with a threshold scaled by the current
//! zoom, and always picks the single globally closest snap point.

use crate::document::model::ProjectDocument;
use crate::document::ops::MIN_CLIP_DURATION;

/// Snap behavior for timeline gestures.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnapOptions {
    /// Whether snapping is active at all.
    pub enabled: bool,
    /// Snap radius in screen pixels.
    pub threshold_px: f64,
    /// Current zoom: how many screen pixels one second occupies.
    pub pixels_per_second: f64,
}

impl SnapOptions {
    /// Snapping at the default 15 px radius for the given zoom.
    pub fn new(pixels_per_second: f64) -> Self {
        Self { enabled: true, threshold_px: 15.0, pixels_per_second }
    }

    /// Snapping disabled.
    pub fn off() -> Self {
        Self { enabled: false, threshold_px: 0.0, pixels_per_second: 1.0 }
    }

    fn threshold_secs(&self) -> f64 {
        if self.pixels_per_second > 0.0 {
            self.threshold_px / self.pixels_per_second
        } else {
            0.0
        }
    }
}

/// New placement for a trimmed clip.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrimResult {
    /// Timeline start in seconds.
    pub start: f64,
    /// Timeline duration in seconds.
    pub duration: f64,
    /// Source offset in seconds.
    pub offset: f64,
}

/// Snap a candidate time to the closest edge among zero, the playhead, the
/// content end, and every clip boundary except those of `ignore_clip`.
///
/// Returns `None` when snapping is off or nothing is within the threshold.
pub fn snap_time(
    doc: &ProjectDocument,
    time: f64,
    playhead: f64,
    ignore_clip: Option<&str>,
    opts: &SnapOptions,
) -> Option<f64> {
    if !opts.enabled {
        return None;
    }
    let threshold = opts.threshold_secs();

    let mut best: Option<(f64, f64)> = None;
    let mut consider = |point: f64| {
        let diff = (time - point).abs();
        if best.is_none_or(|(d, _)| diff < d) {
            best = Some((diff, point));
        }
    };

    consider(0.0);
    consider(playhead);
    consider(doc.timeline_duration());
    for track in &doc.tracks {
        for clip in &track.clips {
            if ignore_clip == Some(clip.id.as_str()) {
                continue;
            }
            consider(clip.start);
            consider(clip.end());
        }
    }

    best.filter(|(diff, _)| *diff <= threshold).map(|(_, p)| p)
}

/// Trim a clip's right edge by `delta_time` seconds.
///
/// Bounded sources cap the duration at the material remaining past the
/// source offset. A snapped end is accepted only if it keeps the clip at
/// least the minimum duration.
#[allow(clippy::too_many_arguments)]
pub fn trim_end(
    doc: &ProjectDocument,
    clip_id: &str,
    initial_start: f64,
    initial_duration: f64,
    initial_offset: f64,
    delta_time: f64,
    asset_duration: Option<f64>,
    playhead: f64,
    opts: &SnapOptions,
) -> TrimResult {
    let mut duration = (initial_duration + delta_time).max(MIN_CLIP_DURATION);
    if let Some(asset_duration) = asset_duration {
        duration = duration.min((asset_duration - initial_offset).max(MIN_CLIP_DURATION));
    }

    if let Some(snapped_end) =
        snap_time(doc, initial_start + duration, playhead, Some(clip_id), opts)
    {
        let snapped_duration = snapped_end - initial_start;
        if snapped_duration >= MIN_CLIP_DURATION {
            duration = snapped_duration;
            if let Some(asset_duration) = asset_duration {
                duration = duration.min((asset_duration - initial_offset).max(MIN_CLIP_DURATION));
            }
        }
    }

    TrimResult { start: initial_start, duration, offset: initial_offset }
}

/// Trim a clip's left edge by `delta_time` seconds.
///
/// The right edge stays fixed. The source offset follows the start so the
/// visible material does not shift; running out of leading material pins
/// the offset at zero and the start at its earliest reachable point.
#[allow(clippy::too_many_arguments)]
pub fn trim_start(
    doc: &ProjectDocument,
    clip_id: &str,
    initial_start: f64,
    initial_duration: f64,
    initial_offset: f64,
    delta_time: f64,
    asset_duration: Option<f64>,
    playhead: f64,
    opts: &SnapOptions,
) -> TrimResult {
    let end_time = initial_start + initial_duration;
    let raw_start = initial_start + delta_time;
    let candidate =
        snap_time(doc, raw_start, playhead, Some(clip_id), opts).unwrap_or(raw_start);
    let mut start = candidate.clamp(0.0, end_time - MIN_CLIP_DURATION);

    let time_shift = start - initial_start;
    let mut offset = initial_offset + time_shift;
    if offset < 0.0 {
        offset = 0.0;
        start = initial_start - initial_offset;
    } else if let Some(asset_duration) = asset_duration
        && offset > asset_duration
    {
        offset = asset_duration;
    }

    TrimResult { start, duration: end_time - start, offset }
}

/// Resolve the drop position of a moved clip, snapping either edge.
///
/// Both the leading and trailing edge are candidates; the closer snap wins.
pub fn move_drop(
    doc: &ProjectDocument,
    clip_id: &str,
    raw_start: f64,
    duration: f64,
    playhead: f64,
    opts: &SnapOptions,
) -> f64 {
    let by_start = snap_time(doc, raw_start, playhead, Some(clip_id), opts);
    let by_end =
        snap_time(doc, raw_start + duration, playhead, Some(clip_id), opts).map(|t| t - duration);

    let start = match (by_start, by_end) {
        (Some(s), Some(e)) => {
            if (s - raw_start).abs() <= (e - raw_start).abs() {
                s
            } else {
                e
            }
        }
        (Some(s), None) => s,
        (None, Some(e)) => e,
        (None, None) => raw_start,
    };
    start.max(0.0)
}

#[cfg(test)]
#[path = "../../tests/unit/interact/timeline.rs"]
mod tests;
