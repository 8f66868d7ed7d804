//! Clip entry and exit transitions.
//!
//! A transition contributes an offset, a scale factor, an opacity factor and
//! optionally a canvas-space clip rectangle. The entry transition covers the
//! first `duration` seconds of a clip; the exit transition covers the last.
//! Wipe rectangles are evaluated in canvas space before the clip's own
//! transform and oversized vertically so rotated content stays covered.

use crate::animation::ease::Ease;
use crate::foundation::core::{Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Overdraw margin for wipe clip rectangles, canvas pixels.
const WIPE_MARGIN: f64 = 500.0;

/// The visual shape of a transition.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TransitionKind {
    /// Opacity ramp.
    Fade,
    /// Scale and opacity ramp up from zero.
    ZoomIn,
    /// Scale ramps down from double size while opacity ramps up.
    ZoomOut,
    /// Content slides in from the right edge, out to the left.
    SlideLeft,
    /// Content slides in from the left edge, out to the right.
    SlideRight,
    /// Content slides in from the bottom edge, out through the top.
    SlideUp,
    /// Content slides in from the top edge, out through the bottom.
    SlideDown,
    /// A clip rectangle reveals content right to left.
    WipeLeft,
    /// A clip rectangle reveals content left to right.
    WipeRight,
}

/// A transition attached to one end of a clip.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct TransitionConfig {
    /// Shape of the transition.
    pub kind: TransitionKind,
    /// Length of the ramp in seconds.
    pub duration: f64,
}

/// Accumulated transition contribution for one rendered clip.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionState {
    /// Additional translation in canvas units.
    pub offset: Vec2,
    /// Multiplier on the clip's animated scale.
    pub scale: f64,
    /// Multiplier on the clip's opacity, in `[0, 1]`.
    pub opacity: f64,
    /// Canvas-space clip rectangle for wipes.
    pub clip_rect: Option<Rect>,
}

impl Default for TransitionState {
    fn default() -> Self {
        Self { offset: Vec2::ZERO, scale: 1.0, opacity: 1.0, clip_rect: None }
    }
}

impl TransitionState {
    /// Fold one transition into the accumulated state.
    ///
    /// `progress` runs 0 to 1 over the transition window in both directions;
    /// `is_exit` flips the ramp so exits run toward fully hidden. `width` and
    /// `height` are the canvas dimensions.
    pub fn apply(
        &mut self,
        kind: TransitionKind,
        progress: f64,
        is_exit: bool,
        width: f64,
        height: f64,
    ) {
        let t = if is_exit { 1.0 - progress } else { progress }.clamp(0.0, 1.0);
        match kind {
            TransitionKind::Fade => {
                self.opacity *= t;
            }
            TransitionKind::ZoomIn => {
                self.scale *= t;
                self.opacity *= t;
            }
            TransitionKind::ZoomOut => {
                self.scale *= if is_exit { 1.0 + (1.0 - t) } else { 2.0 - t };
                self.opacity *= t;
            }
            TransitionKind::SlideLeft => {
                let shift = (1.0 - Ease::OutQuad.apply(t)) * width;
                self.offset.x += if is_exit { -shift } else { shift };
            }
            TransitionKind::SlideRight => {
                let shift = (1.0 - Ease::OutQuad.apply(t)) * width;
                self.offset.x += if is_exit { shift } else { -shift };
            }
            TransitionKind::SlideUp => {
                let shift = (1.0 - Ease::OutQuad.apply(t)) * height;
                self.offset.y += if is_exit { -shift } else { shift };
            }
            TransitionKind::SlideDown => {
                let shift = (1.0 - Ease::OutQuad.apply(t)) * height;
                self.offset.y += if is_exit { shift } else { -shift };
            }
            TransitionKind::WipeLeft => {
                let rect = if is_exit {
                    Rect::new(
                        -width / 2.0 - WIPE_MARGIN,
                        -height / 2.0 - WIPE_MARGIN,
                        -width / 2.0 - WIPE_MARGIN + width * t,
                        height / 2.0 + WIPE_MARGIN,
                    )
                } else {
                    Rect::new(
                        width * (1.0 - t),
                        -height / 2.0 - WIPE_MARGIN,
                        width * (1.0 - t) + width,
                        height / 2.0 + WIPE_MARGIN,
                    )
                };
                self.clip_rect = Some(rect);
            }
            TransitionKind::WipeRight => {
                let rect = if is_exit {
                    Rect::new(
                        width * (1.0 - t) - width / 2.0,
                        -height / 2.0 - WIPE_MARGIN,
                        width * (1.0 - t) + width / 2.0,
                        height / 2.0 + WIPE_MARGIN,
                    )
                } else {
                    Rect::new(
                        -width / 2.0 - WIPE_MARGIN,
                        -height / 2.0 - WIPE_MARGIN,
                        -width / 2.0 - WIPE_MARGIN + width * t,
                        height / 2.0 + WIPE_MARGIN,
                    )
                };
                self.clip_rect = Some(rect);
            }
        }
    }
}

/// Evaluate both transitions of a clip at `time_into_clip`.
///
/// An entry transition is active while `time_into_clip` is inside its window;
/// an exit transition while the remaining clip time is inside its window.
pub fn evaluate(
    transition_in: Option<&TransitionConfig>,
    transition_out: Option<&TransitionConfig>,
    time_into_clip: f64,
    clip_duration: f64,
    width: f64,
    height: f64,
) -> TransitionState {
    let mut state = TransitionState::default();
    if let Some(tr) = transition_in
        && tr.duration > 0.0
        && time_into_clip < tr.duration
    {
        let progress = time_into_clip / tr.duration;
        state.apply(tr.kind, progress, false, width, height);
    }
    if let Some(tr) = transition_out
        && tr.duration > 0.0
        && time_into_clip > clip_duration - tr.duration
    {
        let progress = 1.0 - (clip_duration - time_into_clip) / tr.duration;
        state.apply(tr.kind, progress, true, width, height);
    }
    state
}

/// Audio/visual fade multiplier from a clip's fade-in and fade-out windows.
///
/// Fades are linear and independent of transitions; outside both windows the
/// multiplier is 1.
pub fn fade_multiplier(
    fade_in: f64,
    fade_out: f64,
    time_into_clip: f64,
    clip_duration: f64,
) -> f64 {
    let mut gain: f64 = 1.0;
    if fade_in > 0.0 && time_into_clip < fade_in {
        gain = gain.min(time_into_clip / fade_in);
    }
    if fade_out > 0.0 && time_into_clip > clip_duration - fade_out {
        gain = gain.min((clip_duration - time_into_clip) / fade_out);
    }
    gain.clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/transition.rs"]
mod tests;
