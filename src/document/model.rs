//! The project document: assets, tracks, clips, and canvas settings.
//!
//! Everything here serializes as JSON for project persistence. Asset binary
//! content is held behind an `Arc` and skipped during serialization; it is
//! shared by identity across undo snapshots.

use crate::animation::keyframe::{AnimProp, Keyframe};
use crate::effects::transition::TransitionConfig;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Kind of source material an asset refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    /// Video with an intrinsic duration.
    Video,
    /// Still image.
    Image,
    /// Audio with an intrinsic duration.
    Audio,
    /// Styled text rendered by the engine.
    Text,
    /// Decorative element (shapes, stickers); behaves like an image.
    Element,
}

impl AssetKind {
    /// Whether the source has an intrinsic duration that bounds trimming.
    pub fn is_bounded(self) -> bool {
        matches!(self, Self::Video | Self::Audio)
    }
}

/// A piece of source material referenced by clips.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Asset {
    /// Unique asset id.
    pub id: String,
    /// Source kind.
    pub kind: AssetKind,
    /// Display name.
    pub name: String,
    /// Intrinsic duration in seconds; 0 until probed for bounded kinds.
    #[serde(default)]
    pub duration: f64,
    /// Optional source URL or path.
    #[serde(default)]
    pub url: Option<String>,
    /// Optional sub-kind for element assets.
    #[serde(default)]
    pub element_kind: Option<String>,
    /// Raw source bytes, shared by identity across undo snapshots.
    #[serde(skip)]
    pub content: Option<Arc<Vec<u8>>>,
}

/// Normalized crop rectangle, all fields in `[0, 1]` of the source size.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CropRect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width fraction.
    pub width: f64,
    /// Height fraction.
    pub height: f64,
}

/// How cropped content is fitted to the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fit {
    /// Letterbox inside the canvas.
    #[default]
    Contain,
    /// Fill the canvas, overflowing on one axis.
    Cover,
}

/// Horizontal text alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Left aligned.
    Left,
    /// Centered.
    #[default]
    Center,
    /// Right aligned.
    Right,
}

/// Case transform applied before layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextTransform {
    /// No transform.
    #[default]
    None,
    /// Force upper case.
    Uppercase,
    /// Force lower case.
    Lowercase,
}

/// Styling for text clips.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextStyle {
    /// The text content.
    pub content: String,
    /// Font size in canvas units.
    pub font_size: f64,
    /// Font family name (must be registered with the text engine).
    pub font_family: String,
    /// Fill color as a CSS hex string.
    pub color: String,
    /// Optional background color behind the text.
    pub background: Option<String>,
    /// Horizontal alignment.
    pub align: TextAlign,
    /// Font weight (CSS scale, 400 = normal).
    pub weight: u16,
    /// Italic style.
    pub italic: bool,
    /// Line height as a multiple of font size.
    pub line_height: f64,
    /// Additional advance between characters, canvas units.
    pub letter_spacing: f64,
    /// Case transform.
    pub transform: TextTransform,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            content: "Text".to_string(),
            font_size: 40.0,
            font_family: "sans-serif".to_string(),
            color: "#ffffff".to_string(),
            background: None,
            align: TextAlign::Center,
            weight: 400,
            italic: false,
            line_height: 1.2,
            letter_spacing: 0.0,
            transform: TextTransform::None,
        }
    }
}

fn default_scale() -> f64 {
    1.0
}

fn default_opacity() -> f64 {
    100.0
}

fn default_volume() -> f64 {
    100.0
}

fn default_rate() -> f64 {
    1.0
}

/// Per-clip placement, animation, effect, and audio settings.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ClipProperties {
    /// Horizontal offset from canvas center, canvas units.
    pub x: f64,
    /// Vertical offset from canvas center, canvas units.
    pub y: f64,
    /// Rotation in degrees.
    pub rotation: f64,
    /// Uniform content scale.
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Mirror horizontally.
    pub flip_h: bool,
    /// Mirror vertically.
    pub flip_v: bool,
    /// Fit mode for media content.
    pub fit: Fit,
    /// Optional normalized crop.
    pub crop: Option<CropRect>,
    /// Opacity in percent (0..100).
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// Brightness adjustment in percent points around 0.
    pub brightness: f64,
    /// Contrast adjustment in percent points around 0.
    pub contrast: f64,
    /// Saturation adjustment in percent points around 0.
    pub saturation: f64,
    /// Hue rotation in degrees.
    pub hue: f64,
    /// Blur strength; maps to `blur / 5` canvas pixels.
    pub blur: f64,
    /// Filter preset id; unknown ids are ignored at render time.
    pub filter: Option<String>,
    /// Keyframes per animatable property, each list sorted by time.
    pub keyframes: BTreeMap<AnimProp, Vec<Keyframe>>,
    /// Entrance transition.
    pub transition_in: Option<TransitionConfig>,
    /// Exit transition.
    pub transition_out: Option<TransitionConfig>,
    /// Source playback rate multiplier.
    #[serde(default = "default_rate")]
    pub playback_rate: f64,
    /// Volume in percent (0..100).
    #[serde(default = "default_volume")]
    pub volume: f64,
    /// Fade-in window in seconds.
    pub fade_in: f64,
    /// Fade-out window in seconds.
    pub fade_out: f64,
    /// Noise reduction request for audio playback.
    pub noise_reduction: bool,
    /// Text styling for text clips.
    pub text: Option<TextStyle>,
}

impl Default for ClipProperties {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            scale: 1.0,
            flip_h: false,
            flip_v: false,
            fit: Fit::Contain,
            crop: None,
            opacity: 100.0,
            brightness: 0.0,
            contrast: 0.0,
            saturation: 0.0,
            hue: 0.0,
            blur: 0.0,
            filter: None,
            keyframes: BTreeMap::new(),
            transition_in: None,
            transition_out: None,
            playback_rate: 1.0,
            volume: 100.0,
            fade_in: 0.0,
            fade_out: 0.0,
            noise_reduction: false,
            text: None,
        }
    }
}

/// A placed span of an asset on a track.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct TimelineClip {
    /// Unique clip id.
    pub id: String,
    /// Referenced asset id.
    pub asset_id: String,
    /// Timeline start in seconds.
    pub start: f64,
    /// Duration on the timeline in seconds.
    pub duration: f64,
    /// Seconds into the source where playback begins.
    #[serde(default)]
    pub offset: f64,
    /// Owning track id.
    pub track_id: String,
    /// Placement and effect settings.
    #[serde(default)]
    pub properties: ClipProperties,
}

impl TimelineClip {
    /// Timeline end in seconds (exclusive).
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    /// Whether `time` falls inside the clip's half-open span.
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && time < self.end()
    }
}

/// An ordered lane of clips. Track order is z-order: later tracks draw on top.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Track {
    /// Unique track id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Clips on this track.
    #[serde(default)]
    pub clips: Vec<TimelineClip>,
    /// Muted tracks silence their clips' audio.
    #[serde(default)]
    pub muted: bool,
    /// Hidden tracks are skipped by the compositor and are inert to edits.
    #[serde(default)]
    pub hidden: bool,
    /// Locked tracks reject clip edits.
    #[serde(default)]
    pub locked: bool,
}

fn default_canvas_background() -> String {
    "#000000".to_string()
}

/// Output canvas resolution and background.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CanvasSettings {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Background color as a CSS hex string.
    #[serde(default = "default_canvas_background")]
    pub background: String,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            background: default_canvas_background(),
        }
    }
}

/// A complete editable project.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct ProjectDocument {
    /// Project id.
    #[serde(default)]
    pub id: String,
    /// Imported assets.
    #[serde(default)]
    pub assets: Vec<Asset>,
    /// Tracks in z-order (first track at the bottom).
    #[serde(default)]
    pub tracks: Vec<Track>,
    /// Canvas settings.
    #[serde(default)]
    pub canvas: CanvasSettings,
}

#[cfg(test)]
#[path = "../../tests/unit/document/model.rs"]
mod tests;
