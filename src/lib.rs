//! Cutline is a timeline compositing and playback engine for non-linear video
//! editing.
//!
//! The crate is organized around a small set of cooperating pieces:
//!
//! - A [`ProjectDocument`] holding assets, tracks, clips, and canvas settings,
//!   with snapshot undo/redo through [`History`]
//! - A deterministic [`Compositor`] that renders any timeline instant onto a
//!   pixmap as a pure function of document, time, and media state
//! - A [`PlaybackEngine`] advancing a logical clock and keeping external media
//!   elements in sync with drift correction
//! - Interaction controllers translating pointer gestures and timeline edits
//!   into document mutations
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod effects;
/// Timeline document model, mutation operations, and undo history.
pub mod document;
/// Pointer interaction controllers for canvas and timeline.
pub mod interact;
/// Media element abstraction, cache, and implementations.
pub mod media;
/// The CPU compositor.
pub mod render;
/// Playback clock, sync, and offline export.
pub mod session;

pub use crate::foundation::core::{Affine, BezPath, Fps, FrameIndex, Point, Rect, Rgba8Premul, Vec2};
pub use crate::foundation::error::{CutlineError, CutlineResult};
pub use crate::foundation::geometry::{ContentProbe, ScreenRect};

pub use crate::animation::ease::Ease;
pub use crate::animation::keyframe::{AnimProp, Keyframe};
pub use crate::document::history::History;
pub use crate::document::model::{
    Asset, AssetKind, CanvasSettings, ClipProperties, CropRect, Fit, ProjectDocument, TextStyle,
    TimelineClip, Track,
};
pub use crate::document::ops::{AssetPatch, ClipPatch, MIN_CLIP_DURATION};
pub use crate::effects::transition::{TransitionConfig, TransitionKind};
pub use crate::interact::canvas::{CanvasController, Handle};
pub use crate::interact::timeline::{SnapOptions, TrimResult};
pub use crate::media::cache::MediaCache;
pub use crate::media::element::{MediaElement, MediaFrame, ReadyState};
pub use crate::render::compositor::{Compositor, InteractionOverlay};
pub use crate::session::engine::{PlaybackEngine, PlaybackState};
pub use crate::session::export::{ExportSession, ExportStats};
pub use crate::session::sink::{FrameRgba, FrameSink, InMemorySink, SinkConfig};
