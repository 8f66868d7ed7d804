//! Pointer-driven editing: timeline trims and snapping, canvas gestures.

pub mod canvas;
pub mod timeline;
