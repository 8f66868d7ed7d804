//! Playback and export sessions built on the compositor.

pub mod engine;
pub mod export;
pub mod sink;
