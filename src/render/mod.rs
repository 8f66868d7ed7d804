//! Deterministic frame compositing.

pub mod compositor;
