//! Transitions and color filtering.

pub(crate) mod filters;
pub(crate) mod transition;
