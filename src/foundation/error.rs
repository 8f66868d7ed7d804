/// Convenience result type used across Cutline.
pub type CutlineResult<T> = Result<T, CutlineError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Steady-state playback and rendering never surface errors for missing or
/// not-yet-ready media; those paths skip drawing instead. Errors are reserved
/// for construction, validation, and decoding boundaries.
#[derive(thiserror::Error, Debug)]
pub enum CutlineError {
    /// Invalid user-provided or document data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Structural document operations that cannot be expressed.
    #[error("document error: {0}")]
    Document(String),

    /// Errors while probing or decoding media sources.
    #[error("media error: {0}")]
    Media(String),

    /// Errors while compositing a frame.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CutlineError {
    /// Build a [`CutlineError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CutlineError::Document`] value.
    pub fn document(msg: impl Into<String>) -> Self {
        Self::Document(msg.into())
    }

    /// Build a [`CutlineError::Media`] value.
    pub fn media(msg: impl Into<String>) -> Self {
        Self::Media(msg.into())
    }

    /// Build a [`CutlineError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
