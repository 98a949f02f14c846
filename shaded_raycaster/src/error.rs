use thiserror::Error;

use crate::render::RenderMode;

/// Errors reported by the renderer.
///
/// Everything after construction works on validated in-memory state,
/// so most variants signal a caller mistake rather than a runtime condition.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid volume: {0}")]
    InvalidVolume(&'static str),

    #[error("pass result requested in mode {actual:?}, expected {expected:?}")]
    InvalidModeTransition {
        expected: RenderMode,
        actual: RenderMode,
    },

    #[error("unsupported gradient estimator: {0}")]
    UnsupportedGradientKind(String),

    #[error("{what} has {actual} values, volume has {expected} samples")]
    InputLength {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid render options: {0}")]
    InvalidOptions(&'static str),

    #[error("image buffer has {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("cannot parse volume file: {0}")]
    Parse(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
