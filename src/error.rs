use thiserror::Error;

/// Validation failures reported by the upscaling entry points.
///
/// All checks run before any output grid is allocated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UpscaleError {
    /// Width or height is zero.
    #[error("grid must be non-empty, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },
    /// Channel count is zero.
    #[error("grid must have at least one channel")]
    NoChannels,
    /// Sample buffer length doesn't match `width * height * channels`.
    #[error("sample buffer: expected {expected} elements, got {got}")]
    BufferSizeMismatch { expected: usize, got: usize },
    /// Zoom level below one.
    #[error("zoom level must be at least 1, got {0}")]
    InvalidLevels(usize),
    /// Output dimensions would not fit in memory addressing.
    #[error("output of {width}x{height} after {levels} doublings overflows")]
    DimensionOverflow {
        width: usize,
        height: usize,
        levels: usize,
    },
    /// Configuration value is non-finite or out of range.
    #[error("invalid value {value} for `{name}`: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
    /// Stage inputs disagree on geometry.
    #[error("expected a {expected:?} grid (w, h, channels), got {got:?}")]
    DimensionMismatch {
        expected: (usize, usize, usize),
        got: (usize, usize, usize),
    },
}
