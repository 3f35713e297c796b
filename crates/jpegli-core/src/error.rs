//! Error types for the forward transform stage

use thiserror::Error;

/// Result type for jpegli operations
pub type JpegliResult<T> = Result<T, JpegliError>;

/// Errors raised while setting up a transform pass
///
/// The numeric kernels themselves never fail; these errors only come from
/// validating caller-supplied views and from explicit target selection.
#[derive(Error, Debug)]
pub enum JpegliError {
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Buffer too small: expected {expected}, got {actual}")]
    BufferTooSmall { expected: usize, actual: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unsupported SIMD target: {0}")]
    UnsupportedTarget(String),
}
