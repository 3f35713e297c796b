//! Constants used throughout the transform stage

/// Edge length of a DCT block
pub const BLOCK_DIM: usize = 8;

/// Number of coefficients in a DCT block
pub const DCT_BLOCK_SIZE: usize = BLOCK_DIM * BLOCK_DIM;

/// Nominal mid-level of the 8-bit sample range, removed from DC after the transform
pub const DC_BIAS: f32 = 128.0;

/// Maximum horizontal/vertical sampling factor allowed by JPEG
pub const MAX_SAMP_FACTOR: usize = 4;

/// Maximum number of components in a frame
pub const MAX_COMPONENTS: usize = 4;

/// Upper clamp for the adaptive dead-zone threshold
pub const MAX_ZERO_BIAS: f32 = 1.5;

/// Dead-zone threshold with zero adaptive strength (plain rounding)
pub const BASE_ZERO_BIAS: f32 = 0.5;
