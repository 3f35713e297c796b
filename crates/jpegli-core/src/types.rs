//! Core types for the forward transform stage

use crate::consts::{BLOCK_DIM, DCT_BLOCK_SIZE, MAX_SAMP_FACTOR};
use crate::{JpegliError, JpegliResult};

/// One quantized 8x8 block in natural (row-major) frequency order
pub type CoeffBlock = [i16; DCT_BLOCK_SIZE];

/// Per-frequency multipliers applied to transform output before rounding
pub type QuantMultipliers = [f32; DCT_BLOCK_SIZE];

/// JPEG quantization step table in natural order
pub type QuantTable = [u16; DCT_BLOCK_SIZE];

/// Geometry of one image component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComponentInfo {
    /// Horizontal sampling factor (1-4)
    pub h_samp_factor: usize,
    /// Vertical sampling factor (1-4), also the number of block rows per iMCU row
    pub v_samp_factor: usize,
    /// Number of block columns in the component plane
    pub width_in_blocks: usize,
    /// Number of block rows in the component plane
    pub height_in_blocks: usize,
    /// Horizontal downsampling relative to the full-resolution grid
    pub h_factor: usize,
    /// Vertical downsampling relative to the full-resolution grid
    pub v_factor: usize,
}

impl ComponentInfo {
    /// Derive component geometry from sampling factors and the image size
    ///
    /// `max_h_samp`/`max_v_samp` are the largest factors over all components
    /// of the frame; they must be multiples of this component's factors.
    pub fn new(
        h_samp_factor: usize,
        v_samp_factor: usize,
        max_h_samp: usize,
        max_v_samp: usize,
        image_width: usize,
        image_height: usize,
    ) -> JpegliResult<Self> {
        if image_width == 0 || image_height == 0 {
            return Err(JpegliError::InvalidDimensions {
                width: image_width,
                height: image_height,
            });
        }
        for (factor, max) in [(h_samp_factor, max_h_samp), (v_samp_factor, max_v_samp)] {
            if factor == 0 || factor > MAX_SAMP_FACTOR || max > MAX_SAMP_FACTOR {
                return Err(JpegliError::InvalidParameter(format!(
                    "sampling factor {} (max {}) outside 1..={}",
                    factor, max, MAX_SAMP_FACTOR
                )));
            }
            if max % factor != 0 {
                return Err(JpegliError::InvalidParameter(format!(
                    "sampling factor {} does not divide maximum {}",
                    factor, max
                )));
            }
        }

        let h_factor = max_h_samp / h_samp_factor;
        let v_factor = max_v_samp / v_samp_factor;
        let comp_width = image_width.div_ceil(h_factor);
        let comp_height = image_height.div_ceil(v_factor);

        Ok(Self {
            h_samp_factor,
            v_samp_factor,
            width_in_blocks: comp_width.div_ceil(BLOCK_DIM),
            height_in_blocks: comp_height.div_ceil(BLOCK_DIM),
            h_factor,
            v_factor,
        })
    }

    /// Component geometry for a non-subsampled image
    pub fn full_resolution(image_width: usize, image_height: usize) -> JpegliResult<Self> {
        Self::new(1, 1, 1, 1, image_width, image_height)
    }

    /// Width of the component plane in samples, padded to whole blocks
    pub fn padded_width(&self) -> usize {
        self.width_in_blocks * BLOCK_DIM
    }

    /// Height of the component plane in samples, padded to whole blocks
    pub fn padded_height(&self) -> usize {
        self.height_in_blocks * BLOCK_DIM
    }

    /// Number of iMCU rows needed to cover this component
    pub fn imcu_rows(&self) -> usize {
        self.height_in_blocks.div_ceil(self.v_samp_factor)
    }
}
