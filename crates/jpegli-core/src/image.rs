//! Sample plane views
//!
//! `PlaneRef` is the read-only, strided view the kernels consume. It is used
//! both for component pixel planes and for the adaptive quantization field.
//! `ImagePlane` is an owned, block-padded plane for callers that do not
//! already keep their samples in a suitable layout.

use crate::consts::BLOCK_DIM;
use crate::{JpegliError, JpegliResult};

/// Borrowed 2D plane of `f32` samples with an explicit row stride
#[derive(Debug, Clone, Copy)]
pub struct PlaneRef<'a> {
    data: &'a [f32],
    xsize: usize,
    ysize: usize,
    stride: usize,
}

impl<'a> PlaneRef<'a> {
    pub fn new(data: &'a [f32], xsize: usize, ysize: usize, stride: usize) -> JpegliResult<Self> {
        if xsize == 0 || ysize == 0 {
            return Err(JpegliError::InvalidDimensions {
                width: xsize,
                height: ysize,
            });
        }
        if stride < xsize {
            return Err(JpegliError::InvalidParameter(format!(
                "stride {} smaller than row width {}",
                stride, xsize
            )));
        }
        let expected = (ysize - 1) * stride + xsize;
        if data.len() < expected {
            return Err(JpegliError::BufferTooSmall {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            xsize,
            ysize,
            stride,
        })
    }

    pub fn xsize(&self) -> usize {
        self.xsize
    }

    pub fn ysize(&self) -> usize {
        self.ysize
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Samples of row `y`
    pub fn row(&self, y: usize) -> &'a [f32] {
        assert!(y < self.ysize, "row {} out of range ({})", y, self.ysize);
        let start = y * self.stride;
        &self.data[start..start + self.xsize]
    }

    /// Sample at (`x`, `y`)
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.row(y)[x]
    }

    /// Slice starting at the top-left sample of the 8x8 window at (`x`, `y`)
    ///
    /// The slice extends to the end of the plane, so rows of the window are
    /// reached by stepping `stride()` samples.
    pub fn window(&self, x: usize, y: usize) -> &'a [f32] {
        assert!(
            x + BLOCK_DIM <= self.xsize && y + BLOCK_DIM <= self.ysize,
            "8x8 window at ({}, {}) exceeds {}x{} plane",
            x,
            y,
            self.xsize,
            self.ysize
        );
        &self.data[y * self.stride + x..]
    }
}

/// Owned sample plane padded to whole 8x8 blocks
#[derive(Debug, Clone)]
pub struct ImagePlane {
    data: Vec<f32>,
    xsize: usize,
    ysize: usize,
}

impl ImagePlane {
    /// Zero-filled plane large enough for `width` x `height` samples
    pub fn new(width: usize, height: usize) -> JpegliResult<Self> {
        if width == 0 || height == 0 {
            return Err(JpegliError::InvalidDimensions { width, height });
        }
        let xsize = width.div_ceil(BLOCK_DIM) * BLOCK_DIM;
        let ysize = height.div_ceil(BLOCK_DIM) * BLOCK_DIM;
        Ok(Self {
            data: vec![0.0; xsize * ysize],
            xsize,
            ysize,
        })
    }

    /// Copy `width` x `height` samples in raster order, replicating the last
    /// column and row into the block padding
    pub fn from_samples(samples: &[f32], width: usize, height: usize) -> JpegliResult<Self> {
        if samples.len() < width * height {
            return Err(JpegliError::BufferTooSmall {
                expected: width * height,
                actual: samples.len(),
            });
        }
        let mut plane = Self::new(width, height)?;
        for y in 0..plane.ysize {
            let src_y = y.min(height - 1);
            let src = &samples[src_y * width..(src_y + 1) * width];
            let row = plane.row_mut(y);
            row[..width].copy_from_slice(src);
            let edge = src[width - 1];
            row[width..].fill(edge);
        }
        Ok(plane)
    }

    /// Padded plane width
    pub fn xsize(&self) -> usize {
        self.xsize
    }

    /// Padded plane height
    pub fn ysize(&self) -> usize {
        self.ysize
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [f32] {
        let start = y * self.xsize;
        &mut self.data[start..start + self.xsize]
    }

    pub fn as_plane_ref(&self) -> PlaneRef<'_> {
        PlaneRef {
            data: &self.data,
            xsize: self.xsize,
            ysize: self.ysize,
            stride: self.xsize,
        }
    }
}
