//! Adaptive quantization field and the dead-zone threshold derived from it
//!
//! The field holds one relative quantization strength per block of the
//! full-resolution grid. It is produced by a perceptual model outside this
//! crate; here it is only stored and sampled. Larger values mark regions
//! where the eye tolerates more loss, which widens the dead zone and zeroes
//! more small coefficients.

use jpegli_core::consts::{BASE_ZERO_BIAS, MAX_ZERO_BIAS};
use jpegli_core::{ComponentInfo, JpegliError, JpegliResult, PlaneRef};

/// Dead-zone threshold for one block
///
/// `min(1.5, 0.5 + zero_bias_mul * relq)`. A threshold of 0.5 is plain
/// rounding.
#[inline]
pub fn zero_bias_threshold(zero_bias_mul: f32, relq: f32) -> f32 {
    MAX_ZERO_BIAS.min(BASE_ZERO_BIAS + zero_bias_mul * relq)
}

/// Relative strength for block (`bx`, `by`) of a component
///
/// Block coordinates are projected onto the field's full-resolution grid
/// with the component's downsampling factors.
#[inline]
pub fn relative_quant_strength(field: &PlaneRef<'_>, info: &ComponentInfo, bx: usize, by: usize) -> f32 {
    field.get(bx * info.h_factor, by * info.v_factor)
}

/// Owned per-block relative quantization strengths
#[derive(Debug, Clone)]
pub struct QuantField {
    values: Vec<f32>,
    xsize: usize,
    ysize: usize,
}

impl QuantField {
    /// Field with the same strength everywhere
    pub fn uniform(xsize: usize, ysize: usize, value: f32) -> JpegliResult<Self> {
        Self::from_values(vec![value; xsize * ysize], xsize, ysize)
    }

    /// Field from per-block values in raster order
    pub fn from_values(values: Vec<f32>, xsize: usize, ysize: usize) -> JpegliResult<Self> {
        if xsize == 0 || ysize == 0 {
            return Err(JpegliError::InvalidDimensions {
                width: xsize,
                height: ysize,
            });
        }
        if values.len() != xsize * ysize {
            return Err(JpegliError::BufferTooSmall {
                expected: xsize * ysize,
                actual: values.len(),
            });
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite() || **v < 0.0) {
            return Err(JpegliError::InvalidParameter(format!(
                "quant field value {} is not a finite non-negative number",
                bad
            )));
        }
        Ok(Self {
            values,
            xsize,
            ysize,
        })
    }

    /// Field sized for the full-resolution block grid of `components`
    pub fn for_components(components: &[ComponentInfo], value: f32) -> JpegliResult<Self> {
        let xsize = components
            .iter()
            .map(|c| c.width_in_blocks * c.h_factor)
            .max()
            .unwrap_or(0);
        let ysize = components
            .iter()
            .map(|c| c.height_in_blocks * c.v_factor)
            .max()
            .unwrap_or(0);
        Self::uniform(xsize, ysize, value)
    }

    pub fn xsize(&self) -> usize {
        self.xsize
    }

    pub fn ysize(&self) -> usize {
        self.ysize
    }

    pub fn set(&mut self, x: usize, y: usize, value: f32) {
        self.values[y * self.xsize + x] = value;
    }

    pub fn as_plane_ref(&self) -> PlaneRef<'_> {
        // Dimensions and length were validated on construction
        match PlaneRef::new(&self.values, self.xsize, self.ysize, self.xsize) {
            Ok(plane) => plane,
            Err(e) => unreachable!("quant field invariant violated: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_formula() {
        assert_eq!(zero_bias_threshold(0.0, 3.0), 0.5);
        assert!((zero_bias_threshold(0.25, 2.0) - 1.0).abs() < 1e-6);
        assert_eq!(zero_bias_threshold(10.0, 1.0), 1.5);
    }

    #[test]
    fn test_threshold_monotonic_in_multiplier() {
        let mut previous = 0.0;
        for i in 0..50 {
            let t = zero_bias_threshold(i as f32 * 0.05, 0.8);
            assert!(t >= previous);
            previous = t;
        }
    }

    #[test]
    fn test_field_lookup_projects_subsampled_blocks() {
        let mut field = QuantField::uniform(4, 4, 0.0).unwrap();
        field.set(2, 2, 0.75);
        let chroma = ComponentInfo::new(1, 1, 2, 2, 32, 32).unwrap();
        let luma = ComponentInfo::new(2, 2, 2, 2, 32, 32).unwrap();
        let view = field.as_plane_ref();
        assert_eq!(relative_quant_strength(&view, &chroma, 1, 1), 0.75);
        assert_eq!(relative_quant_strength(&view, &luma, 1, 1), 0.0);
        assert_eq!(relative_quant_strength(&view, &luma, 2, 2), 0.75);
    }

    #[test]
    fn test_field_validation() {
        assert!(QuantField::from_values(vec![0.0; 5], 2, 3).is_err());
        assert!(QuantField::from_values(vec![f32::NAN; 4], 2, 2).is_err());
        assert!(QuantField::from_values(vec![-1.0; 4], 2, 2).is_err());
        assert!(QuantField::uniform(0, 2, 1.0).is_err());
    }

    #[test]
    fn test_field_for_components() {
        let luma = ComponentInfo::new(2, 2, 2, 2, 33, 17).unwrap();
        let chroma = ComponentInfo::new(1, 1, 2, 2, 33, 17).unwrap();
        let field = QuantField::for_components(&[luma, chroma], 0.1).unwrap();
        assert_eq!(field.xsize(), 6);
        assert_eq!(field.ysize(), 4);
    }
}
