//! Per-iMCU-row driver: pixels in, quantized blocks out
//!
//! One call covers one interleaved MCU row across every component. For a
//! component with vertical sampling factor `v`, that is block rows
//! `imcu_row * v .. imcu_row * v + v`, clipped at the bottom of the plane.

use jpegli_core::consts::{BLOCK_DIM, DCT_BLOCK_SIZE, MAX_COMPONENTS};
use jpegli_core::{BlockStore, ComponentInfo, JpegliError, JpegliResult, PlaneRef, QuantMultipliers};

use crate::adaptive_quant::{relative_quant_strength, zero_bias_threshold};
use crate::dct::transform_from_pixels;
use crate::quantization::{quantize_block, quantize_block_no_aq};
use crate::simd::F32Vec;

/// Inputs for one component, borrowed for the whole encode pass
#[derive(Debug, Clone, Copy)]
pub struct ComponentParams<'a> {
    pub info: ComponentInfo,
    pub pixels: PlaneRef<'a>,
    pub quant_mul: &'a QuantMultipliers,
    pub zero_bias_mul: f32,
}

impl<'a> ComponentParams<'a> {
    /// Validate that `pixels` covers the padded block grid of `info`
    pub fn new(
        info: ComponentInfo,
        pixels: PlaneRef<'a>,
        quant_mul: &'a QuantMultipliers,
        zero_bias_mul: f32,
    ) -> JpegliResult<Self> {
        if pixels.xsize() < info.padded_width() || pixels.ysize() < info.padded_height() {
            return Err(JpegliError::InvalidDimensions {
                width: pixels.xsize(),
                height: pixels.ysize(),
            });
        }
        if !zero_bias_mul.is_finite() || zero_bias_mul < 0.0 {
            return Err(JpegliError::InvalidParameter(format!(
                "zero bias multiplier {} must be finite and non-negative",
                zero_bias_mul
            )));
        }
        if quant_mul.iter().any(|m| !m.is_finite()) {
            return Err(JpegliError::InvalidParameter(
                "quant multipliers must be finite".to_string(),
            ));
        }
        Ok(Self {
            info,
            pixels,
            quant_mul,
            zero_bias_mul,
        })
    }
}

/// Everything the driver reads during one encode pass
#[derive(Debug, Clone)]
pub struct DctParams<'a> {
    components: Vec<ComponentParams<'a>>,
    quant_field: Option<PlaneRef<'a>>,
}

impl<'a> DctParams<'a> {
    /// Parameters with adaptive quantization disabled
    pub fn new(components: Vec<ComponentParams<'a>>) -> JpegliResult<Self> {
        if components.is_empty() || components.len() > MAX_COMPONENTS {
            return Err(JpegliError::InvalidParameter(format!(
                "{} components, expected 1..={}",
                components.len(),
                MAX_COMPONENTS
            )));
        }
        Ok(Self {
            components,
            quant_field: None,
        })
    }

    /// Enable adaptive quantization with `field`
    ///
    /// The field must cover the projected block position of every block of
    /// every component.
    pub fn with_quant_field(mut self, field: PlaneRef<'a>) -> JpegliResult<Self> {
        for comp in &self.components {
            let info = &comp.info;
            let need_x = (info.width_in_blocks - 1) * info.h_factor + 1;
            let need_y = (info.height_in_blocks - 1) * info.v_factor + 1;
            if field.xsize() < need_x || field.ysize() < need_y {
                return Err(JpegliError::InvalidParameter(format!(
                    "quant field {}x{} does not cover {}x{} blocks",
                    field.xsize(),
                    field.ysize(),
                    need_x,
                    need_y
                )));
            }
        }
        self.quant_field = Some(field);
        Ok(self)
    }

    pub fn components(&self) -> &[ComponentParams<'a>] {
        &self.components
    }

    /// `None` when adaptive quantization is disabled
    pub fn quant_field(&self) -> Option<&PlaneRef<'a>> {
        self.quant_field.as_ref()
    }

    /// Number of iMCU rows needed to cover every component
    pub fn imcu_rows(&self) -> usize {
        self.components
            .iter()
            .map(|c| c.info.imcu_rows())
            .max()
            .unwrap_or(0)
    }

    /// Parameters for component `c` alone, which becomes component 0
    pub fn component_params(&self, c: usize) -> DctParams<'a> {
        DctParams {
            components: vec![self.components[c]],
            quant_field: self.quant_field,
        }
    }
}

/// Transform and quantize every block of iMCU row `imcu_row`
#[inline(always)]
pub(crate) fn compute_dct_coefficients_impl<V: F32Vec>(
    params: &DctParams<'_>,
    imcu_row: usize,
    store: &mut dyn BlockStore,
) {
    let mut dct = [0.0f32; DCT_BLOCK_SIZE];
    let mut scratch = [0.0f32; DCT_BLOCK_SIZE];

    for (c, comp) in params.components.iter().enumerate() {
        let info = &comp.info;
        let by0 = imcu_row * info.v_samp_factor;
        if by0 >= info.height_in_blocks {
            continue;
        }
        let num_rows = info.v_samp_factor.min(info.height_in_blocks - by0);
        let stride = comp.pixels.stride();

        let mut rows = store.block_rows_mut(c, by0, num_rows);
        assert_eq!(
            rows.width_in_blocks(),
            info.width_in_blocks,
            "block store width does not match component {}",
            c
        );

        for iy in 0..num_rows {
            let by = by0 + iy;
            for (bx, block) in rows.row_mut(iy).iter_mut().enumerate() {
                let window = comp.pixels.window(bx * BLOCK_DIM, by * BLOCK_DIM);
                transform_from_pixels::<V>(window, stride, &mut dct, &mut scratch);

                match params.quant_field {
                    Some(ref field) => {
                        let relq = relative_quant_strength(field, info, bx, by);
                        let threshold = zero_bias_threshold(comp.zero_bias_mul, relq);
                        quantize_block::<V>(&dct, comp.quant_mul, threshold, block);
                    }
                    None => quantize_block_no_aq::<V>(&dct, comp.quant_mul, block),
                }
            }
        }
        log::trace!(
            "iMCU row {}: component {} block rows {}..{}",
            imcu_row,
            c,
            by0,
            by0 + num_rows
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantization::{generate_quant_table, quant_multipliers};
    use crate::simd::ScalarVec;
    use jpegli_core::{CoefficientBuffers, ImagePlane};

    fn plane_with(width: usize, height: usize, f: impl Fn(usize, usize) -> f32) -> ImagePlane {
        let samples: Vec<f32> = (0..width * height).map(|i| f(i % width, i / width)).collect();
        ImagePlane::from_samples(&samples, width, height).unwrap()
    }

    #[test]
    fn test_params_validation() {
        let info = ComponentInfo::full_resolution(16, 16).unwrap();
        let small = ImagePlane::new(8, 16).unwrap();
        let qmc = [1.0f32; 64];
        assert!(ComponentParams::new(info, small.as_plane_ref(), &qmc, 0.0).is_err());

        let plane = ImagePlane::new(16, 16).unwrap();
        assert!(ComponentParams::new(info, plane.as_plane_ref(), &qmc, -1.0).is_err());
        let comp = ComponentParams::new(info, plane.as_plane_ref(), &qmc, 0.5).unwrap();

        assert!(DctParams::new(vec![]).is_err());
        assert!(DctParams::new(vec![comp; 5]).is_err());

        let field = vec![0.0f32; 4];
        let short = PlaneRef::new(&field, 1, 4, 1).unwrap();
        assert!(DctParams::new(vec![comp]).unwrap().with_quant_field(short).is_err());
        let ok = PlaneRef::new(&field, 2, 2, 2).unwrap();
        let params = DctParams::new(vec![comp]).unwrap().with_quant_field(ok).unwrap();
        assert!(params.quant_field().is_some());
        assert_eq!(params.imcu_rows(), 2);
    }

    #[test]
    fn test_driver_fills_one_imcu_row() {
        let info = ComponentInfo::full_resolution(16, 24).unwrap();
        let plane = plane_with(16, 24, |x, y| if y < 8 { 200.0 } else { (x * 10) as f32 });
        let qmc = quant_multipliers(&generate_quant_table(90.0));
        let comp = ComponentParams::new(info, plane.as_plane_ref(), &qmc, 0.0).unwrap();
        let params = DctParams::new(vec![comp]).unwrap();

        let mut store = CoefficientBuffers::new(&[info]);
        compute_dct_coefficients_impl::<ScalarVec>(&params, 0, &mut store);

        let expected_dc = ((200.0f32 - 128.0) * qmc[0]).round() as i16;
        for bx in 0..2 {
            let block = store.plane(0).block(bx, 0);
            assert_eq!(block[0], expected_dc);
            assert!(block[1..].iter().all(|&v| v == 0));
        }
        // Rows of later iMCU rows stay untouched
        assert!(store.plane(0).block(0, 1).iter().all(|&v| v == 0));

        compute_dct_coefficients_impl::<ScalarVec>(&params, 1, &mut store);
        assert_ne!(store.plane(0).block(0, 1)[1], 0);
    }

    #[test]
    fn test_rows_past_the_end_are_skipped() {
        // 4:2:0, luma 4x3 blocks, chroma 2x2 blocks: the second iMCU row has
        // one luma block row left and one chroma row
        let luma = ComponentInfo::new(2, 2, 2, 2, 32, 24).unwrap();
        let chroma = ComponentInfo::new(1, 1, 2, 2, 32, 24).unwrap();
        assert_eq!(luma.height_in_blocks, 3);
        assert_eq!(chroma.height_in_blocks, 2);

        let y = plane_with(32, 24, |_, _| 255.0);
        let cb = plane_with(16, 12, |_, _| 0.0);
        let qmc = [1.0f32; 64];
        let params = DctParams::new(vec![
            ComponentParams::new(luma, y.as_plane_ref(), &qmc, 0.0).unwrap(),
            ComponentParams::new(chroma, cb.as_plane_ref(), &qmc, 0.0).unwrap(),
        ])
        .unwrap();
        assert_eq!(params.imcu_rows(), 2);

        let mut store = CoefficientBuffers::new(&[luma, chroma]);
        compute_dct_coefficients_impl::<ScalarVec>(&params, 1, &mut store);
        assert_eq!(store.plane(0).block(3, 2)[0], 127);
        assert_eq!(store.plane(0).block(0, 1)[0], 0);
        assert_eq!(store.plane(1).block(1, 1)[0], -128);

        // Past the last row nothing is requested from the store
        compute_dct_coefficients_impl::<ScalarVec>(&params, 5, &mut store);
    }

    #[test]
    fn test_quant_field_widens_dead_zone() {
        let info = ComponentInfo::full_resolution(16, 8).unwrap();
        let plane = plane_with(16, 8, |x, y| 128.0 + (((x % 8) * 7 + y * 3) % 5) as f32);
        let qmc = [8.0f32; 64];
        let comp = ComponentParams::new(info, plane.as_plane_ref(), &qmc, 1.0).unwrap();

        let field_values = [0.0f32, 1.0];
        let field = PlaneRef::new(&field_values, 2, 1, 2).unwrap();
        let params = DctParams::new(vec![comp]).unwrap().with_quant_field(field).unwrap();

        let mut store = CoefficientBuffers::new(&[info]);
        compute_dct_coefficients_impl::<ScalarVec>(&params, 0, &mut store);

        let zeros = |bx: usize| store.plane(0).block(bx, 0)[1..].iter().filter(|&&v| v == 0).count();
        // Both blocks hold the same pattern; only the threshold differs
        assert!(zeros(1) >= zeros(0));
        let full_strength = store.plane(0).block(1, 0);
        assert!(full_strength[1..].iter().all(|&v| v == 0 || v.abs() >= 2));
    }
}
