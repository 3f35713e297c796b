//! Quantization of transform output into 16-bit coefficients
//!
//! The multiplier tables fold the JPEG quantization step together with the
//! transform's scale: the 2D DCT in this crate is the orthonormal JPEG DCT
//! divided by 8, so a step of `q` becomes a multiplier of `8 / q`.

use jpegli_core::consts::{BLOCK_DIM, DCT_BLOCK_SIZE, DC_BIAS};
use jpegli_core::{CoeffBlock, QuantMultipliers, QuantTable};

use crate::simd::F32Vec;

/// ITU-T T.81 Annex K.1 luminance table, natural order
const BASE_LUMA_QUANT: QuantTable = [
    16, 11, 10, 16, 24, 40, 51, 61, 12, 12, 14, 19, 26, 58, 60, 55, 14, 13, 16, 24, 40, 57, 69,
    56, 14, 17, 22, 29, 51, 87, 80, 62, 18, 22, 37, 56, 68, 109, 103, 77, 24, 35, 55, 64, 81,
    104, 113, 92, 49, 64, 78, 87, 103, 121, 120, 101, 72, 92, 95, 98, 112, 100, 103, 99,
];

/// ITU-T T.81 Annex K.1 chrominance table, natural order
const BASE_CHROMA_QUANT: QuantTable = [
    17, 18, 24, 47, 99, 99, 99, 99, 18, 21, 26, 66, 99, 99, 99, 99, 24, 26, 56, 99, 99, 99, 99,
    99, 47, 66, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99,
];

fn scale_table(base: &QuantTable, quality: f32) -> QuantTable {
    let quality = quality.clamp(1.0, 100.0);
    let scale = if quality < 50.0 {
        5000.0 / quality
    } else {
        200.0 - 2.0 * quality
    };

    let mut table = [0u16; DCT_BLOCK_SIZE];
    for (q, &b) in table.iter_mut().zip(base.iter()) {
        let scaled = ((b as f32 * scale + 50.0) / 100.0).floor().max(1.0) as u16;
        *q = scaled.min(255);
    }
    table
}

/// Luminance quantization table for an IJG-style quality (1-100)
pub fn generate_quant_table(quality: f32) -> QuantTable {
    scale_table(&BASE_LUMA_QUANT, quality)
}

/// Chrominance quantization table for an IJG-style quality (1-100)
pub fn generate_chroma_quant_table(quality: f32) -> QuantTable {
    scale_table(&BASE_CHROMA_QUANT, quality)
}

/// Multipliers for `table` matching the scale of this crate's transform
///
/// Zero steps are treated as 1.
pub fn quant_multipliers(table: &QuantTable) -> QuantMultipliers {
    let mut qmc = [0.0f32; DCT_BLOCK_SIZE];
    for (m, &q) in qmc.iter_mut().zip(table.iter()) {
        *m = BLOCK_DIM as f32 / q.max(1) as f32;
    }
    qmc
}

/// Dead-zone quantization: values whose scaled magnitude is below
/// `threshold` become zero, the rest round to nearest (ties to even)
#[inline(always)]
pub(crate) fn quantize_block<V: F32Vec>(
    dct: &[f32; DCT_BLOCK_SIZE],
    qmc: &QuantMultipliers,
    threshold: f32,
    block: &mut CoeffBlock,
) {
    let thres = V::splat(threshold);
    let mut k = 0;
    while k < DCT_BLOCK_SIZE {
        let val = V::load(&dct[k..]).mul(V::load(&qmc[k..]));
        val.round_zero_below(thres).store_i16(&mut block[k..]);
        k += V::LEN;
    }
    block[0] = recenter_dc(dct[0], qmc[0]);
}

/// Plain quantization without a dead zone
#[inline(always)]
pub(crate) fn quantize_block_no_aq<V: F32Vec>(
    dct: &[f32; DCT_BLOCK_SIZE],
    qmc: &QuantMultipliers,
    block: &mut CoeffBlock,
) {
    let mut k = 0;
    while k < DCT_BLOCK_SIZE {
        let val = V::load(&dct[k..]).mul(V::load(&qmc[k..]));
        val.round().store_i16(&mut block[k..]);
        k += V::LEN;
    }
    block[0] = recenter_dc(dct[0], qmc[0]);
}

/// Quantized DC with the 8-bit mid-level removed
///
/// The transform runs on uncentered samples. A constant offset only moves DC,
/// and DC of a constant block equals the sample value, so subtracting the
/// bias here is the same as centering every sample first. Rounds half away
/// from zero and saturates to the `i16` range.
#[inline]
pub fn recenter_dc(dct0: f32, qmc0: f32) -> i16 {
    ((dct0 - DC_BIAS) * qmc0).round() as i16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::ScalarVec;

    fn sample_dct() -> [f32; 64] {
        core::array::from_fn(|k| {
            let sign = if k % 3 == 0 { -1.0 } else { 1.0 };
            sign * (40.0 / (1.0 + k as f32)) + 0.07 * k as f32
        })
    }

    fn zero_count(block: &CoeffBlock) -> usize {
        block.iter().skip(1).filter(|&&v| v == 0).count()
    }

    #[test]
    fn test_quality_tables() {
        let q50 = generate_quant_table(50.0);
        assert_eq!(q50, BASE_LUMA_QUANT);
        let q100 = generate_quant_table(100.0);
        assert!(q100.iter().all(|&q| q == 1));
        let q10 = generate_quant_table(10.0);
        assert!(q10.iter().zip(q50.iter()).all(|(a, b)| a >= b));
        assert!(q10.iter().all(|&q| q <= 255));

        let c50 = generate_chroma_quant_table(50.0);
        assert_eq!(c50, BASE_CHROMA_QUANT);
    }

    #[test]
    fn test_multipliers_are_reciprocal_steps() {
        let table = generate_quant_table(75.0);
        let qmc = quant_multipliers(&table);
        for k in 0..64 {
            assert!((qmc[k] * table[k] as f32 - 8.0).abs() < 1e-5);
        }
        assert_eq!(quant_multipliers(&[0u16; 64])[0], 8.0);
    }

    #[test]
    fn test_mid_level_block_quantizes_to_zero() {
        let mut dct = [0.0f32; 64];
        dct[0] = 128.0;
        let qmc = quant_multipliers(&generate_quant_table(90.0));
        let mut block = [1i16; 64];
        quantize_block::<ScalarVec>(&dct, &qmc, 0.5, &mut block);
        assert!(block.iter().all(|&v| v == 0));
        let mut block = [1i16; 64];
        quantize_block_no_aq::<ScalarVec>(&dct, &qmc, &mut block);
        assert!(block.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_dc_ignores_dead_zone() {
        let mut dct = [0.0f32; 64];
        dct[0] = 129.0;
        let qmc = [1.0f32; 64];
        let mut block = [0i16; 64];
        quantize_block::<ScalarVec>(&dct, &qmc, 1.5, &mut block);
        assert_eq!(block[0], 1);
    }

    #[test]
    fn test_dc_rounds_half_away_from_zero() {
        assert_eq!(recenter_dc(130.5, 1.0), 3);
        assert_eq!(recenter_dc(125.5, 1.0), -3);
        assert_eq!(recenter_dc(128.0, 8.0), 0);
    }

    #[test]
    fn test_zero_count_monotonic_in_threshold() {
        let dct = sample_dct();
        let qmc = quant_multipliers(&generate_quant_table(85.0));

        let mut previous = 0;
        for step in 0..=20 {
            let threshold = 0.5 + step as f32 * 0.05;
            let mut block = [0i16; 64];
            quantize_block::<ScalarVec>(&dct, &qmc, threshold, &mut block);
            let zeros = zero_count(&block);
            assert!(
                zeros >= previous,
                "threshold {} gave {} zeros, fewer than {}",
                threshold,
                zeros,
                previous
            );
            previous = zeros;
        }
    }

    #[test]
    fn test_no_aq_matches_degenerate_threshold() {
        let dct = sample_dct();
        let qmc = quant_multipliers(&generate_quant_table(60.0));

        let mut plain = [0i16; 64];
        quantize_block_no_aq::<ScalarVec>(&dct, &qmc, &mut plain);

        // Anything that rounds to a nonzero value has magnitude >= 0.5
        let mut adaptive = [0i16; 64];
        quantize_block::<ScalarVec>(&dct, &qmc, 0.0, &mut adaptive);
        assert_eq!(plain, adaptive);
        quantize_block::<ScalarVec>(&dct, &qmc, 0.5, &mut adaptive);
        assert_eq!(zero_count(&plain), zero_count(&adaptive));
    }

    #[test]
    fn test_extreme_values_saturate() {
        let mut dct = [0.0f32; 64];
        dct[1] = 1.0e7;
        dct[2] = -1.0e7;
        dct[0] = 1.0e7;
        let qmc = [1.0f32; 64];
        let mut block = [0i16; 64];
        quantize_block_no_aq::<ScalarVec>(&dct, &qmc, &mut block);
        assert_eq!(block[0], i16::MAX);
        assert_eq!(block[1], i16::MAX);
        assert_eq!(block[2], i16::MIN);
    }

    #[test]
    fn test_full_range_input_fits_i16() {
        // Largest AC for 8-bit input at unit step stays far from the limit
        let pixels: [f32; 64] = core::array::from_fn(|i| if (i / 8 + i % 8) % 2 == 0 { 255.0 } else { 0.0 });
        let mut dct = [0.0f32; 64];
        let mut scratch = [0.0f32; 64];
        crate::dct::transform_from_pixels::<ScalarVec>(&pixels, 8, &mut dct, &mut scratch);
        let qmc = quant_multipliers(&[1u16; 64]);
        let mut block = [0i16; 64];
        quantize_block_no_aq::<ScalarVec>(&dct, &qmc, &mut block);
        let max = block.iter().map(|v| v.unsigned_abs()).max().unwrap_or(0);
        assert!(max > 0 && max < 2048, "max magnitude {}", max);
    }
}
