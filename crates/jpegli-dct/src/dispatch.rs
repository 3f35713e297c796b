//! Runtime selection of the kernel set for the running CPU
//!
//! Each SIMD level gets its own copy of the transform, the quantizers and the
//! driver, monomorphized over its vector type and compiled under the matching
//! `#[target_feature]`. A [`DctKernel`] is the table of function pointers for
//! one level. The best table is resolved once per process and reused for
//! every call after that.
//!
//! Setting `JPEGLI_SIMD` (`scalar`, `sse4.1`, `avx2`, `neon`) selects a level
//! explicitly. Values the CPU cannot run are logged and ignored.

use std::env;
use std::fmt;

use jpegli_core::consts::DCT_BLOCK_SIZE;
use jpegli_core::{BlockStore, CoeffBlock, JpegliError, JpegliResult, QuantMultipliers};
use lazy_static::lazy_static;
use log::{debug, warn};

use crate::coefficients::{compute_dct_coefficients_impl, DctParams};
use crate::dct::transform_from_pixels;
use crate::quantization::{quantize_block, quantize_block_no_aq};
use crate::simd::{F32Vec, SimdLevel};

/// Environment variable naming the SIMD level to use instead of the detected one
pub const SIMD_OVERRIDE_ENV: &str = "JPEGLI_SIMD";

type ComputeFn = fn(&DctParams<'_>, usize, &mut dyn BlockStore);
type TransformFn = fn(&[f32], usize, &mut [f32; DCT_BLOCK_SIZE], &mut [f32; DCT_BLOCK_SIZE]);
type QuantizeFn = fn(&[f32; DCT_BLOCK_SIZE], &QuantMultipliers, f32, &mut CoeffBlock);
type QuantizeNoAqFn = fn(&[f32; DCT_BLOCK_SIZE], &QuantMultipliers, &mut CoeffBlock);
type TransposeFn = fn(&[f32; DCT_BLOCK_SIZE], &mut [f32; DCT_BLOCK_SIZE]);

/// Kernel set compiled for one SIMD level
#[derive(Clone, Copy)]
pub struct DctKernel {
    level: SimdLevel,
    compute: ComputeFn,
    transform: TransformFn,
    quantize: QuantizeFn,
    quantize_no_aq: QuantizeNoAqFn,
    transpose: TransposeFn,
}

// Every function pointer of a level-specific table is a safe wrapper around a
// `#[target_feature]` function. The tables are only handed out by
// `DctKernel::new`, which checks the CPU first.
macro_rules! target_kernel {
    ($(#[$cfg:meta])* $module:ident, $vec:ty, $level:expr, $features:literal) => {
        $(#[$cfg])*
        mod $module {
            use super::*;

            #[target_feature(enable = $features)]
            unsafe fn compute_impl(params: &DctParams<'_>, imcu_row: usize, store: &mut dyn BlockStore) {
                compute_dct_coefficients_impl::<$vec>(params, imcu_row, store)
            }

            #[target_feature(enable = $features)]
            unsafe fn transform_impl(
                pixels: &[f32],
                stride: usize,
                coefficients: &mut [f32; DCT_BLOCK_SIZE],
                scratch: &mut [f32; DCT_BLOCK_SIZE],
            ) {
                transform_from_pixels::<$vec>(pixels, stride, coefficients, scratch)
            }

            #[target_feature(enable = $features)]
            unsafe fn quantize_impl(
                dct: &[f32; DCT_BLOCK_SIZE],
                qmc: &QuantMultipliers,
                threshold: f32,
                block: &mut CoeffBlock,
            ) {
                quantize_block::<$vec>(dct, qmc, threshold, block)
            }

            #[target_feature(enable = $features)]
            unsafe fn quantize_no_aq_impl(dct: &[f32; DCT_BLOCK_SIZE], qmc: &QuantMultipliers, block: &mut CoeffBlock) {
                quantize_block_no_aq::<$vec>(dct, qmc, block)
            }

            #[target_feature(enable = $features)]
            unsafe fn transpose_impl(from: &[f32; DCT_BLOCK_SIZE], to: &mut [f32; DCT_BLOCK_SIZE]) {
                <$vec as F32Vec>::transpose8x8(from, to)
            }

            fn compute(params: &DctParams<'_>, imcu_row: usize, store: &mut dyn BlockStore) {
                // SAFETY: reachable only through a kernel built after feature detection
                unsafe { compute_impl(params, imcu_row, store) }
            }

            fn transform(
                pixels: &[f32],
                stride: usize,
                coefficients: &mut [f32; DCT_BLOCK_SIZE],
                scratch: &mut [f32; DCT_BLOCK_SIZE],
            ) {
                // SAFETY: as above
                unsafe { transform_impl(pixels, stride, coefficients, scratch) }
            }

            fn quantize(dct: &[f32; DCT_BLOCK_SIZE], qmc: &QuantMultipliers, threshold: f32, block: &mut CoeffBlock) {
                // SAFETY: as above
                unsafe { quantize_impl(dct, qmc, threshold, block) }
            }

            fn quantize_no_aq(dct: &[f32; DCT_BLOCK_SIZE], qmc: &QuantMultipliers, block: &mut CoeffBlock) {
                // SAFETY: as above
                unsafe { quantize_no_aq_impl(dct, qmc, block) }
            }

            fn transpose(from: &[f32; DCT_BLOCK_SIZE], to: &mut [f32; DCT_BLOCK_SIZE]) {
                // SAFETY: as above
                unsafe { transpose_impl(from, to) }
            }

            pub(super) const KERNEL: DctKernel = DctKernel {
                level: $level,
                compute,
                transform,
                quantize,
                quantize_no_aq,
                transpose,
            };
        }
    };
}

mod scalar {
    use super::*;
    use crate::simd::ScalarVec;

    pub(super) const KERNEL: DctKernel = DctKernel {
        level: SimdLevel::Scalar,
        compute: compute_dct_coefficients_impl::<ScalarVec>,
        transform: transform_from_pixels::<ScalarVec>,
        quantize: quantize_block::<ScalarVec>,
        quantize_no_aq: quantize_block_no_aq::<ScalarVec>,
        transpose: <ScalarVec as F32Vec>::transpose8x8,
    };
}

target_kernel!(
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    sse41,
    crate::simd::Sse41Vec,
    SimdLevel::Sse41,
    "sse4.1"
);

target_kernel!(
    #[cfg(target_arch = "x86_64")]
    avx2,
    crate::simd::Avx2Vec,
    SimdLevel::Avx2,
    "avx2,fma"
);

target_kernel!(
    #[cfg(target_arch = "aarch64")]
    neon,
    crate::simd::NeonVec,
    SimdLevel::Neon,
    "neon"
);

lazy_static! {
    static ref BEST_KERNEL: DctKernel = resolve_best();
}

fn resolve_best() -> DctKernel {
    let detected = SimdLevel::detect();
    let level = match env::var(SIMD_OVERRIDE_ENV) {
        Ok(value) => match value.parse::<SimdLevel>() {
            Ok(requested) if requested.is_supported() => {
                debug!("{}={} overrides detected {}", SIMD_OVERRIDE_ENV, requested, detected);
                requested
            }
            Ok(requested) => {
                warn!(
                    "{}={} is not supported on this CPU, using {}",
                    SIMD_OVERRIDE_ENV, requested, detected
                );
                detected
            }
            Err(e) => {
                warn!("Ignoring {}: {}", SIMD_OVERRIDE_ENV, e);
                detected
            }
        },
        Err(_) => detected,
    };

    debug!("DCT kernels resolved to {}", level);
    // Only supported levels reach this point
    DctKernel::new(level).unwrap_or(scalar::KERNEL)
}

impl DctKernel {
    /// Kernel set for the fastest level this CPU supports
    ///
    /// Detection runs on first use; later calls return the cached table.
    pub fn best() -> &'static DctKernel {
        &BEST_KERNEL
    }

    /// Kernel set for an explicit level
    pub fn new(level: SimdLevel) -> JpegliResult<DctKernel> {
        if !level.is_supported() {
            return Err(JpegliError::UnsupportedTarget(level.name().to_string()));
        }
        match level {
            SimdLevel::Scalar => Ok(scalar::KERNEL),
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            SimdLevel::Sse41 => Ok(sse41::KERNEL),
            #[cfg(target_arch = "x86_64")]
            SimdLevel::Avx2 => Ok(avx2::KERNEL),
            #[cfg(target_arch = "aarch64")]
            SimdLevel::Neon => Ok(neon::KERNEL),
            #[allow(unreachable_patterns)]
            other => Err(JpegliError::UnsupportedTarget(other.name().to_string())),
        }
    }

    /// Kernel sets for every level usable on this CPU, fastest first
    pub fn supported() -> Vec<DctKernel> {
        SimdLevel::supported()
            .into_iter()
            .filter_map(|level| DctKernel::new(level).ok())
            .collect()
    }

    pub fn level(&self) -> SimdLevel {
        self.level
    }

    /// Transform and quantize all blocks of iMCU row `imcu_row` into `store`
    pub fn compute_dct_coefficients(&self, params: &DctParams<'_>, imcu_row: usize, store: &mut dyn BlockStore) {
        (self.compute)(params, imcu_row, store)
    }

    /// Scaled DCT of the 8x8 window starting at `pixels[0]`, natural order
    ///
    /// Panics if `pixels` is shorter than `7 * stride + 8`.
    pub fn transform_block(&self, pixels: &[f32], stride: usize) -> [f32; DCT_BLOCK_SIZE] {
        let mut coefficients = [0.0f32; DCT_BLOCK_SIZE];
        let mut scratch = [0.0f32; DCT_BLOCK_SIZE];
        (self.transform)(pixels, stride, &mut coefficients, &mut scratch);
        coefficients
    }

    /// Dead-zone quantization of one transformed block
    pub fn quantize_block(&self, dct: &[f32; DCT_BLOCK_SIZE], qmc: &QuantMultipliers, threshold: f32) -> CoeffBlock {
        let mut block = [0i16; DCT_BLOCK_SIZE];
        (self.quantize)(dct, qmc, threshold, &mut block);
        block
    }

    /// Quantization of one transformed block without a dead zone
    pub fn quantize_block_no_aq(&self, dct: &[f32; DCT_BLOCK_SIZE], qmc: &QuantMultipliers) -> CoeffBlock {
        let mut block = [0i16; DCT_BLOCK_SIZE];
        (self.quantize_no_aq)(dct, qmc, &mut block);
        block
    }

    pub fn transpose8x8(&self, from: &[f32; DCT_BLOCK_SIZE], to: &mut [f32; DCT_BLOCK_SIZE]) {
        (self.transpose)(from, to)
    }
}

impl fmt::Debug for DctKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DctKernel").field("level", &self.level).finish()
    }
}

/// Transform and quantize iMCU row `imcu_row` with the best kernel set
pub fn compute_dct_coefficients(params: &DctParams<'_>, imcu_row: usize, store: &mut dyn BlockStore) {
    DctKernel::best().compute_dct_coefficients(params, imcu_row, store)
}
