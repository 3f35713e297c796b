//! Forward DCT-II using the Arai-Agui-Nakajima radix-2 factorization
//!
//! A size-N transform splits its input into a sum half and a difference half
//! (pairing element `i` with `N - 1 - i`), transforms both halves at size N/2
//! and interleaves them: the sum half yields the even frequencies, the
//! difference half, pre-scaled by `1 / (2 cos((i + 0.5) π / N))` and folded
//! after its transform, yields the odd frequencies.
//!
//! The recursion is unrolled at compile time: each size is a separate
//! function generated by `define_dct1d!` that calls the next smaller one.
//!
//! Unnormalized, the 1D output is `y_0 = Σ x` and
//! `y_k = √2 Σ x cos((2x + 1) k π / 2N)`. Each 8-point pass over a block is
//! scaled by 1/8, so the 2D result is the orthonormal (JPEG) DCT divided by 8.
//! The quantizer's multiplier tables absorb that factor.

use std::f32::consts::SQRT_2;
use std::f64::consts::PI;

use jpegli_core::consts::{BLOCK_DIM, DCT_BLOCK_SIZE};

use crate::simd::{F32Vec, ScalarVec};

// 1 / (2 * cos((i + 0.5) * pi / N)) for i in 0..N/2
const WC_MULTIPLIERS_4: [f32; 2] = [0.541_196_1, 1.306_563];
const WC_MULTIPLIERS_8: [f32; 4] = [0.509_795_6, 0.601_344_9, 0.899_976_2, 2.562_915_4];
const WC_MULTIPLIERS_16: [f32; 8] = [
    0.502_419_3,
    0.522_498_6,
    0.566_944_03,
    0.646_821_8,
    0.788_154_6,
    1.060_677_7,
    1.722_447_1,
    5.101_148_6,
];

#[inline(always)]
fn dct1d_2<V: F32Vec>(mem: &mut [V; 2]) {
    let (a, b) = (mem[0], mem[1]);
    mem[0] = a.add(b);
    mem[1] = a.sub(b);
}

/// Fold the transformed difference half into odd-frequency outputs
#[inline(always)]
fn fold_odd<V: F32Vec>(coeff: &mut [V]) {
    coeff[0] = coeff[0].mul_add(V::splat(SQRT_2), coeff[1]);
    for i in 1..coeff.len() - 1 {
        coeff[i] = coeff[i].add(coeff[i + 1]);
    }
}

macro_rules! define_dct1d {
    ($name:ident, $n:literal, $half:literal, $half_dct:ident, $multipliers:ident) => {
        #[inline(always)]
        pub(crate) fn $name<V: F32Vec>(mem: &mut [V; $n]) {
            let mut even = [V::splat(0.0); $half];
            let mut odd = [V::splat(0.0); $half];
            for i in 0..$half {
                even[i] = mem[i].add(mem[$n - 1 - i]);
                odd[i] = mem[i]
                    .sub(mem[$n - 1 - i])
                    .mul(V::splat($multipliers[i]));
            }
            $half_dct(&mut even);
            $half_dct(&mut odd);
            fold_odd(&mut odd);
            for i in 0..$half {
                mem[2 * i] = even[i];
                mem[2 * i + 1] = odd[i];
            }
        }
    };
}

define_dct1d!(dct1d_4, 4, 2, dct1d_2, WC_MULTIPLIERS_4);
define_dct1d!(dct1d_8, 8, 4, dct1d_4, WC_MULTIPLIERS_8);
define_dct1d!(dct1d_16, 16, 8, dct1d_8, WC_MULTIPLIERS_16);

/// Unnormalized in-place 1D DCT-II of a power-of-two length (1 to 16)
///
/// Panics on any other length.
pub fn forward_dct_1d(values: &mut [f32]) {
    fn run<const N: usize>(values: &mut [f32], dct: fn(&mut [ScalarVec; N])) {
        let mut mem: [ScalarVec; N] = core::array::from_fn(|i| ScalarVec::splat(values[i]));
        dct(&mut mem);
        for (v, m) in values.iter_mut().zip(mem) {
            m.store(core::slice::from_mut(v));
        }
    }

    match values.len() {
        1 => {}
        2 => run::<2>(values, dct1d_2),
        4 => run::<4>(values, dct1d_4),
        8 => run::<8>(values, dct1d_8),
        16 => run::<16>(values, dct1d_16),
        n => panic!("unsupported DCT size {}", n),
    }
}

/// 8-point DCT down the columns of an 8x8 window, lane-parallel across columns
///
/// Row `k` of `output` holds frequency `k` of every column, scaled by 1/8.
#[inline(always)]
fn dct1d_columns<V: F32Vec>(pixels: &[f32], stride: usize, output: &mut [f32; DCT_BLOCK_SIZE]) {
    let scale = V::splat(1.0 / BLOCK_DIM as f32);
    let mut lane = 0;
    while lane < BLOCK_DIM {
        let mut mem: [V; BLOCK_DIM] = core::array::from_fn(|i| V::load(&pixels[i * stride + lane..]));
        dct1d_8(&mut mem);
        for (i, m) in mem.into_iter().enumerate() {
            m.mul(scale).store(&mut output[i * BLOCK_DIM + lane..]);
        }
        lane += V::LEN;
    }
}

/// 2D forward DCT of the 8x8 window starting at `pixels[0]`
///
/// `coefficients` receives the result in natural order (`v * 8 + u`, `v`
/// vertical frequency); `scratch` is clobbered.
#[inline(always)]
pub(crate) fn transform_from_pixels<V: F32Vec>(
    pixels: &[f32],
    stride: usize,
    coefficients: &mut [f32; DCT_BLOCK_SIZE],
    scratch: &mut [f32; DCT_BLOCK_SIZE],
) {
    dct1d_columns::<V>(pixels, stride, scratch);
    V::transpose8x8(scratch, coefficients);
    dct1d_columns::<V>(coefficients, BLOCK_DIM, scratch);
    V::transpose8x8(scratch, coefficients);
}

/// Direct O(N^4) JPEG forward DCT, used as a numerical reference
///
/// Output is the orthonormal DCT-II (JPEG `F(u, v)`) in natural order, which
/// is 8x the output of the fast transform.
pub fn reference_dct8x8(input: &[f32; DCT_BLOCK_SIZE], output: &mut [f32; DCT_BLOCK_SIZE]) {
    const N: usize = BLOCK_DIM;

    for v in 0..N {
        for u in 0..N {
            let cu = if u == 0 { 1.0 / 2.0f64.sqrt() } else { 1.0 };
            let cv = if v == 0 { 1.0 / 2.0f64.sqrt() } else { 1.0 };
            let mut sum = 0.0f64;
            for y in 0..N {
                for x in 0..N {
                    sum += input[y * N + x] as f64
                        * (((2 * x + 1) * u) as f64 * PI / (2 * N) as f64).cos()
                        * (((2 * y + 1) * v) as f64 * PI / (2 * N) as f64).cos();
                }
            }
            output[v * N + u] = (sum * cu * cv * 2.0 / N as f64) as f32;
        }
    }
}
