//! x86 vector types
//!
//! Both types wrap raw `std::arch` registers. Constructing or operating on
//! them on a CPU without the named features is undefined behavior; only the
//! `#[target_feature]` entry points in `dispatch` instantiate kernels with
//! them, and those are bound after runtime detection.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use super::F32Vec;

/// Four `f32` lanes in an SSE register (requires SSE4.1 for rounding)
#[derive(Clone, Copy)]
pub(crate) struct Sse41Vec(__m128);

impl F32Vec for Sse41Vec {
    const LEN: usize = 4;

    #[inline(always)]
    fn splat(value: f32) -> Self {
        Self(unsafe { _mm_set1_ps(value) })
    }

    #[inline(always)]
    fn load(src: &[f32]) -> Self {
        let src = &src[..4];
        Self(unsafe { _mm_loadu_ps(src.as_ptr()) })
    }

    #[inline(always)]
    fn store(self, dst: &mut [f32]) {
        let dst = &mut dst[..4];
        unsafe { _mm_storeu_ps(dst.as_mut_ptr(), self.0) }
    }

    #[inline(always)]
    fn add(self, other: Self) -> Self {
        Self(unsafe { _mm_add_ps(self.0, other.0) })
    }

    #[inline(always)]
    fn sub(self, other: Self) -> Self {
        Self(unsafe { _mm_sub_ps(self.0, other.0) })
    }

    #[inline(always)]
    fn mul(self, other: Self) -> Self {
        Self(unsafe { _mm_mul_ps(self.0, other.0) })
    }

    #[inline(always)]
    fn mul_add(self, mul: Self, addend: Self) -> Self {
        // No FMA on this target
        self.mul(mul).add(addend)
    }

    #[inline(always)]
    fn abs(self) -> Self {
        Self(unsafe { _mm_andnot_ps(_mm_set1_ps(-0.0), self.0) })
    }

    #[inline(always)]
    fn round(self) -> Self {
        Self(unsafe { _mm_round_ps(self.0, _MM_FROUND_TO_NEAREST_INT | _MM_FROUND_NO_EXC) })
    }

    #[inline(always)]
    fn round_zero_below(self, threshold: Self) -> Self {
        let rounded = self.round();
        Self(unsafe {
            let keep = _mm_cmpge_ps(self.abs().0, threshold.0);
            _mm_and_ps(keep, rounded.0)
        })
    }

    #[inline(always)]
    fn store_i16(self, dst: &mut [i16]) {
        let dst = &mut dst[..4];
        unsafe {
            // cvtps returns i32::MIN on overflow, so clamp into range first
            let clamped = _mm_min_ps(_mm_max_ps(self.0, _mm_set1_ps(-32768.0)), _mm_set1_ps(32767.0));
            let ints = _mm_cvtps_epi32(clamped);
            let packed = _mm_packs_epi32(ints, ints);
            _mm_storel_epi64(dst.as_mut_ptr() as *mut __m128i, packed);
        }
    }

    #[inline(always)]
    fn transpose8x8(from: &[f32; 64], to: &mut [f32; 64]) {
        crate::transpose::transpose8x8_sse(from, to);
    }
}

/// Eight `f32` lanes in an AVX register (requires AVX2 and FMA)
#[cfg(target_arch = "x86_64")]
#[derive(Clone, Copy)]
pub(crate) struct Avx2Vec(__m256);

#[cfg(target_arch = "x86_64")]
impl F32Vec for Avx2Vec {
    const LEN: usize = 8;

    #[inline(always)]
    fn splat(value: f32) -> Self {
        Self(unsafe { _mm256_set1_ps(value) })
    }

    #[inline(always)]
    fn load(src: &[f32]) -> Self {
        let src = &src[..8];
        Self(unsafe { _mm256_loadu_ps(src.as_ptr()) })
    }

    #[inline(always)]
    fn store(self, dst: &mut [f32]) {
        let dst = &mut dst[..8];
        unsafe { _mm256_storeu_ps(dst.as_mut_ptr(), self.0) }
    }

    #[inline(always)]
    fn add(self, other: Self) -> Self {
        Self(unsafe { _mm256_add_ps(self.0, other.0) })
    }

    #[inline(always)]
    fn sub(self, other: Self) -> Self {
        Self(unsafe { _mm256_sub_ps(self.0, other.0) })
    }

    #[inline(always)]
    fn mul(self, other: Self) -> Self {
        Self(unsafe { _mm256_mul_ps(self.0, other.0) })
    }

    #[inline(always)]
    fn mul_add(self, mul: Self, addend: Self) -> Self {
        Self(unsafe { _mm256_fmadd_ps(self.0, mul.0, addend.0) })
    }

    #[inline(always)]
    fn abs(self) -> Self {
        Self(unsafe { _mm256_andnot_ps(_mm256_set1_ps(-0.0), self.0) })
    }

    #[inline(always)]
    fn round(self) -> Self {
        Self(unsafe { _mm256_round_ps(self.0, _MM_FROUND_TO_NEAREST_INT | _MM_FROUND_NO_EXC) })
    }

    #[inline(always)]
    fn round_zero_below(self, threshold: Self) -> Self {
        let rounded = self.round();
        Self(unsafe {
            let keep = _mm256_cmp_ps(self.abs().0, threshold.0, _CMP_GE_OQ);
            _mm256_and_ps(keep, rounded.0)
        })
    }

    #[inline(always)]
    fn store_i16(self, dst: &mut [i16]) {
        let dst = &mut dst[..8];
        unsafe {
            let clamped = _mm256_min_ps(
                _mm256_max_ps(self.0, _mm256_set1_ps(-32768.0)),
                _mm256_set1_ps(32767.0),
            );
            let ints = _mm256_cvtps_epi32(clamped);
            let lo = _mm256_castsi256_si128(ints);
            let hi = _mm256_extracti128_si256(ints, 1);
            let packed = _mm_packs_epi32(lo, hi);
            _mm_storeu_si128(dst.as_mut_ptr() as *mut __m128i, packed);
        }
    }

    #[inline(always)]
    fn transpose8x8(from: &[f32; 64], to: &mut [f32; 64]) {
        crate::transpose::transpose8x8_avx(from, to);
    }
}
