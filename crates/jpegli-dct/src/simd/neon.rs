use std::arch::aarch64::*;

use super::F32Vec;

/// Four `f32` lanes in a NEON register
#[derive(Clone, Copy)]
pub(crate) struct NeonVec(float32x4_t);

impl F32Vec for NeonVec {
    const LEN: usize = 4;

    #[inline(always)]
    fn splat(value: f32) -> Self {
        Self(unsafe { vdupq_n_f32(value) })
    }

    #[inline(always)]
    fn load(src: &[f32]) -> Self {
        let src = &src[..4];
        Self(unsafe { vld1q_f32(src.as_ptr()) })
    }

    #[inline(always)]
    fn store(self, dst: &mut [f32]) {
        let dst = &mut dst[..4];
        unsafe { vst1q_f32(dst.as_mut_ptr(), self.0) }
    }

    #[inline(always)]
    fn add(self, other: Self) -> Self {
        Self(unsafe { vaddq_f32(self.0, other.0) })
    }

    #[inline(always)]
    fn sub(self, other: Self) -> Self {
        Self(unsafe { vsubq_f32(self.0, other.0) })
    }

    #[inline(always)]
    fn mul(self, other: Self) -> Self {
        Self(unsafe { vmulq_f32(self.0, other.0) })
    }

    #[inline(always)]
    fn mul_add(self, mul: Self, addend: Self) -> Self {
        Self(unsafe { vfmaq_f32(addend.0, self.0, mul.0) })
    }

    #[inline(always)]
    fn abs(self) -> Self {
        Self(unsafe { vabsq_f32(self.0) })
    }

    #[inline(always)]
    fn round(self) -> Self {
        Self(unsafe { vrndnq_f32(self.0) })
    }

    #[inline(always)]
    fn round_zero_below(self, threshold: Self) -> Self {
        Self(unsafe {
            let keep = vcgeq_f32(vabsq_f32(self.0), threshold.0);
            let rounded = vreinterpretq_u32_f32(vrndnq_f32(self.0));
            vreinterpretq_f32_u32(vandq_u32(keep, rounded))
        })
    }

    #[inline(always)]
    fn store_i16(self, dst: &mut [i16]) {
        let dst = &mut dst[..4];
        unsafe {
            let ints = vcvtq_s32_f32(self.0);
            vst1_s16(dst.as_mut_ptr(), vqmovn_s32(ints));
        }
    }

    #[inline(always)]
    fn transpose8x8(from: &[f32; 64], to: &mut [f32; 64]) {
        crate::transpose::transpose8x8_neon(from, to);
    }
}
