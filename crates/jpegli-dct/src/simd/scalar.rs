use super::F32Vec;

/// Single-lane fallback used when no SIMD target is available
#[derive(Debug, Clone, Copy)]
pub(crate) struct ScalarVec(f32);

impl F32Vec for ScalarVec {
    const LEN: usize = 1;

    #[inline(always)]
    fn splat(value: f32) -> Self {
        Self(value)
    }

    #[inline(always)]
    fn load(src: &[f32]) -> Self {
        Self(src[0])
    }

    #[inline(always)]
    fn store(self, dst: &mut [f32]) {
        dst[0] = self.0;
    }

    #[inline(always)]
    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }

    #[inline(always)]
    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }

    #[inline(always)]
    fn mul(self, other: Self) -> Self {
        Self(self.0 * other.0)
    }

    #[inline(always)]
    fn mul_add(self, mul: Self, addend: Self) -> Self {
        Self(self.0 * mul.0 + addend.0)
    }

    #[inline(always)]
    fn abs(self) -> Self {
        Self(self.0.abs())
    }

    #[inline(always)]
    fn round(self) -> Self {
        Self(self.0.round_ties_even())
    }

    #[inline(always)]
    fn round_zero_below(self, threshold: Self) -> Self {
        if self.0.abs() >= threshold.0 {
            self.round()
        } else {
            Self(0.0)
        }
    }

    #[inline(always)]
    fn store_i16(self, dst: &mut [i16]) {
        // `as` saturates, matching the packing instructions of the SIMD targets
        dst[0] = self.0 as i16;
    }
}
