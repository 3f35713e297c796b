//! SIMD capability detection and the lane abstraction used by the kernels
//!
//! Every numeric kernel in this crate is written once against [`F32Vec`] and
//! monomorphized per target:
//! - Scalar: one lane, plain `f32`
//! - SSE4.1 (x86/x86_64): four lanes
//! - AVX2 + FMA (x86_64): eight lanes
//! - NEON (AArch64): four lanes
//!
//! Summation order is the same on every target but fused multiply-add is only
//! used where the hardware has it, so outputs agree within float rounding
//! rather than bit for bit.

use std::fmt;
use std::str::FromStr;

use jpegli_core::JpegliError;

mod scalar;
pub(crate) use scalar::ScalarVec;

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod x86;
#[cfg(target_arch = "x86_64")]
pub(crate) use x86::Avx2Vec;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub(crate) use x86::Sse41Vec;

#[cfg(target_arch = "aarch64")]
mod neon;
#[cfg(target_arch = "aarch64")]
pub(crate) use neon::NeonVec;

/// SIMD instruction set a kernel is compiled for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimdLevel {
    /// No SIMD support
    Scalar,
    /// SSE4.1 (x86/x86_64)
    Sse41,
    /// AVX2 with FMA (x86_64)
    Avx2,
    /// NEON (AArch64)
    Neon,
}

impl SimdLevel {
    /// All levels this crate knows about, fastest first
    pub const ALL: [SimdLevel; 4] = [
        SimdLevel::Avx2,
        SimdLevel::Neon,
        SimdLevel::Sse41,
        SimdLevel::Scalar,
    ];

    /// Detect best available SIMD level for current CPU
    pub fn detect() -> Self {
        Self::ALL
            .into_iter()
            .find(|level| level.is_supported())
            .unwrap_or(SimdLevel::Scalar)
    }

    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            SimdLevel::Scalar => "Scalar (no SIMD)",
            SimdLevel::Sse41 => "SSE4.1",
            SimdLevel::Avx2 => "AVX2",
            SimdLevel::Neon => "NEON",
        }
    }

    /// Check if this build and the running CPU support this level
    pub fn is_supported(&self) -> bool {
        match self {
            SimdLevel::Scalar => true,
            SimdLevel::Sse41 => {
                #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
                {
                    is_x86_feature_detected!("sse4.1")
                }
                #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
                {
                    false
                }
            }
            SimdLevel::Avx2 => {
                #[cfg(target_arch = "x86_64")]
                {
                    is_x86_feature_detected!("avx2") && is_x86_feature_detected!("fma")
                }
                #[cfg(not(target_arch = "x86_64"))]
                {
                    false
                }
            }
            // NEON is always available on AArch64
            SimdLevel::Neon => cfg!(target_arch = "aarch64"),
        }
    }

    /// Levels usable on the running CPU, fastest first
    pub fn supported() -> Vec<SimdLevel> {
        Self::ALL
            .into_iter()
            .filter(|level| level.is_supported())
            .collect()
    }
}

impl fmt::Display for SimdLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SimdLevel {
    type Err = JpegliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scalar" | "none" => Ok(SimdLevel::Scalar),
            "sse4.1" | "sse41" | "sse4" => Ok(SimdLevel::Sse41),
            "avx2" => Ok(SimdLevel::Avx2),
            "neon" => Ok(SimdLevel::Neon),
            other => Err(JpegliError::UnsupportedTarget(other.to_string())),
        }
    }
}

/// Fixed-width vector of `f32` lanes
///
/// Loads and stores are unaligned and bounds-checked against the slice. The
/// implementations for SIMD targets call `std::arch` intrinsics and must only
/// be used from code running on a CPU with the matching features, which the
/// dispatch layer guarantees.
pub(crate) trait F32Vec: Copy {
    const LEN: usize;

    fn splat(value: f32) -> Self;

    fn load(src: &[f32]) -> Self;

    fn store(self, dst: &mut [f32]);

    fn add(self, other: Self) -> Self;

    fn sub(self, other: Self) -> Self;

    fn mul(self, other: Self) -> Self;

    /// `self * mul + addend`, fused where the target supports it
    fn mul_add(self, mul: Self, addend: Self) -> Self;

    fn abs(self) -> Self;

    /// Round to nearest, ties to even
    fn round(self) -> Self;

    /// Rounded value in lanes with `|self| >= threshold`, zero elsewhere
    fn round_zero_below(self, threshold: Self) -> Self;

    /// Store already-rounded lanes as `i16`, saturating
    fn store_i16(self, dst: &mut [i16]);

    /// Transpose an 8x8 block using this target's widest shuffle strategy
    fn transpose8x8(from: &[f32; 64], to: &mut [f32; 64]) {
        crate::transpose::transpose8x8(from, to);
    }
}
