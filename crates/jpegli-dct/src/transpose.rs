//! 8x8 transpose between the two passes of the separable DCT
//!
//! Three strategies, chosen by the lane width of the kernel: a full-width
//! interleave network on 8-lane targets, 4x4 sub-block interleaves on 4-lane
//! targets and a plain double loop. All of them are exact permutations and
//! produce identical output.

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;
#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

/// Scalar 8x8 transpose: `to[n][m] = from[m][n]`
#[inline]
pub fn transpose8x8(from: &[f32; 64], to: &mut [f32; 64]) {
    for n in 0..8 {
        for m in 0..8 {
            to[8 * n + m] = from[8 * m + n];
        }
    }
}

/// 4x4 sub-block transpose with SSE unpack instructions
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
#[inline(always)]
pub(crate) fn transpose8x8_sse(from: &[f32; 64], to: &mut [f32; 64]) {
    for n in (0..8).step_by(4) {
        for m in (0..8).step_by(4) {
            let load = |row: usize| {
                let src = &from[row * 8 + m..row * 8 + m + 4];
                unsafe { _mm_loadu_ps(src.as_ptr()) }
            };
            unsafe {
                let p0 = load(n);
                let p1 = load(n + 1);
                let p2 = load(n + 2);
                let p3 = load(n + 3);
                let q0 = _mm_unpacklo_ps(p0, p2);
                let q1 = _mm_unpacklo_ps(p1, p3);
                let q2 = _mm_unpackhi_ps(p0, p2);
                let q3 = _mm_unpackhi_ps(p1, p3);

                let rows = [
                    _mm_unpacklo_ps(q0, q1),
                    _mm_unpackhi_ps(q0, q1),
                    _mm_unpacklo_ps(q2, q3),
                    _mm_unpackhi_ps(q2, q3),
                ];
                for (k, r) in rows.into_iter().enumerate() {
                    let start = (m + k) * 8 + n;
                    let dst = &mut to[start..start + 4];
                    _mm_storeu_ps(dst.as_mut_ptr(), r);
                }
            }
        }
    }
}

/// Full-width transpose: in-lane unpacks followed by 128-bit half swaps
#[cfg(target_arch = "x86_64")]
#[inline(always)]
pub(crate) fn transpose8x8_avx(from: &[f32; 64], to: &mut [f32; 64]) {
    unsafe {
        let i: [__m256; 8] = core::array::from_fn(|row| _mm256_loadu_ps(from[row * 8..].as_ptr()));

        let q0 = _mm256_unpacklo_ps(i[0], i[2]);
        let q1 = _mm256_unpacklo_ps(i[1], i[3]);
        let q2 = _mm256_unpackhi_ps(i[0], i[2]);
        let q3 = _mm256_unpackhi_ps(i[1], i[3]);
        let q4 = _mm256_unpacklo_ps(i[4], i[6]);
        let q5 = _mm256_unpacklo_ps(i[5], i[7]);
        let q6 = _mm256_unpackhi_ps(i[4], i[6]);
        let q7 = _mm256_unpackhi_ps(i[5], i[7]);

        let r0 = _mm256_unpacklo_ps(q0, q1);
        let r1 = _mm256_unpackhi_ps(q0, q1);
        let r2 = _mm256_unpacklo_ps(q2, q3);
        let r3 = _mm256_unpackhi_ps(q2, q3);
        let r4 = _mm256_unpacklo_ps(q4, q5);
        let r5 = _mm256_unpackhi_ps(q4, q5);
        let r6 = _mm256_unpacklo_ps(q6, q7);
        let r7 = _mm256_unpackhi_ps(q6, q7);

        // 0x20: low halves of both, 0x31: high halves of both
        let out = [
            _mm256_permute2f128_ps(r0, r4, 0x20),
            _mm256_permute2f128_ps(r1, r5, 0x20),
            _mm256_permute2f128_ps(r2, r6, 0x20),
            _mm256_permute2f128_ps(r3, r7, 0x20),
            _mm256_permute2f128_ps(r0, r4, 0x31),
            _mm256_permute2f128_ps(r1, r5, 0x31),
            _mm256_permute2f128_ps(r2, r6, 0x31),
            _mm256_permute2f128_ps(r3, r7, 0x31),
        ];
        for (row, v) in out.into_iter().enumerate() {
            _mm256_storeu_ps(to[row * 8..row * 8 + 8].as_mut_ptr(), v);
        }
    }
}

/// 4x4 sub-block transpose with NEON zips
#[cfg(target_arch = "aarch64")]
#[inline(always)]
pub(crate) fn transpose8x8_neon(from: &[f32; 64], to: &mut [f32; 64]) {
    for n in (0..8).step_by(4) {
        for m in (0..8).step_by(4) {
            let load = |row: usize| {
                let src = &from[row * 8 + m..row * 8 + m + 4];
                unsafe { vld1q_f32(src.as_ptr()) }
            };
            unsafe {
                let p0 = load(n);
                let p1 = load(n + 1);
                let p2 = load(n + 2);
                let p3 = load(n + 3);
                let q0 = vzip1q_f32(p0, p2);
                let q1 = vzip1q_f32(p1, p3);
                let q2 = vzip2q_f32(p0, p2);
                let q3 = vzip2q_f32(p1, p3);

                let rows = [
                    vzip1q_f32(q0, q1),
                    vzip2q_f32(q0, q1),
                    vzip1q_f32(q2, q3),
                    vzip2q_f32(q2, q3),
                ];
                for (k, r) in rows.into_iter().enumerate() {
                    let start = (m + k) * 8 + n;
                    vst1q_f32(to[start..start + 4].as_mut_ptr(), r);
                }
            }
        }
    }
}
