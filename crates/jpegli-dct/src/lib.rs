//! Forward DCT and quantization for the jpegli encoder
//!
//! This crate turns 8x8 pixel blocks into quantized 16-bit coefficients:
//! - [`dct`]: AAN-factorized DCT-II and the 2D block transform
//! - [`transpose`]: 8x8 transposes for each vector width
//! - [`quantization`]: dead-zone and plain quantizers, JPEG quant tables
//! - [`adaptive_quant`]: per-block dead-zone thresholds from the quant field
//! - [`coefficients`]: the per-iMCU-row driver and its parameters
//! - [`dispatch`]: kernel sets per SIMD level and runtime selection
//!
//! Most callers only need [`compute_dct_coefficients`], which forwards to the
//! kernel set resolved for the running CPU.

pub mod adaptive_quant;
pub mod coefficients;
pub mod dct;
pub mod dispatch;
pub mod quantization;
pub mod simd;
pub mod transpose;

pub use adaptive_quant::{relative_quant_strength, zero_bias_threshold, QuantField};
pub use coefficients::{ComponentParams, DctParams};
pub use dct::{forward_dct_1d, reference_dct8x8};
pub use dispatch::{compute_dct_coefficients, DctKernel, SIMD_OVERRIDE_ENV};
pub use quantization::{
    generate_chroma_quant_table, generate_quant_table, quant_multipliers, recenter_dc,
};
pub use simd::SimdLevel;
pub use transpose::transpose8x8;
