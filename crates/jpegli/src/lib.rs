//! # jpegli forward transform stage
//!
//! Converts component pixel planes into quantized DCT coefficient blocks,
//! ready for entropy coding.
//!
//! ## Quick Start
//!
//! ```
//! use jpegli::{
//!     compute_all_coefficients, generate_quant_table, quant_multipliers, CoefficientBuffers,
//!     ComponentInfo, ComponentParams, DctParams, ImagePlane,
//! };
//!
//! let samples = vec![128.0f32; 24 * 16];
//! let plane = ImagePlane::from_samples(&samples, 24, 16).unwrap();
//! let info = ComponentInfo::full_resolution(24, 16).unwrap();
//! let qmc = quant_multipliers(&generate_quant_table(90.0));
//!
//! let params = DctParams::new(vec![
//!     ComponentParams::new(info, plane.as_plane_ref(), &qmc, 0.0).unwrap(),
//! ])
//! .unwrap();
//!
//! let mut store = CoefficientBuffers::new(&[info]);
//! compute_all_coefficients(&params, &mut store);
//! assert!(store.plane(0).blocks().iter().all(|b| b.iter().all(|&c| c == 0)));
//! ```
//!
//! ## Architecture
//!
//! - `jpegli-core`: planes, component geometry, block storage, errors
//! - `jpegli-dct`: transform, quantizers, driver and SIMD dispatch
//! - this crate: re-exports and whole-image helpers
//!
//! Adaptive quantization is enabled by attaching a quant field with
//! [`DctParams::with_quant_field`]; without one, blocks are quantized by
//! plain rounding.

pub mod pipeline;

pub use jpegli_core::{
    BlockRowsMut, BlockStore, CoeffBlock, CoefficientBuffers, CoefficientPlane, ComponentInfo,
    ImagePlane, JpegliError, JpegliResult, PlaneRef, QuantMultipliers, QuantTable,
};

pub use jpegli_dct::{
    compute_dct_coefficients, generate_chroma_quant_table, generate_quant_table,
    quant_multipliers, reference_dct8x8, zero_bias_threshold, ComponentParams, DctKernel,
    DctParams, QuantField, SimdLevel,
};

pub use pipeline::{
    compute_all_coefficients, compute_all_coefficients_parallel, compute_all_coefficients_with,
    imcu_rows,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
