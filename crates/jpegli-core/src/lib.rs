//! Core types for the jpegli forward transform stage
//!
//! This crate provides the data structures shared by the DCT/quantization
//! kernels and their callers: borrowed pixel planes, component descriptors,
//! coefficient block storage and the error type.

pub mod blocks;
pub mod consts;
pub mod error;
pub mod image;
pub mod types;

pub use blocks::*;
pub use error::{JpegliError, JpegliResult};
pub use image::*;
pub use types::*;
