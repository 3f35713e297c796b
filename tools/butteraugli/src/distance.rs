//! Butteraugli distance between two linear images
//!
//! The perceptual model comes from the `butteraugli` crate. This module
//! checks the inputs, runs the comparison with a diffmap and keeps the
//! per-pixel map around for the heat map and PFM writers.

use anyhow::{anyhow, bail, Result};
use butteraugli::{butteraugli_linear, ButteraugliParams, ImgVec};

use crate::color::LinearImage;

/// Distance map with one value per pixel, row-major
#[derive(Debug, Clone)]
pub struct DistanceMap {
    pub width: usize,
    pub height: usize,
    pub values: Vec<f32>,
}

impl DistanceMap {
    pub fn from_diffmap(diffmap: &ImgVec<f32>) -> Self {
        Self {
            width: diffmap.width(),
            height: diffmap.height(),
            values: diffmap.as_ref().rows().flat_map(|row| row.iter().copied()).collect(),
        }
    }

    /// Largest per-pixel distance
    pub fn max(&self) -> f32 {
        self.values.iter().copied().fold(0.0, f32::max)
    }

    pub fn row(&self, y: usize) -> &[f32] {
        &self.values[y * self.width..(y + 1) * self.width]
    }
}

/// Summary of one comparison
#[derive(Debug, Clone)]
pub struct Comparison {
    /// Butteraugli score, the maximum of the distance map
    pub distance: f64,
    /// Average of the `p`, `2p` and `4p` norms of the distance map
    pub pnorm: f64,
    pub map: DistanceMap,
}

/// Compare `reference` against `distorted` viewed at `intensity_target` nits
///
/// Fails when the images differ in size or are smaller than 8x8.
pub fn compare_images(
    reference: &LinearImage,
    distorted: &LinearImage,
    intensity_target: f32,
    p: f64,
) -> Result<Comparison> {
    if reference.width != distorted.width {
        bail!("Width mismatch: {} {}", reference.width, distorted.width);
    }
    if reference.height != distorted.height {
        bail!("Height mismatch: {} {}", reference.height, distorted.height);
    }

    let params = ButteraugliParams::new()
        .with_intensity_target(intensity_target)
        .with_compute_diffmap(true);
    let result = butteraugli_linear(reference.as_img(), distorted.as_img(), &params)?;

    let pnorm = result
        .pnorm(p)
        .ok_or_else(|| anyhow!("butteraugli returned no distance map"))?;
    let map = result
        .diffmap
        .as_ref()
        .map(DistanceMap::from_diffmap)
        .ok_or_else(|| anyhow!("butteraugli returned no distance map"))?;
    log::debug!(
        "butteraugli {}x{}: score {:.6}, {}-norm {:.6}",
        map.width,
        map.height,
        result.score,
        p,
        pnorm
    );

    Ok(Comparison {
        distance: result.score,
        pnorm,
        map,
    })
}
