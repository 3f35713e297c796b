//! Perceptual comparison of a reference and a distorted image
//!
//! Used to judge encoder output: [`compare`] loads both images and runs
//! butteraugli on them, reporting the score (the maximum of the per-pixel
//! distance map) and a p-norm of the map. The map can be written as a heat
//! map or as PFM.

pub mod color;
pub mod distance;
pub mod heatmap;
pub mod pfm;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub use color::{ColorspaceHint, LinearImage, DEFAULT_INTENSITY_TARGET};
pub use distance::{compare_images, Comparison, DistanceMap};

/// What to compare and which outputs to write
#[derive(Debug, Clone)]
pub struct CompareOptions {
    pub colorspace: ColorspaceHint,
    pub intensity_target: f32,
    pub pnorm: f64,
    pub distmap: Option<PathBuf>,
    pub raw_distmap: Option<PathBuf>,
    pub pfm_distmap: Option<PathBuf>,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            colorspace: ColorspaceHint::default(),
            intensity_target: DEFAULT_INTENSITY_TARGET,
            pnorm: 3.0,
            distmap: None,
            raw_distmap: None,
            pfm_distmap: None,
        }
    }
}

/// Compare two image files
pub fn compare(reference: &Path, distorted: &Path, options: &CompareOptions) -> Result<Comparison> {
    let a = LinearImage::open(reference, options.colorspace)?;
    let b = LinearImage::open(distorted, options.colorspace)?;
    compare_images(&a, &b, options.intensity_target, options.pnorm)
}

/// Write the auxiliary outputs requested in `options`
pub fn write_outputs(map: &DistanceMap, options: &CompareOptions) -> Result<()> {
    if let Some(path) = &options.distmap {
        heatmap::heat_map(map)
            .save(path)
            .with_context(|| format!("Failed to write heat map to {}", path.display()))?;
        log::info!("Wrote heat map to {}", path.display());
    }
    if let Some(path) = &options.pfm_distmap {
        pfm::write_pfm(map, path)?;
    }
    if let Some(path) = &options.raw_distmap {
        pfm::write_raw_distmap(map, path)?;
    }
    Ok(())
}
