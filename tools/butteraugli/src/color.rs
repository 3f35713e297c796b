//! Loading images into linear RGB

use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use butteraugli::{Img, ImgRef, RGB};

/// Intensity in nits that maps to a linear value of 1.0
pub const DEFAULT_INTENSITY_TARGET: f32 = 80.0;

/// sRGB gamma expansion
pub fn srgb_to_linear(srgb: f32) -> f32 {
    if srgb <= 0.04045 {
        srgb / 12.92
    } else {
        ((srgb + 0.055) / 1.055).powf(2.4)
    }
}

/// Transfer function named by a colorspace hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transfer {
    #[default]
    Srgb,
    Linear,
}

/// Parsed `--colorspace` hint, e.g. `RGB_D65_SRG_Rel_Lin`
///
/// Only the color model (first field) and the transfer function (last
/// field) matter here. Inputs without a hint are treated as sRGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorspaceHint {
    pub transfer: Transfer,
}

impl FromStr for ColorspaceHint {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Ok(Self::default());
        }
        let fields: Vec<&str> = s.split('_').collect();
        match fields[0] {
            "RGB" | "Gra" => {}
            other => bail!("Unsupported color model \"{}\" in colorspace hint", other),
        }
        let transfer = match fields.last().copied().unwrap_or_default() {
            "Lin" => Transfer::Linear,
            "SRG" => Transfer::Srgb,
            other => bail!("Unsupported transfer function \"{}\" in colorspace hint", other),
        };
        Ok(Self { transfer })
    }
}

/// Linear RGB image, 1.0 is the display's white at the intensity target
#[derive(Debug, Clone)]
pub struct LinearImage {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<RGB<f32>>,
}

impl LinearImage {
    /// Convert interleaved normalized RGB samples (0-1) to linear light
    pub fn from_rgb(width: usize, height: usize, samples: &[f32], hint: ColorspaceHint) -> Self {
        let decode = |v: f32| match hint.transfer {
            Transfer::Srgb => srgb_to_linear(v),
            Transfer::Linear => v,
        };
        let pixels = samples
            .chunks_exact(3)
            .map(|rgb| RGB::new(decode(rgb[0]), decode(rgb[1]), decode(rgb[2])))
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Decode an image file; alpha is dropped
    pub fn open(path: &Path, hint: ColorspaceHint) -> Result<Self> {
        let decoded = image::open(path)
            .with_context(|| format!("Failed to read image from {}", path.display()))?;
        let rgb = decoded.to_rgb32f();
        let (width, height) = (rgb.width() as usize, rgb.height() as usize);
        log::debug!("Loaded {} ({}x{})", path.display(), width, height);
        Ok(Self::from_rgb(width, height, rgb.as_raw(), hint))
    }

    pub fn as_img(&self) -> ImgRef<'_, RGB<f32>> {
        Img::new(self.pixels.as_slice(), self.width, self.height)
    }
}
