//! False-color rendering of a distance map

use image::{Rgb, RgbImage};

use crate::distance::DistanceMap;

const FUZZY_WIDTH: f32 = 4.8;

/// Maps a distance to a quality class: 2.0 for identical, 1.0 at distance 1,
/// falling towards 0 for large distances
pub fn fuzzy_class(score: f32) -> f32 {
    2.0 / (1.0 + (FUZZY_WIDTH * (score - 1.0)).exp())
}

/// Distance whose [`fuzzy_class`] is `class` (0 < class < 2)
pub fn fuzzy_inverse(class: f32) -> f32 {
    1.0 + (2.0 / class - 1.0).ln() / FUZZY_WIDTH
}

const HEATMAP_RAMP: [[f32; 3]; 12] = [
    [0.0, 0.0, 0.0],
    [0.0, 0.0, 1.0],
    [0.0, 1.0, 1.0],
    [0.0, 1.0, 0.0],
    [1.0, 1.0, 0.0],
    [1.0, 0.0, 0.0],
    [1.0, 0.0, 1.0],
    [0.5, 0.5, 1.0],
    [1.0, 0.5, 0.5],
    [1.0, 1.0, 0.5],
    [1.0, 1.0, 1.0],
    [1.0, 1.0, 1.0],
];

/// Color for `score`: below `good` stays in the dark end, `good..bad` covers
/// the blue-green band, beyond `bad` climbs to white
pub fn score_to_rgb(score: f64, good: f64, bad: f64) -> [f32; 3] {
    let position = if score < good {
        (score / good) * 0.3
    } else if score < bad {
        0.3 + (score - good) / (bad - good) * 0.15
    } else {
        0.45 + (score - bad) / (bad * 12.0) * 0.5
    };

    let last = HEATMAP_RAMP.len() - 1;
    let scaled = (position * last as f64).clamp(0.0, last as f64);
    let index = (scaled.floor() as usize).min(last - 1);
    let mix = (scaled - index as f64) as f32;

    let mut rgb = [0.0f32; 3];
    for (c, out) in rgb.iter_mut().enumerate() {
        let lo = HEATMAP_RAMP[index][c];
        let hi = HEATMAP_RAMP[index + 1][c];
        *out = ((1.0 - mix) * lo + mix * hi).sqrt();
    }
    rgb
}

/// Heat map with the default thresholds around the visibility limit
pub fn heat_map(map: &DistanceMap) -> RgbImage {
    let good = fuzzy_inverse(1.5) as f64;
    let bad = fuzzy_inverse(0.5) as f64;
    heat_map_with(map, good, bad)
}

pub fn heat_map_with(map: &DistanceMap, good: f64, bad: f64) -> RgbImage {
    RgbImage::from_fn(map.width as u32, map.height as u32, |x, y| {
        let score = map.values[y as usize * map.width + x as usize] as f64;
        let rgb = score_to_rgb(score, good, bad);
        Rgb(rgb.map(|v| (v * 255.0).round().clamp(0.0, 255.0) as u8))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuzzy_inverse_roundtrip() {
        for class in [0.25f32, 0.5, 1.0, 1.5, 1.9] {
            assert!((fuzzy_class(fuzzy_inverse(class)) - class).abs() < 1e-4);
        }
        assert!((fuzzy_class(1.0) - 1.0).abs() < 1e-6);
        assert!(fuzzy_inverse(1.5) < 1.0 && fuzzy_inverse(0.5) > 1.0);
    }

    #[test]
    fn test_ramp_endpoints() {
        assert_eq!(score_to_rgb(0.0, 0.8, 1.2), [0.0, 0.0, 0.0]);
        let far = score_to_rgb(1000.0, 0.8, 1.2);
        assert_eq!(far, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_good_threshold_lands_past_green() {
        // 0.3 of the ramp is 3.3 stops: a little past pure green towards yellow
        let rgb = score_to_rgb(0.8, 0.8, 1.2);
        assert!((rgb[0] - 0.3f32.sqrt()).abs() < 1e-3);
        assert!(rgb[1] > 0.99);
        assert_eq!(rgb[2], 0.0);
    }

    #[test]
    fn test_heat_map_dimensions() {
        let map = DistanceMap {
            width: 3,
            height: 2,
            values: vec![0.0, 0.5, 1.0, 1.5, 2.0, 10.0],
        };
        let img = heat_map(&map);
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(0, 0), &Rgb([0, 0, 0]));
        assert_eq!(img.get_pixel(2, 1)[0], 255);
    }
}
