//! Per-pixel redness: distance in the (a, b) plane to a reference red.

use image::Luma;

use crate::color_space::Lab;
use crate::raster::Mask;
use crate::redeye::lab_map::LabMap;

/// Chromaticity distance of every pixel to a reference, with the range.
#[derive(Debug, Clone)]
pub struct ChromaticityMap {
    width: u32,
    height: u32,
    distances: Vec<f64>,
    min: f64,
    max: f64,
}

impl ChromaticityMap {
    pub fn new(lab: &LabMap, reference: Lab) -> Self {
        let distances: Vec<f64> = lab
            .pixels()
            .iter()
            .map(|px| px.chromaticity_distance(&reference))
            .collect();
        let min = distances.iter().copied().fold(f64::INFINITY, f64::min);
        let max = distances.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Self {
            width: lab.width(),
            height: lab.height(),
            distances,
            min,
            max,
        }
    }

    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Redness mask: 255 at the pixel closest to the reference, 0 at the
    /// farthest, `round(255 × (max − d) / (max − min))` between. Uniform
    /// chromaticity gives an all-zero mask.
    pub fn to_mask(&self) -> Mask {
        let mut mask = Mask::new(self.width, self.height);
        let range = self.max - self.min;
        if range.is_nan() || range <= 0.0 {
            return mask;
        }

        for (px, &d) in mask.pixels_mut().zip(&self.distances) {
            let v = (255.0 * (self.max - d) / range).round();
            *px = Luma([v.clamp(0.0, 255.0) as u8]);
        }
        mask
    }
}
