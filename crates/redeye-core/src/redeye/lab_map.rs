//! A raster converted to CIELab, with its lightness range and alpha plane.

use image::Rgba;

use crate::color_space::{Lab, lab_to_rgb8, rgb8_to_lab};
use crate::error::{RedEyeError, Result, invalid};
use crate::raster::{Mask, Raster, ensure_same_size};

/// Lightness ranges narrower than this are treated as flat.
const FLAT_LIGHTNESS: f64 = 1e-9;

/// Per-pixel CIELab values of a raster, row-major.
#[derive(Debug, Clone)]
pub struct LabMap {
    width: u32,
    height: u32,
    pixels: Vec<Lab>,
    alpha: Vec<u8>,
    min_l: f64,
    max_l: f64,
}

impl LabMap {
    /// Convert every pixel of `source`, tracking the global min and max L.
    pub fn from_raster(source: &Raster) -> Result<Self> {
        let (width, height) = source.dimensions();
        if width == 0 || height == 0 {
            return Err(invalid(format!("cannot process a {width}x{height} image")));
        }

        let len = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(len);
        let mut alpha = Vec::with_capacity(len);
        let mut min_l = f64::INFINITY;
        let mut max_l = f64::NEG_INFINITY;
        for px in source.pixels() {
            let [r, g, b, a] = px.0;
            let lab = rgb8_to_lab([r, g, b]);
            min_l = min_l.min(lab.l);
            max_l = max_l.max(lab.l);
            pixels.push(lab);
            alpha.push(a);
        }

        Ok(Self {
            width,
            height,
            pixels,
            alpha,
            min_l,
            max_l,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Lab] {
        &self.pixels
    }

    pub fn min_l(&self) -> f64 {
        self.min_l
    }

    pub fn max_l(&self) -> f64 {
        self.max_l
    }

    /// Pull masked pixels toward a neutral gray.
    ///
    /// The target has `a = b = 0` and the lightness stretched to
    /// `max_l / (max_l − min_l) × (L − min_l)`, so the darkest pixel of the
    /// image maps to black. Each of L, a and b is blended as
    /// `target × m + original × (1 − m)` with `m = alpha / 255`. A flat
    /// lightness range keeps the original L as the target.
    pub fn recolor(&mut self, alpha_mask: &Mask) -> Result<()> {
        ensure_same_size(
            (self.width, self.height),
            alpha_mask.dimensions(),
            "alpha mask",
        )?;

        let range = self.max_l - self.min_l;
        let (min_l, scale) = (self.min_l, self.max_l / range);
        for (lab, m) in self.pixels.iter_mut().zip(alpha_mask.as_raw()) {
            let m = *m as f64 / 255.0;
            if m == 0.0 {
                continue;
            }
            let target_l = if range > FLAT_LIGHTNESS {
                scale * (lab.l - min_l)
            } else {
                lab.l
            };
            lab.l = target_l * m + lab.l * (1.0 - m);
            lab.a *= 1.0 - m;
            lab.b *= 1.0 - m;
        }
        Ok(())
    }

    /// Convert back to an RGBA raster carrying the source alpha.
    pub fn to_raster(&self) -> Result<Raster> {
        let mut raw = Vec::with_capacity(self.pixels.len() * 4);
        for (lab, &a) in self.pixels.iter().zip(&self.alpha) {
            let [r, g, b] = lab_to_rgb8(*lab);
            raw.extend_from_slice(&Rgba([r, g, b, a]).0);
        }
        Raster::from_raw(self.width, self.height, raw).ok_or_else(|| {
            RedEyeError::InternalFailure("Lab map does not match raster size".into())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    const EPSILON: f64 = 1e-9;

    fn two_tone() -> Raster {
        Raster::from_fn(4, 2, |x, _| {
            if x < 2 {
                Rgba([20, 20, 20, 255])
            } else {
                Rgba([200, 60, 60, 90])
            }
        })
    }

    #[test]
    fn test_tracks_lightness_range() {
        let map = LabMap::from_raster(&two_tone()).unwrap();
        let dark = rgb8_to_lab([20, 20, 20]).l;
        let red = rgb8_to_lab([200, 60, 60]).l;
        assert!((map.min_l() - dark).abs() < EPSILON);
        assert!((map.max_l() - red).abs() < EPSILON);
    }

    #[test]
    fn test_zero_size_is_rejected() {
        assert!(matches!(
            LabMap::from_raster(&Raster::new(0, 5)),
            Err(RedEyeError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_unmasked_round_trip_keeps_pixels() {
        let src = two_tone();
        let mut map = LabMap::from_raster(&src).unwrap();
        map.recolor(&Mask::new(4, 2)).unwrap();
        let out = map.to_raster().unwrap();
        for (a, b) in out.pixels().zip(src.pixels()) {
            for c in 0..3 {
                assert!(a.0[c].abs_diff(b.0[c]) <= 1);
            }
            assert_eq!(a.0[3], b.0[3]);
        }
    }

    #[test]
    fn test_full_mask_neutralizes_and_stretches() {
        let mut map = LabMap::from_raster(&two_tone()).unwrap();
        let max_l = map.max_l();
        map.recolor(&Mask::from_pixel(4, 2, Luma([255]))).unwrap();
        for lab in map.pixels() {
            assert!(lab.a.abs() < EPSILON && lab.b.abs() < EPSILON);
            assert!(lab.l >= -EPSILON && lab.l <= max_l + EPSILON);
        }
        // the darkest pixel maps to black, the lightest keeps its L
        assert!(map.pixels()[0].l.abs() < EPSILON);
        assert!((map.pixels()[2].l - max_l).abs() < 1e-6);
    }

    #[test]
    fn test_partial_mask_blends_proportionally() {
        let src = Raster::from_pixel(2, 2, Rgba([180, 40, 50, 255]));
        let before = rgb8_to_lab([180, 40, 50]);
        let mut map = LabMap::from_raster(&src).unwrap();
        map.recolor(&Mask::from_pixel(2, 2, Luma([51]))).unwrap();
        let lab = map.pixels()[0];
        assert!((lab.a - before.a * 0.8).abs() < 1e-6);
        assert!((lab.b - before.b * 0.8).abs() < 1e-6);
        // flat lightness keeps L
        assert!((lab.l - before.l).abs() < 1e-6);
    }

    #[test]
    fn test_recolor_rejects_mismatched_mask() {
        let mut map = LabMap::from_raster(&two_tone()).unwrap();
        assert!(map.recolor(&Mask::new(2, 4)).is_err());
    }
}
