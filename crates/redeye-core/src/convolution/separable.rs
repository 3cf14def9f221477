//! Separable integer Gaussian blur and the unsharp mask built on it.
//!
//! The blur samples a continuous Gaussian into a 1-D vector of integer
//! weights and applies it along rows, then along columns. Near the edges only
//! the taps that fall inside the raster are used and the result is divided by
//! the sum of those taps, so edge pixels keep their brightness instead of
//! fading toward black.
//!
//! # Complexity
//! O(W × H × d) for a vector of length d, versus O(W × H × d²) for the
//! equivalent full 2-D kernel.

use image::{ImageBuffer, Pixel, RgbaImage};
use tracing::trace;

use crate::error::{RedEyeError, Result, invalid};

/// Largest accepted blur radius, in pixels.
pub const MAX_BLUR_RADIUS: f32 = 16.0;

/// Largest accepted unsharp-mask depth.
pub const MAX_UNSHARP_DEPTH: f32 = 4.0;

/// Fixed-point denominator for the unsharp blend.
const UNSHARP_DENOMINATOR: i64 = 10_000;

/// Integer blur weights for one radius, plus the sum used to normalize them.
///
/// A pure function of the radius: build one with [`FilterVector::for_radius`]
/// and pass it to whatever needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterVector {
    weights: Vec<i64>,
    denominator: i64,
}

impl FilterVector {
    /// Sample the Gaussian for `radius` (in `[0, MAX_BLUR_RADIUS]`).
    ///
    /// The effective diameter is `d = ⌊5 × radius + 1⌋`, forced odd; weights
    /// outside `d` are taken as zero. Radii below 0.2 give a single unit tap.
    pub fn for_radius(radius: f32) -> Result<Self> {
        if !radius.is_finite() || !(0.0..=MAX_BLUR_RADIUS).contains(&radius) {
            return Err(invalid(format!(
                "blur radius {radius} outside [0, {MAX_BLUR_RADIUS}]"
            )));
        }

        let dim = ((5.0 * radius + 1.0) as usize) | 1;
        if dim == 1 {
            return Ok(Self {
                weights: vec![1],
                denominator: 1,
            });
        }

        let half = dim / 2;
        let spread = 2.0 * radius as f64 * radius as f64;
        let scale = ((half * half) as f64 / spread).exp();

        let mut weights = vec![0_i64; dim];
        weights[half] = scale as i64;
        let mut denominator = weights[half];
        for i in 1..=half {
            let v = (scale * (-((i * i) as f64) / spread).exp()) as i64;
            weights[half - i] = v;
            weights[half + i] = v;
            denominator += 2 * v;
        }
        trace!(radius, dim, denominator, "built blur filter vector");

        Ok(Self {
            weights,
            denominator,
        })
    }

    pub fn weights(&self) -> &[i64] {
        &self.weights
    }

    /// Sum of all weights; divides interior samples.
    pub fn denominator(&self) -> i64 {
        self.denominator
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Number of taps on each side of the center.
    pub fn half(&self) -> usize {
        self.weights.len() / 2
    }
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

/// Blur every channel of `source` with the separable Gaussian for `radius`.
///
/// # Errors
/// [`RedEyeError::InvalidParameter`] for a radius outside
/// `[0, MAX_BLUR_RADIUS]`.
pub fn separable_blur<P>(
    source: &ImageBuffer<P, Vec<u8>>,
    radius: f32,
) -> Result<ImageBuffer<P, Vec<u8>>>
where
    P: Pixel<Subpixel = u8>,
{
    let filter = FilterVector::for_radius(radius)?;
    if filter.len() <= 1 {
        return Ok(source.clone());
    }

    let rows = convolve_axis(source, &filter, Axis::Horizontal)?;
    convolve_axis(&rows, &filter, Axis::Vertical)
}

fn convolve_axis<P>(
    source: &ImageBuffer<P, Vec<u8>>,
    filter: &FilterVector,
    axis: Axis,
) -> Result<ImageBuffer<P, Vec<u8>>>
where
    P: Pixel<Subpixel = u8>,
{
    let (width, height) = source.dimensions();
    let (w, h) = (width as usize, height as usize);
    let channels = P::CHANNEL_COUNT as usize;
    let (lines, pixels) = match axis {
        Axis::Horizontal => (h, w),
        Axis::Vertical => (w, h),
    };
    let offset = |line: usize, p: usize| match axis {
        Axis::Horizontal => (line * w + p) * channels,
        Axis::Vertical => (p * w + line) * channels,
    };

    let src = source.as_raw();
    let mut dst = vec![0u8; src.len()];
    let weights = filter.weights();
    let half = filter.half();

    for line in 0..lines {
        for p in 0..pixels {
            let first = p.saturating_sub(half);
            let last = (p + half).min(pixels - 1);
            let interior = p >= half && p + half < pixels;

            for c in 0..channels {
                let mut sum = 0_i64;
                let mut used = 0_i64;
                for q in first..=last {
                    let weight = weights[q + half - p];
                    sum += weight * src[offset(line, q) + c] as i64;
                    used += weight;
                }

                let denominator = if interior {
                    filter.denominator()
                } else {
                    used
                };
                if denominator != 0 {
                    sum /= denominator;
                }
                dst[offset(line, p) + c] = sum.clamp(0, 255) as u8;
            }
        }
    }

    ImageBuffer::from_raw(width, height, dst).ok_or_else(|| {
        RedEyeError::InternalFailure("blur buffer does not match raster size".into())
    })
}

/// Sharpen by subtracting a blurred copy: `(1 + depth) × src − depth × blur`.
///
/// Applied to R, G and B in fixed point and clipped to `[0, 255]`; alpha is
/// copied from the source. `depth` must lie in `[0, MAX_UNSHARP_DEPTH]`.
pub fn unsharp_mask(source: &RgbaImage, radius: f32, depth: f32) -> Result<RgbaImage> {
    if !depth.is_finite() || !(0.0..=MAX_UNSHARP_DEPTH).contains(&depth) {
        return Err(invalid(format!(
            "unsharp depth {depth} outside [0, {MAX_UNSHARP_DEPTH}]"
        )));
    }

    let mut result = separable_blur(source, radius)?;
    let dpt = (UNSHARP_DENOMINATOR as f32 * depth) as i64;
    let dpt_plus = dpt + UNSHARP_DENOMINATOR;

    for (out, src) in result.pixels_mut().zip(source.pixels()) {
        for c in 0..3 {
            let v = (dpt_plus * src[c] as i64 - dpt * out[c] as i64) / UNSHARP_DENOMINATOR;
            out[c] = v.clamp(0, 255) as u8;
        }
        out[3] = src[3];
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgba};

    #[test]
    fn test_filter_vector_is_symmetric_and_normalized() {
        let f = FilterVector::for_radius(1.0).unwrap();
        assert_eq!(f.len(), 7);
        let w = f.weights();
        for i in 0..f.half() {
            assert_eq!(w[i], w[w.len() - 1 - i]);
            assert!(w[i] <= w[i + 1]);
        }
        assert_eq!(f.denominator(), w.iter().sum::<i64>());
    }

    #[test]
    fn test_filter_vector_depends_only_on_radius() {
        assert_eq!(
            FilterVector::for_radius(2.5).unwrap(),
            FilterVector::for_radius(2.5).unwrap()
        );
        assert_ne!(
            FilterVector::for_radius(2.5).unwrap(),
            FilterVector::for_radius(3.0).unwrap()
        );
    }

    #[test]
    fn test_tiny_radius_is_single_tap() {
        let f = FilterVector::for_radius(0.0).unwrap();
        assert_eq!(f.weights(), &[1]);
        assert_eq!(f.denominator(), 1);
    }

    #[test]
    fn test_malformed_radius_is_rejected() {
        for radius in [-1.0, 16.5, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                FilterVector::for_radius(radius),
                Err(RedEyeError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn test_uniform_image_is_unchanged_including_edges() {
        let src = GrayImage::from_pixel(9, 6, Luma([137]));
        let out = separable_blur(&src, 2.0).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn test_blur_spreads_impulse_symmetrically() {
        let mut src = GrayImage::new(9, 9);
        src.put_pixel(4, 4, Luma([255]));
        let out = separable_blur(&src, 1.0).unwrap();
        assert!(out.get_pixel(4, 4).0[0] < 255);
        assert!(out.get_pixel(4, 3).0[0] > 0);
        assert_eq!(out.get_pixel(4, 3), out.get_pixel(4, 5));
        assert_eq!(out.get_pixel(3, 4), out.get_pixel(5, 4));
    }

    #[test]
    fn test_edges_are_renormalized_not_darkened() {
        let mut src = GrayImage::from_pixel(10, 10, Luma([200]));
        src.put_pixel(9, 9, Luma([0]));
        let out = separable_blur(&src, 1.0).unwrap();
        // the corner far from the dark pixel keeps its brightness
        assert_eq!(out.get_pixel(0, 0).0[0], 200);
        assert!(out.get_pixel(9, 9).0[0] > 0);
    }

    #[test]
    fn test_unsharp_depth_zero_is_identity() {
        let src = RgbaImage::from_fn(8, 8, |x, y| Rgba([(x * 30) as u8, (y * 30) as u8, 90, 180]));
        assert_eq!(unsharp_mask(&src, 2.0, 0.0).unwrap(), src);
    }

    #[test]
    fn test_unsharp_increases_edge_contrast() {
        let src = RgbaImage::from_fn(12, 4, |x, _| {
            let v = if x < 6 { 100 } else { 200 };
            Rgba([v, v, v, 77])
        });
        let out = unsharp_mask(&src, 1.0, 1.0).unwrap();
        assert!(out.get_pixel(6, 2).0[0] > 200);
        assert!(out.get_pixel(5, 2).0[0] < 100);
        assert_eq!(out.get_pixel(6, 2).0[3], 77);
        assert_eq!(out.get_pixel(0, 2).0[0], 100);
    }

    #[test]
    fn test_unsharp_rejects_bad_depth() {
        let src = RgbaImage::new(4, 4);
        assert!(unsharp_mask(&src, 1.0, 5.0).is_err());
        assert!(unsharp_mask(&src, 1.0, -0.5).is_err());
    }
}
