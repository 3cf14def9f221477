//! Square convolution kernels: Gaussian blur, sharpen, and unsharp.

use tracing::trace;

use crate::error::{Result, invalid};

/// An N×N kernel with N odd, weights stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    size: usize,
    weights: Vec<f32>,
}

impl Kernel {
    /// Wraps caller-supplied weights. `size` must be odd and
    /// `weights.len()` must equal `size²`.
    pub fn new(weights: Vec<f32>, size: usize) -> Result<Self> {
        if size % 2 == 0 {
            return Err(invalid(format!("kernel size {size} must be odd")));
        }
        if weights.len() != size * size {
            return Err(invalid(format!(
                "kernel has {} weights, expected {size}x{size}",
                weights.len()
            )));
        }
        Ok(Self { size, weights })
    }

    /// A kernel that reproduces its input: 1 at the center, 0 elsewhere.
    pub fn identity(size: usize) -> Result<Self> {
        let mut weights = vec![0.0; size * size];
        if let Some(center) = weights.get_mut((size * size) / 2) {
            *center = 1.0;
        }
        Self::new(weights, size)
    }

    /// Gaussian blur kernel. `amount` controls the spread: the standard
    /// deviation is `amount / 20`. Size 3 with amount 15 is a gentle blur;
    /// useful ranges are size 3..21 and amount 1..100.
    ///
    /// ```text
    /// w(x, y) = e^(−(x² + y²) / (2 × sd²)),  normalized so Σw = 1
    /// ```
    pub fn gaussian(size: usize, amount: f32) -> Result<Self> {
        if size % 2 == 0 {
            return Err(invalid(format!("gaussian kernel size {size} must be odd")));
        }
        if !(amount.is_finite() && amount > 0.0) {
            return Err(invalid(format!("gaussian amount {amount} must be positive")));
        }

        let sd = amount as f64 / 20.0;
        let spread = 2.0 * sd * sd;
        let half = size / 2;
        let stride = half + 1;

        // One octant (0 <= lo <= hi <= half), mirrored into the other seven.
        let mut octant = vec![0.0_f64; stride * stride];
        for hi in 0..=half {
            for lo in 0..=hi {
                let d2 = (hi * hi + lo * lo) as f64;
                octant[hi * stride + lo] = (-d2 / spread).exp();
            }
        }

        let mut values = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                let dx = x.abs_diff(half);
                let dy = y.abs_diff(half);
                values.push(octant[dx.max(dy) * stride + dx.min(dy)]);
            }
        }

        let sum: f64 = values.iter().sum();
        let weights = values.iter().map(|v| (v / sum) as f32).collect();
        trace!(size, amount, "built gaussian kernel");

        Ok(Self { size, weights })
    }

    /// 3×3 sharpening kernel for `amount` in 1..100. Weights sum to 1.
    pub fn sharpen(amount: f32) -> Self {
        let corner = 0.0;
        let side = amount / -50.0;
        let center = side * -4.0 + corner * -4.0 + 1.0;
        Self {
            size: 3,
            weights: vec![
                corner, side, corner,
                side, center, side,
                corner, side, corner,
            ],
        }
    }

    /// Center-biased inverse blur: the Gaussian with its surround negated and
    /// the center set so that the weights sum to 1.
    pub fn unsharp(size: usize, amount: f32) -> Result<Self> {
        let mut kernel = Self::gaussian(size, amount)?;
        let center = (size * size - 1) / 2;
        kernel.weights[center] = 0.0;

        let mut sum = 0.0;
        for w in &mut kernel.weights {
            sum += *w;
            *w = -*w;
        }
        kernel.weights[center] = sum + 1.0;

        Ok(kernel)
    }

    /// Width (and height) of the kernel.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Distance from the center to the kernel edge, `(size − 1) / 2`.
    pub fn radius(&self) -> usize {
        self.size / 2
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    pub fn at(&self, x: usize, y: usize) -> f32 {
        self.weights[y * self.size + x]
    }

    pub fn sum(&self) -> f32 {
        self.weights.iter().sum()
    }
}
