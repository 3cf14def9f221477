//! The red-eye correction pipeline.
//!
//! Every stage runs unconditionally, in order:
//!
//! 1. convert the source to CIELab, tracking the lightness range
//! 2. measure each pixel's chromaticity distance to reference red and scale
//!    it into a redness mask
//! 3. binarize, blur, and re-threshold to drop speckle
//! 4. keep the largest connected region and fill its holes
//! 5. blur the cleaned mask into soft alpha
//! 6. blend masked pixels toward a neutral, lightness-stretched gray
//! 7. convert back to RGBA, carrying the source alpha
//!
//! Any failing stage aborts the run; nothing partial is returned.

pub mod chromaticity;
pub mod lab_map;

pub use chromaticity::ChromaticityMap;
pub use lab_map::LabMap;

use image::RgbaImage;

use crate::blob::{BlobMap, fill_holes};
use crate::color_space::Lab;
use crate::config::RedEyeConfig;
use crate::convolution::{Kernel, convolve_2d};
use crate::error::Result;
use crate::raster::{Mask, Raster, threshold};

/// Lightness of the reference red. Only (a, b) enter the distance.
const REFERENCE_LIGHTNESS: f64 = 42.0;

/// Intermediate rasters of one pipeline run, for inspection.
#[derive(Debug, Clone)]
pub struct RedEyeStages {
    /// Closeness to reference red, 0..255.
    pub redness: Mask,
    /// Redness thresholded, blurred, and thresholded again.
    pub binary: Mask,
    /// Islands of `binary` in false color, largest first.
    pub islands: RgbaImage,
    /// `binary` reduced to its largest island.
    pub cleaned: Mask,
    /// `cleaned` with interior holes filled.
    pub filled: Mask,
    /// Soft blend weights derived from `filled`.
    pub alpha: Mask,
    /// The corrected image.
    pub output: Raster,
}

/// Detects and neutralizes red eye in whole images.
///
/// Holds only its configuration; every run allocates fresh intermediates, so
/// one tool can serve concurrent calls.
#[derive(Debug, Clone, Default)]
pub struct RedEyeTool {
    config: RedEyeConfig,
}

impl RedEyeTool {
    /// Create a tool, rejecting an unusable configuration.
    pub fn new(config: RedEyeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RedEyeConfig {
        &self.config
    }

    /// Correct red eye in `source`, returning a new image of the same size.
    ///
    /// # Errors
    /// - [`RedEyeError::InvalidParameter`](crate::RedEyeError::InvalidParameter)
    ///   for an empty image or one smaller than the blur kernel
    /// - [`RedEyeError::InternalFailure`](crate::RedEyeError::InternalFailure)
    ///   if blob cleanup finds inconsistent labels
    pub fn process_image(&self, source: &RgbaImage) -> Result<RgbaImage> {
        Ok(self.analyze(source)?.output)
    }

    /// Run the pipeline on `source`, keeping every intermediate.
    pub fn analyze(&self, source: &RgbaImage) -> Result<RedEyeStages> {
        let config = &self.config;
        let (width, height) = source.dimensions();
        let kernel = stage("kernel", Kernel::gaussian(config.blur_size, config.blur_amount))?;

        let mut lab = stage("lab map", LabMap::from_raster(source))?;
        tracing::debug!(
            width,
            height,
            min_l = lab.min_l(),
            max_l = lab.max_l(),
            "converted to CIELab"
        );

        let reference = Lab::new(
            REFERENCE_LIGHTNESS,
            config.reference_a,
            config.reference_b,
        );
        let chroma = ChromaticityMap::new(&lab, reference);
        let redness = chroma.to_mask();
        tracing::debug!(
            min = chroma.min(),
            max = chroma.max(),
            "built redness mask"
        );

        let marked = threshold(&redness, config.mask_threshold);
        let smoothed = stage("denoise", convolve_2d(&marked, &kernel))?;
        let binary = threshold(&smoothed, config.denoise_threshold);

        let mut cleaned = binary.clone();
        let mut blobs = BlobMap::label(&binary);
        let found = blobs.islands().len();
        let islands = blobs.color_islands();
        stage("island removal", blobs.remove_small_islands(&mut cleaned))?;
        let filled = stage("hole filling", fill_holes(&cleaned))?;
        tracing::debug!(
            found,
            kept = blobs.islands().len(),
            "cleaned red-eye mask"
        );

        let alpha = stage("soften", convolve_2d(&filled, &kernel))?;
        stage("recolor", lab.recolor(&alpha))?;
        let output = stage("reconstruct", lab.to_raster())?;
        tracing::debug!(width, height, "red-eye correction complete");

        Ok(RedEyeStages {
            redness,
            binary,
            islands,
            cleaned,
            filled,
            alpha,
            output,
        })
    }
}

/// Log a failing stage before handing its error back.
fn stage<T>(name: &'static str, result: Result<T>) -> Result<T> {
    result.inspect_err(|e| tracing::warn!("Red-eye stage '{name}' failed: {e}"))
}
