//! Automatic red-eye detection and correction.
//!
//! [`RedEyeTool`] finds pixels whose CIELab chromaticity is close to
//! canonical red-eye red, cleans the resulting mask down to one solid region,
//! and blends that region toward a neutral gray. The supporting engines are
//! public on their own:
//!
//! - [`color_space`]: RGB ↔ HSL and sRGB ↔ XYZ ↔ CIELab conversions
//! - [`convolution`]: kernel generation, 2-D convolution, separable blur
//! - [`blob`]: connected-component labeling of binary masks

pub mod blob;
pub mod color_space;
pub mod config;
pub mod convolution;
pub mod error;
pub mod raster;
pub mod redeye;

pub use config::RedEyeConfig;
pub use error::{RedEyeError, Result};
pub use raster::{Mask, Raster};
pub use redeye::{RedEyeStages, RedEyeTool};
