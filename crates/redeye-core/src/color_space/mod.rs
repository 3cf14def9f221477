//! Color space conversions: HSL, CIE XYZ, CIE L*a*b*, and chromaticity distance.

pub mod cielab;
pub mod hsl;

pub use cielab::{
    D65_WHITE, Lab, Xyz, chromaticity_distance, lab_to_rgb8, lab_to_xyz, rgb8_to_lab,
    rgb_to_xyz, xyz_to_lab, xyz_to_rgb,
};
pub use hsl::{Hsla, hsl_to_rgb, rgb_to_hsl};
