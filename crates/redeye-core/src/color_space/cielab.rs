//! sRGB ↔ CIE XYZ ↔ CIE L*a*b* conversions (D65 illuminant, 2° observer).
//!
//! XYZ is scaled so that the reference white has Y = 100.
//!
//! ```text
//! sRGB decode: c <= 0.04045 → c / 12.92
//!              c >  0.04045 → ((c + 0.055) / 1.055) ^ 2.4
//!
//! Lab: f(t) = t > 0.008856 ? t^(1/3) : 7.787 × t + 16/116
//!      L = 116 × f(Y/Yn) − 16
//!      a = 500 × (f(X/Xn) − f(Y/Yn))
//!      b = 200 × (f(Y/Yn) − f(Z/Zn))
//! ```

use glam::{DMat3, DVec3};
use serde::{Deserialize, Serialize};

/// A CIE XYZ tristimulus value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Xyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Xyz {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// A CIE L*a*b* color.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Lab {
    /// Lightness, nominally `[0, 100]`.
    pub l: f64,
    /// Green (−) to red (+) axis.
    pub a: f64,
    /// Blue (−) to yellow (+) axis.
    pub b: f64,
}

impl Lab {
    pub const fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    /// Distance to `other` in the (a, b) plane, ignoring lightness.
    pub fn chromaticity_distance(&self, other: &Lab) -> f64 {
        chromaticity_distance(self.a, self.b, other.a, other.b)
    }
}

/// D65 reference white.
pub const D65_WHITE: Xyz = Xyz::new(95.047, 100.0, 108.883);

const LAB_EPSILON: f64 = 0.008856;
const LAB_SLOPE: f64 = 7.787;
const LAB_OFFSET: f64 = 16.0 / 116.0;

/// Linear sRGB → XYZ (columns are the R, G, B primaries).
const RGB_TO_XYZ: DMat3 = DMat3::from_cols(
    DVec3::new(0.4124, 0.2126, 0.0193),
    DVec3::new(0.3576, 0.7152, 0.1192),
    DVec3::new(0.1805, 0.0722, 0.9505),
);

/// XYZ → linear sRGB.
const XYZ_TO_RGB: DMat3 = DMat3::from_cols(
    DVec3::new(3.2406, -0.9689, 0.0557),
    DVec3::new(-1.5372, 1.8758, -0.2040),
    DVec3::new(-0.4986, 0.0415, 1.0570),
);

/// sRGB-encoded channel to linear light.
pub fn srgb_to_linear(encoded: f64) -> f64 {
    if encoded > 0.04045 {
        ((encoded + 0.055) / 1.055).powf(2.4)
    } else {
        encoded / 12.92
    }
}

/// Linear light to an sRGB-encoded channel.
pub fn linear_to_srgb(linear: f64) -> f64 {
    if linear > 0.0031308 {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    } else {
        12.92 * linear
    }
}

/// sRGB in `[0, 1]` to XYZ.
pub fn rgb_to_xyz(rgb: [f64; 3]) -> Xyz {
    let linear = DVec3::from_array(rgb.map(srgb_to_linear)) * 100.0;
    let v = RGB_TO_XYZ * linear;
    Xyz::new(v.x, v.y, v.z)
}

/// XYZ to sRGB. The result is not clamped and may leave `[0, 1]` for
/// colors outside the sRGB gamut.
pub fn xyz_to_rgb(xyz: Xyz) -> [f64; 3] {
    let linear = XYZ_TO_RGB * (DVec3::new(xyz.x, xyz.y, xyz.z) / 100.0);
    linear.to_array().map(linear_to_srgb)
}

fn lab_forward(t: f64) -> f64 {
    if t > LAB_EPSILON {
        t.cbrt()
    } else {
        LAB_SLOPE * t + LAB_OFFSET
    }
}

fn lab_inverse(t: f64) -> f64 {
    let cube = t * t * t;
    if cube > LAB_EPSILON {
        cube
    } else {
        (t - LAB_OFFSET) / LAB_SLOPE
    }
}

/// XYZ to L*a*b* relative to [`D65_WHITE`].
pub fn xyz_to_lab(xyz: Xyz) -> Lab {
    let fx = lab_forward(xyz.x / D65_WHITE.x);
    let fy = lab_forward(xyz.y / D65_WHITE.y);
    let fz = lab_forward(xyz.z / D65_WHITE.z);
    Lab::new(116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz))
}

/// L*a*b* to XYZ relative to [`D65_WHITE`].
pub fn lab_to_xyz(lab: Lab) -> Xyz {
    let fy = (lab.l + 16.0) / 116.0;
    let fx = lab.a / 500.0 + fy;
    let fz = fy - lab.b / 200.0;
    Xyz::new(
        D65_WHITE.x * lab_inverse(fx),
        D65_WHITE.y * lab_inverse(fy),
        D65_WHITE.z * lab_inverse(fz),
    )
}

/// An 8-bit RGB pixel to L*a*b*.
pub fn rgb8_to_lab(rgb: [u8; 3]) -> Lab {
    xyz_to_lab(rgb_to_xyz(rgb.map(|c| c as f64 / 255.0)))
}

/// L*a*b* to an 8-bit RGB pixel, rounding and clipping out-of-gamut values.
pub fn lab_to_rgb8(lab: Lab) -> [u8; 3] {
    xyz_to_rgb(lab_to_xyz(lab)).map(|c| (c * 255.0).round().clamp(0.0, 255.0) as u8)
}

/// Euclidean distance between `(a1, b1)` and `(a2, b2)`.
pub fn chromaticity_distance(a1: f64, b1: f64, a2: f64, b2: f64) -> f64 {
    ((a2 - a1) * (a2 - a1) + (b2 - b1) * (b2 - b1)).sqrt()
}
