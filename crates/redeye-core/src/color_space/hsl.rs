//! RGB ↔ HSL conversion and the `Hsla` color value.
//!
//! # Algorithm
//! Graphics Gems I, p. 448. The forward transform takes the max/min channel
//! to derive lightness and saturation, then picks the hue from a six-way case
//! split on which channel is the max and which the min. The inverse uses the
//! sextant method:
//! ```text
//! v    = l <= 0.5 ? l × (1 + s) : l + s − l × s
//! m    = 2l − v
//! h'   = 6 × h / 360,  sextant = ⌊h'⌋,  f = h' − sextant
//! mid1 = m + v × ((v − m) / v) × f
//! mid2 = v − v × ((v − m) / v) × f
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{RedEyeError, Result, invalid};

/// Convert RGB (each in `[0, 1]`) to `(hue°, saturation, lightness)`.
///
/// Fails with [`RedEyeError::InvalidParameter`] if a channel is out of range,
/// and with [`RedEyeError::DegenerateComputation`] for black (zero
/// lightness) and for achromatic colors, which have no defined hue.
pub fn rgb_to_hsl(r: f64, g: f64, b: f64) -> Result<(f64, f64, f64)> {
    if ![r, g, b].iter().all(|c| (0.0..=1.0).contains(c)) {
        return Err(invalid(format!("rgb ({r}, {g}, {b}) outside [0, 1]")));
    }

    let v = r.max(g).max(b);
    let m = r.min(g).min(b);

    let l = (m + v) / 2.0;
    if l <= 0.0 {
        return Err(RedEyeError::DegenerateComputation("lightness is zero"));
    }

    let vm = v - m;
    if vm <= 0.0 {
        return Err(RedEyeError::DegenerateComputation(
            "achromatic color has no hue",
        ));
    }
    let s = vm / if l <= 0.5 { v + m } else { 2.0 - v - m };

    let r2 = (v - r) / vm;
    let g2 = (v - g) / vm;
    let b2 = (v - b) / vm;

    let h = if r == v {
        if g == m { 5.0 + b2 } else { 1.0 - g2 }
    } else if g == v {
        if b == m { 1.0 + r2 } else { 3.0 - b2 }
    } else if r == m {
        3.0 + g2
    } else {
        5.0 - r2
    };

    Ok((h / 6.0 * 360.0, s, l))
}

/// Convert `(hue°, saturation, lightness)` back to RGB in `[0, 1]`.
///
/// Hue must lie in `[0, 360]`, saturation and lightness in `[0, 1]`.
/// Zero lightness is reported as [`RedEyeError::DegenerateComputation`].
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> Result<(f64, f64, f64)> {
    if !(0.0..=360.0).contains(&h) || !(0.0..=1.0).contains(&s) || !(0.0..=1.0).contains(&l) {
        return Err(invalid(format!("hsl ({h}, {s}, {l}) outside range")));
    }

    let v = if l <= 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    if v <= 0.0 {
        return Err(RedEyeError::DegenerateComputation("hsl value is zero"));
    }

    let m = l + l - v;
    let sv = (v - m) / v;
    let scaled = h / 360.0 * 6.0;
    let sextant = scaled as u32;
    let fract = scaled - sextant as f64;
    let vsf = v * sv * fract;
    let mid1 = m + vsf;
    let mid2 = v - vsf;

    let rgb = match sextant {
        0 => (v, mid1, m),
        1 => (mid2, v, m),
        2 => (m, v, mid1),
        3 => (m, mid2, v),
        4 => (mid1, m, v),
        5 => (v, m, mid2),
        // hue of exactly 360°
        _ => (v, mid1, m),
    };
    Ok(rgb)
}

/// An HSL color with alpha. Immutable: every adjustment returns a new value,
/// and RGB is derived on demand rather than kept in sync.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsla {
    h: f64,
    s: f64,
    l: f64,
    a: f64,
}

impl Hsla {
    /// Build a color, clamping hue to `[0, 360]` and the rest to `[0, 1]`.
    pub fn new(h: f64, s: f64, l: f64, a: f64) -> Self {
        Self {
            h: h.clamp(0.0, 360.0),
            s: s.clamp(0.0, 1.0),
            l: l.clamp(0.0, 1.0),
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Build from RGBA in `[0, 1]` (clamped). Black and grays, which have no
    /// hue, become achromatic colors with zero hue and saturation.
    pub fn from_rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        let [r, g, b] = [r, g, b].map(|c| c.clamp(0.0, 1.0));
        match rgb_to_hsl(r, g, b) {
            Ok((h, s, l)) => Self::new(h, s, l, a),
            Err(_) => {
                let l = (r.max(g).max(b) + r.min(g).min(b)) / 2.0;
                Self::new(0.0, 0.0, l, a)
            }
        }
    }

    /// Build from an 8-bit RGBA pixel.
    pub fn from_rgba8(px: [u8; 4]) -> Self {
        let [r, g, b, a] = px.map(|c| c as f64 / 255.0);
        Self::from_rgba(r, g, b, a)
    }

    /// RGBA in `[0, 1]`.
    pub fn to_rgba(&self) -> [f64; 4] {
        match hsl_to_rgb(self.h, self.s, self.l) {
            Ok((r, g, b)) => [r, g, b, self.a],
            Err(_) => [self.l, self.l, self.l, self.a],
        }
    }

    /// 8-bit RGBA, rounded.
    pub fn to_rgba8(&self) -> [u8; 4] {
        self.to_rgba()
            .map(|c| (c * 255.0).round().clamp(0.0, 255.0) as u8)
    }

    pub fn hue(&self) -> f64 {
        self.h
    }

    pub fn saturation(&self) -> f64 {
        self.s
    }

    pub fn lightness(&self) -> f64 {
        self.l
    }

    pub fn alpha(&self) -> f64 {
        self.a
    }

    pub fn with_hue(self, h: f64) -> Self {
        Self::new(h, self.s, self.l, self.a)
    }

    pub fn with_saturation(self, s: f64) -> Self {
        Self::new(self.h, s, self.l, self.a)
    }

    pub fn with_lightness(self, l: f64) -> Self {
        Self::new(self.h, self.s, l, self.a)
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self::new(self.h, self.s, self.l, a)
    }

    /// The complementary color: hue rotated by 180°.
    pub fn opposite_hue(self) -> Self {
        let h = if self.h >= 180.0 {
            self.h - 180.0
        } else {
            self.h + 180.0
        };
        self.with_hue(h)
    }
}
