//! Raster and mask types plus the per-pixel remaps the pipeline needs.
//!
//! Rasters are `image` crate buffers: RGBA for photographs, single-channel
//! luma for masks. A mask pixel is *set* when its value is nonzero.

use image::{GrayImage, RgbaImage};

use crate::error::{Result, invalid};

/// An 8-bit RGBA photograph.
pub type Raster = RgbaImage;

/// An 8-bit single-channel mask; 255 is fully red-eye, 0 unaffected.
pub type Mask = GrayImage;

/// Value of an unset mask pixel.
pub const BACKGROUND: u8 = 0;

/// Value of a set pixel in a binary mask.
pub const FOREGROUND: u8 = 255;

/// Whether a mask value counts as foreground.
pub fn is_set(value: u8) -> bool {
    value > BACKGROUND
}

/// Lookup table sending values above `level` to [`FOREGROUND`] and the rest
/// to [`BACKGROUND`].
pub fn threshold_table(level: u8) -> [u8; 256] {
    std::array::from_fn(|v| if v > level as usize { FOREGROUND } else { BACKGROUND })
}

/// Apply a 256-entry lookup table to every pixel of `mask`.
pub fn remap(mask: &Mask, table: &[u8; 256]) -> Mask {
    let mut out = mask.clone();
    for px in out.pixels_mut() {
        px.0[0] = table[px.0[0] as usize];
    }
    out
}

/// Binarize `mask`: values above `level` become 255, the rest 0.
pub fn threshold(mask: &Mask, level: u8) -> Mask {
    remap(mask, &threshold_table(level))
}

/// Swap foreground and background of a binary mask in place. Any nonzero
/// value counts as foreground.
pub fn invert(mask: &mut Mask) {
    for px in mask.pixels_mut() {
        px.0[0] = if is_set(px.0[0]) { BACKGROUND } else { FOREGROUND };
    }
}

/// Fail unless `actual` matches `expected` (both `(width, height)`).
pub fn ensure_same_size(expected: (u32, u32), actual: (u32, u32), what: &str) -> Result<()> {
    if expected != actual {
        return Err(invalid(format!(
            "{what} is {}x{}, expected {}x{}",
            actual.0, actual.1, expected.0, expected.1
        )));
    }
    Ok(())
}
