//! Connected-component analysis of binary masks: labeling, pruning of small
//! islands, and hole filling.

pub mod map;

pub use map::{BlobIsland, BlobMap, Point};

use tracing::debug;

use crate::error::Result;
use crate::raster::{Mask, invert};

/// Fill the interior holes of a binary mask.
///
/// The mask is inverted and labeled; background islands that do not touch
/// the border are enclosed by foreground, so they are erased before
/// inverting back. Background connected to the border is untouched.
pub fn fill_holes(mask: &Mask) -> Result<Mask> {
    let mut filled = mask.clone();
    invert(&mut filled);

    let mut background = BlobMap::label(&filled);
    let holes = background.erase_enclosed_islands(&mut filled)?;
    invert(&mut filled);

    debug!(holes, "filled mask holes");
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn outline(size: u32, margin: u32) -> Mask {
        let last = size - 1 - margin;
        Mask::from_fn(size, size, |x, y| {
            let inside = (margin..=last).contains(&x) && (margin..=last).contains(&y);
            let on_ring = x == margin || y == margin || x == last || y == last;
            Luma([if inside && on_ring { 255 } else { 0 }])
        })
    }

    #[test]
    fn test_fill_holes_fills_square_outline() {
        let filled = fill_holes(&outline(5, 0)).unwrap();
        assert!(filled.pixels().all(|p| p.0[0] == 255));
    }

    #[test]
    fn test_fill_holes_leaves_exterior_background() {
        let filled = fill_holes(&outline(9, 2)).unwrap();
        for (x, y, p) in filled.enumerate_pixels() {
            let inside = (2..=6).contains(&x) && (2..=6).contains(&y);
            assert_eq!(p.0[0], if inside { 255 } else { 0 }, "at ({x}, {y})");
        }
    }

    #[test]
    fn test_fill_holes_without_holes_only_binarizes() {
        let mut mask = Mask::new(6, 6);
        mask.put_pixel(1, 1, Luma([40]));
        let filled = fill_holes(&mask).unwrap();
        assert_eq!(filled.get_pixel(1, 1).0[0], 255);
        assert_eq!(filled.pixels().filter(|p| p.0[0] != 0).count(), 1);
    }
}
