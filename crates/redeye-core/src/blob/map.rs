//! Connected-component labeling of binary masks.
//!
//! # Algorithm
//! Raster scan; the first unlabeled set pixel seeds a new island, which is
//! grown over its 4-connected neighbors with an explicit stack. Pixels are
//! labeled when pushed, so each pixel enters the stack at most once and the
//! stack never outgrows the island. Stack depth is independent of island
//! size: no recursion.
//!
//! # Complexity
//! O(W × H) time, O(W × H) labels.

use image::{Luma, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RedEyeError, Result};
use crate::raster::{BACKGROUND, Mask, ensure_same_size, is_set};

/// Diagnostic palette, cycled over islands in size order.
const ISLAND_COLORS: [[u8; 3]; 11] = [
    [255, 0, 0],     // red
    [0, 128, 0],     // green
    [0, 0, 255],     // blue
    [0, 255, 255],   // cyan
    [255, 255, 0],   // yellow
    [255, 0, 255],   // magenta
    [255, 165, 0],   // orange
    [230, 230, 250], // lavender
    [50, 205, 50],   // lime green
    [255, 105, 180], // hot pink
    [135, 206, 235], // sky blue
];

/// A pixel coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

/// One 4-connected region of set pixels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobIsland {
    /// Discovery order; the label its pixels carry.
    pub index: usize,
    /// Number of pixels in the island.
    pub pixel_count: usize,
    /// First pixel found in raster-scan order.
    pub seed: Point,
    /// Whether any pixel lies on the raster border.
    pub edge_connected: bool,
}

/// Per-pixel island labels for a binary mask, plus the islands themselves
/// sorted largest first (ties keep discovery order).
#[derive(Debug, Clone)]
pub struct BlobMap {
    width: u32,
    height: u32,
    labels: Vec<Option<usize>>,
    islands: Vec<BlobIsland>,
}

impl BlobMap {
    /// Label every 4-connected island of set pixels in `mask`.
    pub fn label(mask: &Mask) -> Self {
        let (width, height) = mask.dimensions();
        let (w, h) = (width as usize, height as usize);
        let values = mask.as_raw();

        let mut labels = vec![None; w * h];
        let mut islands = Vec::new();
        let mut stack: Vec<(usize, usize)> = Vec::new();

        for y in 0..h {
            for x in 0..w {
                let i = y * w + x;
                if labels[i].is_some() || !is_set(values[i]) {
                    continue;
                }

                let index = islands.len();
                let mut island = BlobIsland {
                    index,
                    pixel_count: 0,
                    seed: Point {
                        x: x as u32,
                        y: y as u32,
                    },
                    edge_connected: false,
                };

                labels[i] = Some(index);
                stack.push((x, y));
                while let Some((px, py)) = stack.pop() {
                    island.pixel_count += 1;
                    if px == 0 || py == 0 || px == w - 1 || py == h - 1 {
                        island.edge_connected = true;
                    }
                    for (nx, ny) in neighbors(px, py, w, h) {
                        let n = ny * w + nx;
                        if labels[n].is_none() && is_set(values[n]) {
                            labels[n] = Some(index);
                            stack.push((nx, ny));
                        }
                    }
                }

                islands.push(island);
            }
        }

        // stable: equal sizes keep discovery order
        islands.sort_by(|a, b| b.pixel_count.cmp(&a.pixel_count));
        debug!(width, height, islands = islands.len(), "labeled mask");

        Self {
            width,
            height,
            labels,
            islands,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Islands, largest first.
    pub fn islands(&self) -> &[BlobIsland] {
        &self.islands
    }

    pub fn largest(&self) -> Option<&BlobIsland> {
        self.islands.first()
    }

    /// The island index at `(x, y)`, or `None` for background.
    pub fn label_at(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.labels[(y * self.width + x) as usize]
    }

    /// Row-major labels parallel to the source mask.
    pub fn labels(&self) -> &[Option<usize>] {
        &self.labels
    }

    /// Keep only the largest island: every other island, smallest first, is
    /// painted background in `raster`, unlabeled, and dropped. Does nothing
    /// when there are fewer than two islands.
    pub fn remove_small_islands(&mut self, raster: &mut Mask) -> Result<()> {
        ensure_same_size((self.width, self.height), raster.dimensions(), "raster")?;
        if self.islands.len() <= 1 {
            return Ok(());
        }

        let removed = self.islands.split_off(1);
        for island in removed.iter().rev() {
            self.erase_island(island, raster)?;
        }
        debug!(removed = removed.len(), "removed small islands");
        Ok(())
    }

    /// Paint every island that does not touch the border as background in
    /// `raster` and drop it. Returns the number of islands erased.
    ///
    /// Run on an inverted mask, the enclosed islands are the holes of the
    /// original foreground; see [`fill_holes`](crate::blob::fill_holes).
    pub fn erase_enclosed_islands(&mut self, raster: &mut Mask) -> Result<usize> {
        ensure_same_size((self.width, self.height), raster.dimensions(), "raster")?;

        let (edge, enclosed): (Vec<_>, Vec<_>) = std::mem::take(&mut self.islands)
            .into_iter()
            .partition(|island| island.edge_connected);
        self.islands = edge;

        for island in &enclosed {
            self.erase_island(island, raster)?;
        }
        Ok(enclosed.len())
    }

    /// Render each island in its own color, for inspecting the labeling.
    /// Background and removed islands are opaque black.
    pub fn color_islands(&self) -> RgbaImage {
        let slots = self
            .islands
            .iter()
            .map(|island| island.index + 1)
            .max()
            .unwrap_or(0);
        let mut colors = vec![None; slots];
        for (n, island) in self.islands.iter().enumerate() {
            let [r, g, b] = ISLAND_COLORS[n % ISLAND_COLORS.len()];
            colors[island.index] = Some(Rgba([r, g, b, 255]));
        }

        let mut out = RgbaImage::from_pixel(self.width, self.height, Rgba([0, 0, 0, 255]));
        for (px, label) in out.pixels_mut().zip(&self.labels) {
            if let Some(color) = label.and_then(|index| colors.get(index).copied().flatten()) {
                *px = color;
            }
        }
        out
    }

    /// Flood the island from its seed, clearing labels and painting
    /// background into `raster`.
    fn erase_island(&mut self, island: &BlobIsland, raster: &mut Mask) -> Result<()> {
        let (w, h) = (self.width as usize, self.height as usize);
        let Point { x, y } = island.seed;
        let (sx, sy) = (x as usize, y as usize);
        if self.labels.get(sy * w + sx).copied().flatten() != Some(island.index) {
            return Err(RedEyeError::InternalFailure(format!(
                "seed ({x}, {y}) of island {} is not labeled with it",
                island.index
            )));
        }

        let mut erased = 0;
        let mut stack = vec![(sx, sy)];
        self.labels[sy * w + sx] = None;
        while let Some((px, py)) = stack.pop() {
            raster.put_pixel(px as u32, py as u32, Luma([BACKGROUND]));
            erased += 1;
            for (nx, ny) in neighbors(px, py, w, h) {
                let n = ny * w + nx;
                if self.labels[n] == Some(island.index) {
                    self.labels[n] = None;
                    stack.push((nx, ny));
                }
            }
        }

        if erased != island.pixel_count {
            return Err(RedEyeError::InternalFailure(format!(
                "island {} has {} pixels but {erased} were erased",
                island.index, island.pixel_count
            )));
        }
        Ok(())
    }
}

/// In-bounds 4-connected neighbors of `(x, y)`.
fn neighbors(x: usize, y: usize, w: usize, h: usize) -> impl Iterator<Item = (usize, usize)> {
    [
        (x, y.wrapping_sub(1)),
        (x.wrapping_sub(1), y),
        (x + 1, y),
        (x, y + 1),
    ]
    .into_iter()
    .filter(move |&(nx, ny)| nx < w && ny < h)
}
