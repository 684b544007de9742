//! Cosmetic track contour
//!
//! Erodes the drivable mask and keeps the ring between the original and the
//! eroded region. Purely visual: physics always uses the full mask.

use image::{Rgba, RgbaImage};

use super::mask::DrivableMask;

/// Tint for off-track pixels
pub const OUTSIDE_COLOR: Rgba<u8> = Rgba([180, 0, 0, 40]);
/// Tint for the boundary ring
pub const RING_COLOR: Rgba<u8> = Rgba([255, 30, 30, 220]);

/// Classification of one pixel in the contour overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandCell {
    /// Off-track terrain
    Outside,
    /// Drivable, within `iterations` of an off-track pixel
    Ring,
    /// Drivable interior
    Interior,
}

/// Rendering data derived from a mask
#[derive(Debug, Clone)]
pub struct BoundaryBand {
    width: u32,
    height: u32,
    outside: Vec<bool>,
    ring: Vec<bool>,
}

impl BoundaryBand {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major "outside track" pixel set
    pub fn outside(&self) -> &[bool] {
        &self.outside
    }

    /// Row-major boundary ring pixel set
    pub fn ring(&self) -> &[bool] {
        &self.ring
    }

    pub fn ring_count(&self) -> usize {
        self.ring.iter().filter(|&&c| c).count()
    }

    /// Classify a pixel; `None` outside the grid
    pub fn cell(&self, x: u32, y: u32) -> Option<BandCell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) as usize;
        Some(if self.outside[idx] {
            BandCell::Outside
        } else if self.ring[idx] {
            BandCell::Ring
        } else {
            BandCell::Interior
        })
    }

    /// Transparent overlay with tinted outside and ring pixels
    pub fn overlay_rgba(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| match self.cell(x, y) {
            Some(BandCell::Outside) => OUTSIDE_COLOR,
            Some(BandCell::Ring) => RING_COLOR,
            _ => Rgba([0, 0, 0, 0]),
        })
    }
}

/// Builds [`BoundaryBand`]s by repeated binary erosion
#[derive(Debug, Clone, Copy)]
pub struct ContourExtractor;

impl ContourExtractor {
    /// Boundary band of `iterations` erosion rounds
    pub fn extract(mask: &DrivableMask, iterations: u32) -> BoundaryBand {
        let width = mask.width();
        let height = mask.height();
        let cells = mask.cells();

        let mut eroded = cells.to_vec();
        for _ in 0..iterations {
            eroded = erode(&eroded, width as usize, height as usize);
        }

        let ring = cells
            .iter()
            .zip(&eroded)
            .map(|(&m, &e)| m && !e)
            .collect();
        let outside = cells.iter().map(|&m| !m).collect();

        BoundaryBand {
            width,
            height,
            outside,
            ring,
        }
    }
}

/// One round of erosion with a 4-connected cross; beyond the border is empty
fn erode(cells: &[bool], width: usize, height: usize) -> Vec<bool> {
    let mut out = vec![false; cells.len()];
    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            out[idx] = cells[idx]
                && x > 0
                && cells[idx - 1]
                && x + 1 < width
                && cells[idx + 1]
                && y > 0
                && cells[idx - width]
                && y + 1 < height
                && cells[idx + width];
        }
    }
    out
}
