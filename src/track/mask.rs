//! Drivable mask construction
//!
//! The track photo is resampled to the viewport, every pixel is classified
//! with the asphalt color rule, and only the largest connected candidate
//! region survives. Stray matches elsewhere in the image (grey rooftops,
//! decorations) would otherwise become phantom track.

use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};

use crate::error::{Result, SimError};
use crate::settings::VisionTuning;

use super::components::keep_largest;

/// Boolean grid of drivable cells, row-major (`row = y`)
///
/// Immutable once built; shared read-only by dynamics and sensors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrivableMask {
    width: u32,
    height: u32,
    cells: Vec<bool>,
}

impl DrivableMask {
    /// Wrap a row-major cell vector
    pub fn from_cells(width: u32, height: u32, cells: Vec<bool>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(SimError::InvalidConfig(format!(
                "mask dimensions must be positive, got {width}x{height}"
            )));
        }
        if cells.len() != width as usize * height as usize {
            return Err(SimError::InvalidConfig(format!(
                "mask has {} cells, expected {}x{}",
                cells.len(),
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Mask with every cell set to `value`
    pub fn filled(width: u32, height: u32, value: bool) -> Result<Self> {
        Self::from_cells(width, height, vec![value; width as usize * height as usize])
    }

    /// Build a mask by evaluating `f(x, y)` for every cell
    pub fn from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> bool) -> Result<Self> {
        let cells = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| f(x, y))
            .collect();
        Self::from_cells(width, height, cells)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw row-major cells
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    /// Cell value, or `None` outside the grid
    #[inline]
    pub fn get(&self, x: i64, y: i64) -> Option<bool> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(self.cells[y as usize * self.width as usize + x as usize])
    }

    /// Out-of-grid cells read as non-drivable
    #[inline]
    pub fn is_drivable(&self, x: i64, y: i64) -> bool {
        self.get(x, y).unwrap_or(false)
    }

    /// Number of drivable cells
    pub fn drivable_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Fraction of the grid that is drivable, in [0, 1]
    pub fn coverage(&self) -> f32 {
        self.drivable_count() as f32 / self.cells.len() as f32
    }
}

/// Turns a track image into a [`DrivableMask`]
#[derive(Debug, Clone, Copy, Default)]
pub struct TrackMaskBuilder {
    pub vision: VisionTuning,
}

impl TrackMaskBuilder {
    pub fn new(vision: VisionTuning) -> Self {
        Self { vision }
    }

    /// Load an image file and build its mask at `width x height`
    pub fn build(
        &self,
        path: impl AsRef<Path>,
        width: u32,
        height: u32,
    ) -> Result<DrivableMask> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|source| SimError::Resource {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Analyzing track {} ...", path.display());
        self.build_from_image(&image, width, height)
    }

    /// Build a mask from an already decoded image
    pub fn build_from_image(
        &self,
        image: &DynamicImage,
        width: u32,
        height: u32,
    ) -> Result<DrivableMask> {
        if width == 0 || height == 0 {
            return Err(SimError::InvalidConfig(format!(
                "target size must be positive, got {width}x{height}"
            )));
        }

        let rgb = image.to_rgb8();
        let rgb = if rgb.dimensions() == (width, height) {
            rgb
        } else {
            image::imageops::resize(&rgb, width, height, FilterType::CatmullRom)
        };

        let candidates = self.classify(&rgb);
        let (cells, kept) = keep_largest(&candidates, width as usize, height as usize);
        if kept == 0 {
            log::warn!("No pixel matched the track color rule");
        } else {
            log::debug!("Largest track region: {kept} px");
        }

        let mask = DrivableMask::from_cells(width, height, cells)?;
        log::info!("Track detected: {:.1}%", mask.coverage() * 100.0);
        Ok(mask)
    }

    /// Per-pixel color rule, before component selection
    pub fn classify(&self, rgb: &RgbImage) -> Vec<bool> {
        rgb.pixels()
            .map(|p| {
                let [r, g, b] = p.0;
                self.vision.is_candidate(r, g, b)
            })
            .collect()
    }
}
