//! Vehicle sprite loading
//!
//! The car artwork is a photo on a light grey backdrop with no alpha channel,
//! so the backdrop is keyed out after resampling.

use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};

use crate::error::{Result, SimError};

/// Minimum channel value for a backdrop pixel
const KEY_MIN_CHANNEL: u8 = 175;
/// Maximum channel spread for a backdrop pixel (near-neutral grey)
const KEY_MAX_SPREAD: u8 = 25;

/// Load, resize and key a sprite image
pub fn load_sprite(path: impl AsRef<Path>, width: u32, height: u32) -> Result<RgbaImage> {
    let path = path.as_ref();
    let image = image::open(path).map_err(|source| SimError::Resource {
        path: path.to_path_buf(),
        source,
    })?;
    let sprite = prepare_sprite(&image, width, height);
    log::info!(
        "Loaded sprite {} ({}x{})",
        path.display(),
        sprite.width(),
        sprite.height()
    );
    Ok(sprite)
}

/// Resize to `width x height` and make the grey backdrop transparent
pub fn prepare_sprite(image: &DynamicImage, width: u32, height: u32) -> RgbaImage {
    let mut sprite = image::imageops::resize(&image.to_rgba8(), width, height, FilterType::Triangle);
    for pixel in sprite.pixels_mut() {
        let [r, g, b, _] = pixel.0;
        if is_backdrop(r, g, b) {
            pixel.0[3] = 0;
        }
    }
    sprite
}

#[inline]
fn is_backdrop(r: u8, g: u8, b: u8) -> bool {
    r > KEY_MIN_CHANNEL
        && g > KEY_MIN_CHANNEL
        && b > KEY_MIN_CHANNEL
        && r.abs_diff(g) < KEY_MAX_SPREAD
        && g.abs_diff(b) < KEY_MAX_SPREAD
}
