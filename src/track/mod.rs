//! Track analysis
//!
//! Everything derived from the track and sprite images, computed once before
//! the tick loop starts:
//! - Drivable mask (color rule + largest connected region)
//! - Cosmetic boundary band for the contour overlay
//! - Keyed vehicle sprite

pub mod components;
pub mod contour;
pub mod mask;
pub mod sprite;

pub use contour::{BandCell, BoundaryBand, ContourExtractor};
pub use mask::{DrivableMask, TrackMaskBuilder};
pub use sprite::{load_sprite, prepare_sprite};
