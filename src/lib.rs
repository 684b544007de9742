//! Track Racer - a bitmap-track driving simulation
//!
//! Core modules:
//! - `track`: Drivable mask construction from a raster image (color heuristics,
//!   connected components, erosion contour, sprite keying)
//! - `sim`: Vehicle dynamics, ray-marched distance sensors, session driver
//! - `settings`: Data-driven tunables for vision, physics and sensors
//! - `telemetry`: Per-frame read-only snapshot for renderers and HUDs

pub mod error;
pub mod settings;
pub mod sim;
pub mod telemetry;
pub mod track;

pub use error::{Result, SimError};
pub use settings::{PhysicsTuning, SensorConfig, Settings, SpawnPoint, VisionTuning};
pub use telemetry::Telemetry;

use glam::Vec2;

/// Default tunables (one consistent parameter set)
pub mod consts {
    /// Viewport the track image is resampled to
    pub const VIEWPORT_WIDTH: u32 = 1024;
    pub const VIEWPORT_HEIGHT: u32 = 1024;

    /// Asphalt color rule: warmth = r - b, brightness = (r + g + b) / 3
    pub const WARMTH_MAX: f32 = 20.0;
    pub const BRIGHTNESS_MIN: f32 = 25.0;
    pub const BRIGHTNESS_MAX: f32 = 165.0;

    /// Velocity gained per tick while accelerating
    pub const ACCEL: f32 = 0.18;
    /// Velocity lost per tick while braking
    pub const BRAKE: f32 = 0.22;
    /// Per-tick rolling resistance multiplier
    pub const FRICTION: f32 = 0.96;
    /// Forward speed cap (pixels/tick)
    pub const MAX_SPEED: f32 = 5.5;
    /// Reverse speed cap (pixels/tick, magnitude)
    pub const REVERSE_MAX_SPEED: f32 = 2.0;
    /// Heading change at full speed (degrees/tick)
    pub const MAX_TURN_RATE: f32 = 3.2;
    /// Velocity multiplier applied when driving into off-track terrain
    pub const CRASH_PENALTY: f32 = 0.4;

    /// Sensor ray offsets relative to heading (degrees)
    pub const SENSOR_ANGLES: [f32; 5] = [-90.0, -45.0, 0.0, 45.0, 90.0];
    /// Sensor ray length (pixels)
    pub const SENSOR_RANGE: u32 = 130;

    /// Spawn pose on the default circuit
    pub const SPAWN_X: f32 = 610.0;
    pub const SPAWN_Y: f32 = 430.0;
    pub const SPAWN_HEADING: f32 = 270.0;

    /// Erosion rounds used for the contour band
    pub const CONTOUR_ITERATIONS: u32 = 3;

    /// Vehicle sprite size after resampling
    pub const SPRITE_WIDTH: u32 = 35;
    pub const SPRITE_HEIGHT: u32 = 38;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Unit direction for a heading in degrees (0° = +x, clockwise with y down)
#[inline]
pub fn heading_vector(degrees: f32) -> Vec2 {
    let rad = degrees.to_radians();
    Vec2::new(rad.cos(), rad.sin())
}

/// Grid cell for a continuous pixel-space point, rounding toward zero
///
/// Coordinates in (-1, 0) land in row/column 0.
#[inline]
pub fn cell_of(p: Vec2) -> (i64, i64) {
    (p.x.trunc() as i64, p.y.trunc() as i64)
}
