//! Simulation settings
//!
//! Vision and physics tunables are kept apart so each can be tested on its
//! own. Loaded from an optional JSON file; missing fields take defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Result, SimError};

/// Color thresholds for the asphalt classifier
///
/// All bounds are strict: a pixel is a candidate iff
/// `warmth < warmth_max && brightness_min < brightness < brightness_max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionTuning {
    pub warmth_max: f32,
    pub brightness_min: f32,
    pub brightness_max: f32,
}

impl Default for VisionTuning {
    fn default() -> Self {
        Self {
            warmth_max: WARMTH_MAX,
            brightness_min: BRIGHTNESS_MIN,
            brightness_max: BRIGHTNESS_MAX,
        }
    }
}

impl VisionTuning {
    /// Whether an RGB pixel looks like track surface
    #[inline]
    pub fn is_candidate(&self, r: u8, g: u8, b: u8) -> bool {
        let (r, g, b) = (r as f32, g as f32, b as f32);
        let warmth = r - b;
        let brightness = (r + g + b) / 3.0;
        warmth < self.warmth_max
            && brightness > self.brightness_min
            && brightness < self.brightness_max
    }
}

/// Per-tick vehicle physics constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    pub accel: f32,
    pub brake: f32,
    pub friction: f32,
    pub max_speed: f32,
    /// Magnitude of the reverse cap; velocity is clamped to `[-reverse_max_speed, max_speed]`
    pub reverse_max_speed: f32,
    /// Degrees per tick at full speed
    pub max_turn_rate: f32,
    pub crash_penalty: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            accel: ACCEL,
            brake: BRAKE,
            friction: FRICTION,
            max_speed: MAX_SPEED,
            reverse_max_speed: REVERSE_MAX_SPEED,
            max_turn_rate: MAX_TURN_RATE,
            crash_penalty: CRASH_PENALTY,
        }
    }
}

impl PhysicsTuning {
    /// Reject constants that would make the vehicle misbehave
    pub fn validate(&self) -> Result<()> {
        let all = [
            self.accel,
            self.brake,
            self.friction,
            self.max_speed,
            self.reverse_max_speed,
            self.max_turn_rate,
            self.crash_penalty,
        ];
        if !all.iter().all(|x| x.is_finite() && *x >= 0.0) {
            return Err(invalid("physics constants must be finite and non-negative".into()));
        }
        if self.max_speed <= 0.0 {
            return Err(invalid("max_speed must be positive".into()));
        }
        if self.friction >= 1.0 {
            return Err(invalid(format!(
                "friction must be below 1.0, got {}",
                self.friction
            )));
        }
        if self.crash_penalty > 1.0 {
            return Err(invalid(format!(
                "crash_penalty must be at most 1.0, got {}",
                self.crash_penalty
            )));
        }
        Ok(())
    }
}

/// Sensor ray layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Offsets from heading in degrees, in output order
    pub angles: Vec<f32>,
    /// Maximum ray length in pixels
    pub range: u32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            angles: SENSOR_ANGLES.to_vec(),
            range: SENSOR_RANGE,
        }
    }
}

impl SensorConfig {
    pub fn len(&self) -> usize {
        self.angles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.angles.is_empty()
    }

    /// At least one finite angle and a positive range
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(invalid("sensor angle list is empty".into()));
        }
        if self.range == 0 {
            return Err(invalid("sensor range must be positive".into()));
        }
        if self.angles.iter().any(|a| !a.is_finite()) {
            return Err(invalid("sensor angles must be finite".into()));
        }
        Ok(())
    }

    /// Readings for an unobstructed view (every ray at full range)
    pub fn idle_readings(&self) -> Vec<f32> {
        vec![self.range as f32; self.angles.len()]
    }
}

/// Where the vehicle starts and restarts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnPoint {
    pub x: f32,
    pub y: f32,
    /// Degrees, 0 = +x, clockwise
    pub heading: f32,
}

impl Default for SpawnPoint {
    fn default() -> Self {
        Self {
            x: SPAWN_X,
            y: SPAWN_Y,
            heading: SPAWN_HEADING,
        }
    }
}

/// Root configuration for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub vision: VisionTuning,
    pub physics: PhysicsTuning,
    pub sensors: SensorConfig,
    pub spawn: SpawnPoint,
    /// Erosion rounds for the cosmetic boundary band
    pub contour_iterations: u32,
    pub sprite_width: u32,
    pub sprite_height: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
            vision: VisionTuning::default(),
            physics: PhysicsTuning::default(),
            sensors: SensorConfig::default(),
            spawn: SpawnPoint::default(),
            contour_iterations: CONTOUR_ITERATIONS,
            sprite_width: SPRITE_WIDTH,
            sprite_height: SPRITE_HEIGHT,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file, filling gaps with defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let wrap = |source: Box<dyn std::error::Error + Send + Sync>| SimError::Settings {
            path: path.to_path_buf(),
            source,
        };
        let json = std::fs::read_to_string(path).map_err(|e| wrap(Box::new(e)))?;
        let settings: Self = serde_json::from_str(&json).map_err(|e| wrap(Box::new(e)))?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Reject settings a session cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.viewport_width == 0 || self.viewport_height == 0 {
            return Err(invalid(format!(
                "viewport must be positive, got {}x{}",
                self.viewport_width, self.viewport_height
            )));
        }
        if self.sprite_width == 0 || self.sprite_height == 0 {
            return Err(invalid("sprite size must be positive".into()));
        }
        self.sensors.validate()?;

        let v = &self.vision;
        if ![v.warmth_max, v.brightness_min, v.brightness_max]
            .iter()
            .all(|x| x.is_finite())
        {
            return Err(invalid("vision thresholds must be finite".into()));
        }
        if v.brightness_min >= v.brightness_max {
            return Err(invalid(format!(
                "brightness window is empty ({} .. {})",
                v.brightness_min, v.brightness_max
            )));
        }

        self.physics.validate()?;

        let s = &self.spawn;
        if !(s.x.is_finite() && s.y.is_finite() && s.heading.is_finite()) {
            return Err(invalid("spawn pose must be finite".into()));
        }
        if s.x < 0.0
            || s.y < 0.0
            || s.x >= self.viewport_width as f32
            || s.y >= self.viewport_height as f32
        {
            return Err(invalid(format!(
                "spawn ({}, {}) lies outside the {}x{} viewport",
                s.x, s.y, self.viewport_width, self.viewport_height
            )));
        }

        Ok(())
    }
}

fn invalid(msg: String) -> SimError {
    SimError::InvalidConfig(msg)
}
