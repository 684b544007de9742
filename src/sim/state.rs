//! Vehicle state types
//!
//! A `VehicleState` is only ever replaced as a whole by the dynamics step, so
//! a rejected move can never leave position and velocity out of sync.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::heading_vector;
use crate::settings::SpawnPoint;

/// Position and facing in image-pixel space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehiclePose {
    pub pos: Vec2,
    /// Degrees, 0 = +x, increasing clockwise (y grows downward)
    pub heading: f32,
}

impl VehiclePose {
    pub fn new(x: f32, y: f32, heading: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            heading,
        }
    }

    /// Unit vector along the heading
    #[inline]
    pub fn forward(&self) -> Vec2 {
        heading_vector(self.heading)
    }
}

impl From<SpawnPoint> for VehiclePose {
    fn from(spawn: SpawnPoint) -> Self {
        Self::new(spawn.x, spawn.y, spawn.heading)
    }
}

/// Why the vehicle stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrashCause {
    /// Candidate position landed on non-drivable terrain
    OffTrack,
    /// Candidate position left the grid
    OutOfBounds,
}

/// Lifecycle of the vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehiclePhase {
    /// On the track, moving under input
    Alive,
    /// Left the track; frozen until reset
    Crashed(CrashCause),
}

/// Complete vehicle state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleState {
    pub(crate) pose: VehiclePose,
    /// Signed speed along the heading (pixels/tick)
    pub(crate) velocity: f32,
    pub(crate) phase: VehiclePhase,
    /// Accumulated |velocity| of committed moves
    pub(crate) distance_traveled: f32,
    /// One distance per configured sensor angle
    pub(crate) sensor_readings: Vec<f32>,
}

impl VehicleState {
    /// Fresh state at `pose` with every sensor reading `idle_readings`
    pub fn spawn(pose: VehiclePose, idle_readings: Vec<f32>) -> Self {
        Self {
            pose,
            velocity: 0.0,
            phase: VehiclePhase::Alive,
            distance_traveled: 0.0,
            sensor_readings: idle_readings,
        }
    }

    pub fn pose(&self) -> VehiclePose {
        self.pose
    }

    pub fn position(&self) -> Vec2 {
        self.pose.pos
    }

    pub fn heading(&self) -> f32 {
        self.pose.heading
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn phase(&self) -> VehiclePhase {
        self.phase
    }

    pub fn is_alive(&self) -> bool {
        self.phase == VehiclePhase::Alive
    }

    pub fn distance_traveled(&self) -> f32 {
        self.distance_traveled
    }

    pub fn sensor_readings(&self) -> &[f32] {
        &self.sensor_readings
    }
}
