//! Per-frame telemetry snapshot
//!
//! What the HUD shows, captured as plain data so renderers and log sinks can
//! consume it without reaching into the session.

use serde::Serialize;

use crate::normalize_degrees;
use crate::sim::{Session, VehiclePhase};

/// Status line values for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Telemetry {
    pub tick: u64,
    pub x: f32,
    pub y: f32,
    /// Unsigned speed (pixels/tick)
    pub speed: f32,
    /// Heading folded into [0, 360)
    pub heading: f32,
    pub distance: f32,
    /// Whole-pixel sensor distances
    pub sensors: Vec<u32>,
    pub normalized_sensors: Vec<f32>,
    pub alive: bool,
    pub phase: VehiclePhase,
    pub show_contour: bool,
}

impl Telemetry {
    pub fn capture(session: &Session) -> Self {
        let vehicle = session.vehicle();
        let state = vehicle.state();
        Self {
            tick: session.tick_count(),
            x: state.position().x,
            y: state.position().y,
            speed: state.velocity().abs(),
            heading: normalize_degrees(state.heading()),
            distance: state.distance_traveled(),
            sensors: state.sensor_readings().iter().map(|&d| d as u32).collect(),
            normalized_sensors: vehicle.normalized_sensors(),
            alive: state.is_alive(),
            phase: state.phase(),
            show_contour: session.show_contour(),
        }
    }

    /// Status label shown on the HUD
    pub fn status(&self) -> &'static str {
        if self.alive { "ON TRACK" } else { "OFF TRACK" }
    }
}
