//! Distance sensors
//!
//! Each sensor marches a ray from the vehicle in unit-pixel steps and reports
//! the step at which it first meets off-track or out-of-grid terrain. A ray
//! that stays on track for its whole length reads the full range.

use crate::cell_of;
use crate::heading_vector;
use crate::settings::SensorConfig;
use crate::track::DrivableMask;

use super::state::VehiclePose;

/// Distance along a single ray, in `1..=range`
pub fn cast_ray(pose: &VehiclePose, offset: f32, mask: &DrivableMask, range: u32) -> f32 {
    let dir = heading_vector(pose.heading + offset);
    for d in 1..=range {
        let (cx, cy) = cell_of(pose.pos + dir * d as f32);
        if !mask.is_drivable(cx, cy) {
            return d as f32;
        }
    }
    range as f32
}

/// Fill `readings` with one distance per configured angle
pub fn sense_into(
    pose: &VehiclePose,
    mask: &DrivableMask,
    config: &SensorConfig,
    readings: &mut [f32],
) {
    debug_assert_eq!(readings.len(), config.angles.len());
    for (reading, &offset) in readings.iter_mut().zip(&config.angles) {
        *reading = cast_ray(pose, offset, mask, config.range);
    }
}

/// Readings for every configured angle, in configuration order
pub fn sense(pose: &VehiclePose, mask: &DrivableMask, config: &SensorConfig) -> Vec<f32> {
    let mut readings = vec![0.0; config.angles.len()];
    sense_into(pose, mask, config, &mut readings);
    readings
}

/// Readings scaled to [0, 1] by the sensor range
pub fn normalize_readings(readings: &[f32], range: u32) -> Vec<f32> {
    let range = range as f32;
    readings.iter().map(|d| d / range).collect()
}
