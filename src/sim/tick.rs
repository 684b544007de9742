//! Per-tick vehicle dynamics
//!
//! One call to [`VehicleDynamics::update`] advances the vehicle by one frame:
//! throttle, friction, speed-scaled steering, then a move that is either
//! committed or rejected against the drivable mask. Sensors are refreshed
//! from wherever the vehicle ends up.

use crate::cell_of;
use crate::error::Result;
use crate::settings::{PhysicsTuning, SensorConfig, SpawnPoint};
use crate::track::DrivableMask;

use super::sensors::{normalize_readings, sense_into};
use super::state::{CrashCause, VehiclePhase, VehiclePose, VehicleState};

/// Driver controls sampled once per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub accelerate: bool,
    pub brake: bool,
    pub steer_left: bool,
    pub steer_right: bool,
    /// Out-of-band: respawn instead of simulating this tick
    pub restart: bool,
}

/// Owns the vehicle state and the constants that drive it
#[derive(Debug, Clone)]
pub struct VehicleDynamics {
    physics: PhysicsTuning,
    sensors: SensorConfig,
    state: VehicleState,
}

impl VehicleDynamics {
    /// Vehicle at `spawn`, at rest, sensors at full range
    ///
    /// Fails with `InvalidConfig` for unusable physics constants or sensors.
    pub fn new(physics: PhysicsTuning, sensors: SensorConfig, spawn: SpawnPoint) -> Result<Self> {
        physics.validate()?;
        sensors.validate()?;
        let state = VehicleState::spawn(spawn.into(), sensors.idle_readings());
        Ok(Self {
            physics,
            sensors,
            state,
        })
    }

    pub fn state(&self) -> &VehicleState {
        &self.state
    }

    pub fn physics(&self) -> &PhysicsTuning {
        &self.physics
    }

    pub fn sensor_config(&self) -> &SensorConfig {
        &self.sensors
    }

    /// Sensor readings scaled to [0, 1]
    pub fn normalized_sensors(&self) -> Vec<f32> {
        normalize_readings(&self.state.sensor_readings, self.sensors.range)
    }

    /// Advance one tick; a crashed vehicle is left untouched
    pub fn update(&mut self, input: &TickInput, mask: &DrivableMask) {
        if let Some(next) = self.step(input, mask) {
            self.state = next;
        }
    }

    /// Put the vehicle back at `spawn`, at rest and alive
    pub fn reset(&mut self, spawn: SpawnPoint) {
        self.state = VehicleState::spawn(spawn.into(), self.sensors.idle_readings());
        log::info!("Vehicle reset to ({:.1}, {:.1})", spawn.x, spawn.y);
    }

    /// Next state for `input`, or `None` when crashed
    pub fn step(&self, input: &TickInput, mask: &DrivableMask) -> Option<VehicleState> {
        if !self.state.is_alive() {
            return None;
        }
        let p = &self.physics;
        let current = &self.state;

        // Throttle and brake, then clamp to the asymmetric speed window
        let mut velocity = current.velocity;
        if input.accelerate {
            velocity += p.accel;
        }
        if input.brake {
            velocity -= p.brake;
        }
        velocity = velocity.clamp(-p.reverse_max_speed, p.max_speed);

        // Rolling resistance applies every tick
        velocity *= p.friction;

        // Steering authority scales with speed; no pivoting in place
        let turn = (velocity.abs() / p.max_speed) * p.max_turn_rate;
        let mut heading = current.pose.heading;
        if input.steer_left {
            heading -= turn;
        }
        if input.steer_right {
            heading += turn;
        }

        let turned = VehiclePose {
            pos: current.pose.pos,
            heading,
        };
        let candidate = turned.pos + turned.forward() * velocity;
        let (cx, cy) = cell_of(candidate);

        let mut next = VehicleState {
            pose: turned,
            velocity,
            phase: VehiclePhase::Alive,
            distance_traveled: current.distance_traveled,
            sensor_readings: current.sensor_readings.clone(),
        };

        match mask.get(cx, cy) {
            Some(true) => {
                next.pose.pos = candidate;
                next.distance_traveled += velocity.abs();
            }
            Some(false) => {
                next.velocity *= p.crash_penalty;
                next.phase = VehiclePhase::Crashed(CrashCause::OffTrack);
                log::debug!("Vehicle left the track at cell ({cx}, {cy})");
            }
            None => {
                next.phase = VehiclePhase::Crashed(CrashCause::OutOfBounds);
                log::debug!("Vehicle left the grid at cell ({cx}, {cy})");
            }
        }

        sense_into(&next.pose, mask, &self.sensors, &mut next.sensor_readings);
        Some(next)
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut VehicleState {
        &mut self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SimError;
    use crate::consts::*;
    use proptest::prelude::*;

    fn spawn(x: f32, y: f32, heading: f32) -> SpawnPoint {
        SpawnPoint { x, y, heading }
    }

    fn open_field() -> DrivableMask {
        DrivableMask::filled(100, 100, true).unwrap()
    }

    fn accelerate() -> TickInput {
        TickInput {
            accelerate: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_single_accelerate_tick() {
        let sensors = SensorConfig {
            range: 40,
            ..Default::default()
        };
        let mut vehicle =
            VehicleDynamics::new(PhysicsTuning::default(), sensors, spawn(50.0, 50.0, 0.0))
                .unwrap();
        vehicle.update(&accelerate(), &open_field());

        let state = vehicle.state();
        let expected = ACCEL * FRICTION;
        assert!((state.velocity() - expected).abs() < 1e-6);
        assert!((state.position().x - (50.0 + expected)).abs() < 1e-5);
        assert!((state.position().y - 50.0).abs() < 1e-5);
        assert!(state.is_alive());
        assert!((state.distance_traveled() - expected).abs() < 1e-6);
        assert_eq!(state.sensor_readings(), &[40.0; 5]);
    }

    #[test]
    fn test_no_turn_at_zero_speed() {
        let mut vehicle = VehicleDynamics::new(
            PhysicsTuning::default(),
            SensorConfig::default(),
            spawn(50.0, 50.0, 30.0),
        )
        .unwrap();
        let input = TickInput {
            steer_left: true,
            ..Default::default()
        };
        vehicle.update(&input, &open_field());
        assert_eq!(vehicle.state().heading(), 30.0);
        let input = TickInput {
            steer_right: true,
            ..Default::default()
        };
        vehicle.update(&input, &open_field());
        assert_eq!(vehicle.state().heading(), 30.0);
    }

    #[test]
    fn test_turn_scales_with_speed() {
        let mask = open_field();
        let mut vehicle = VehicleDynamics::new(
            PhysicsTuning::default(),
            SensorConfig::default(),
            spawn(50.0, 50.0, 0.0),
        )
        .unwrap();
        vehicle.state_mut().velocity = MAX_SPEED;
        let input = TickInput {
            steer_right: true,
            ..Default::default()
        };
        vehicle.update(&input, &mask);
        // Friction is applied before the turn is computed
        let expected = FRICTION * MAX_TURN_RATE;
        assert!((vehicle.state().heading() - expected).abs() < 1e-5);
    }

    #[test]
    fn test_velocity_clamped() {
        let mask = open_field();
        let mut vehicle = VehicleDynamics::new(
            PhysicsTuning::default(),
            SensorConfig::default(),
            spawn(50.0, 50.0, 0.0),
        )
        .unwrap();
        vehicle.state_mut().velocity = MAX_SPEED;
        vehicle.update(&accelerate(), &mask);
        assert!((vehicle.state().velocity() - MAX_SPEED * FRICTION).abs() < 1e-6);

        vehicle.state_mut().velocity = -REVERSE_MAX_SPEED;
        let brake = TickInput {
            brake: true,
            ..Default::default()
        };
        vehicle.update(&brake, &mask);
        assert!((vehicle.state().velocity() + REVERSE_MAX_SPEED * FRICTION).abs() < 1e-6);
    }

    #[test]
    fn test_friction_decays_without_input() {
        let mask = open_field();
        let mut vehicle = VehicleDynamics::new(
            PhysicsTuning::default(),
            SensorConfig::default(),
            spawn(20.0, 50.0, 0.0),
        )
        .unwrap();
        vehicle.state_mut().velocity = 2.0;
        vehicle.update(&TickInput::default(), &mask);
        assert!((vehicle.state().velocity() - 2.0 * FRICTION).abs() < 1e-6);
    }

    #[test]
    fn test_reverse_moves_backwards() {
        let mut vehicle = VehicleDynamics::new(
            PhysicsTuning::default(),
            SensorConfig::default(),
            spawn(50.0, 50.0, 0.0),
        )
        .unwrap();
        let brake = TickInput {
            brake: true,
            ..Default::default()
        };
        vehicle.update(&brake, &open_field());
        assert!(vehicle.state().velocity() < 0.0);
        assert!(vehicle.state().position().x < 50.0);
        // Distance counts magnitude
        assert!(vehicle.state().distance_traveled() > 0.0);
    }

    #[test]
    fn test_crash_into_wall_on_exact_tick() {
        // Wall from x = 52 onward
        let mask = DrivableMask::from_fn(100, 100, |x, _| x < 52).unwrap();
        let mut vehicle = VehicleDynamics::new(
            PhysicsTuning::default(),
            SensorConfig::default(),
            spawn(51.5, 50.5, 0.0),
        )
        .unwrap();
        vehicle.state_mut().velocity = 1.0;
        vehicle.update(&TickInput::default(), &mask);

        let state = vehicle.state();
        assert_eq!(state.phase(), VehiclePhase::Crashed(CrashCause::OffTrack));
        assert_eq!(state.position().x, 51.5);
        assert_eq!(state.position().y, 50.5);
        assert!((state.velocity() - FRICTION * CRASH_PENALTY).abs() < 1e-6);
        assert_eq!(state.distance_traveled(), 0.0);
        // Sensors were refreshed from the held position
        assert_eq!(state.sensor_readings()[2], 1.0);
    }

    #[test]
    fn test_out_of_bounds_keeps_velocity() {
        let mask = DrivableMask::filled(10, 10, true).unwrap();
        let mut vehicle = VehicleDynamics::new(
            PhysicsTuning::default(),
            SensorConfig::default(),
            spawn(9.5, 5.0, 0.0),
        )
        .unwrap();
        vehicle.state_mut().velocity = 1.0;
        vehicle.update(&TickInput::default(), &mask);

        let state = vehicle.state();
        assert_eq!(state.phase(), VehiclePhase::Crashed(CrashCause::OutOfBounds));
        assert_eq!(state.position().x, 9.5);
        assert!((state.velocity() - FRICTION).abs() < 1e-6);
    }

    #[test]
    fn test_left_edge_fraction_stays_on_grid() {
        // x in (-1, 0) still belongs to column 0
        let mask = DrivableMask::filled(10, 10, true).unwrap();
        let mut vehicle = VehicleDynamics::new(
            PhysicsTuning::default(),
            SensorConfig::default(),
            spawn(0.5, 5.5, 180.0),
        )
        .unwrap();
        vehicle.state_mut().velocity = 0.9375;
        vehicle.update(&TickInput::default(), &mask);

        let state = vehicle.state();
        assert!(state.is_alive());
        assert!((state.position().x + 0.4).abs() < 1e-5);
        assert!((state.position().y - 5.5).abs() < 1e-5);

        // Next step lands at x < -1 and leaves the grid
        vehicle.update(&TickInput::default(), &mask);
        assert_eq!(
            vehicle.state().phase(),
            VehiclePhase::Crashed(CrashCause::OutOfBounds)
        );
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let start = spawn(50.0, 50.0, 0.0);
        let no_sensors = SensorConfig {
            angles: vec![],
            ..Default::default()
        };
        assert!(matches!(
            VehicleDynamics::new(PhysicsTuning::default(), no_sensors, start),
            Err(SimError::InvalidConfig(_))
        ));

        let zero_range = SensorConfig {
            range: 0,
            ..Default::default()
        };
        assert!(VehicleDynamics::new(PhysicsTuning::default(), zero_range, start).is_err());

        let backwards = PhysicsTuning {
            max_speed: -1.0,
            ..Default::default()
        };
        assert!(VehicleDynamics::new(backwards, SensorConfig::default(), start).is_err());
    }

    #[test]
    fn test_crashed_vehicle_is_frozen() {
        let mask = DrivableMask::from_fn(100, 100, |x, _| x < 52).unwrap();
        let mut vehicle = VehicleDynamics::new(
            PhysicsTuning::default(),
            SensorConfig::default(),
            spawn(51.5, 50.5, 0.0),
        )
        .unwrap();
        vehicle.state_mut().velocity = 1.0;
        vehicle.update(&TickInput::default(), &mask);
        let frozen = vehicle.state().clone();

        let input = TickInput {
            accelerate: true,
            steer_left: true,
            ..Default::default()
        };
        for _ in 0..10 {
            vehicle.update(&input, &mask);
        }
        assert_eq!(vehicle.state(), &frozen);
        assert!(vehicle.step(&input, &mask).is_none());
    }

    #[test]
    fn test_reset_restores_spawn() {
        let mask = DrivableMask::from_fn(100, 100, |x, _| x < 60).unwrap();
        let start = spawn(40.0, 50.0, 0.0);
        let mut vehicle =
            VehicleDynamics::new(PhysicsTuning::default(), SensorConfig::default(), start)
                .unwrap();

        let input = TickInput {
            accelerate: true,
            steer_right: true,
            ..Default::default()
        };
        for _ in 0..200 {
            vehicle.update(&input, &mask);
        }
        assert!(!vehicle.state().is_alive());

        vehicle.reset(start);
        let state = vehicle.state();
        assert_eq!(state.pose(), VehiclePose::new(40.0, 50.0, 0.0));
        assert_eq!(state.velocity(), 0.0);
        assert!(state.is_alive());
        assert_eq!(state.distance_traveled(), 0.0);
        assert_eq!(state.sensor_readings(), &[SENSOR_RANGE as f32; 5]);
    }

    #[test]
    fn test_normalized_sensors() {
        let vehicle = VehicleDynamics::new(
            PhysicsTuning::default(),
            SensorConfig::default(),
            spawn(50.0, 50.0, 0.0),
        )
        .unwrap();
        assert_eq!(vehicle.normalized_sensors(), vec![1.0; 5]);
    }

    #[test]
    fn test_step_does_not_mutate() {
        let vehicle = VehicleDynamics::new(
            PhysicsTuning::default(),
            SensorConfig::default(),
            spawn(50.0, 50.0, 0.0),
        )
        .unwrap();
        let before = vehicle.state().clone();
        let next = vehicle.step(&accelerate(), &open_field()).unwrap();
        assert_eq!(vehicle.state(), &before);
        assert!(next.velocity() > 0.0);
    }

    fn input_strategy() -> impl Strategy<Value = TickInput> {
        (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
            |(accelerate, brake, steer_left, steer_right)| TickInput {
                accelerate,
                brake,
                steer_left,
                steer_right,
                restart: false,
            },
        )
    }

    proptest! {
        #[test]
        fn prop_distance_monotonic_and_frozen_after_crash(
            inputs in prop::collection::vec(input_strategy(), 1..300),
        ) {
            // Ring track: drivable between radius 20 and 45 around (50, 50)
            let mask = DrivableMask::from_fn(100, 100, |x, y| {
                let dx = x as f32 - 50.0;
                let dy = y as f32 - 50.0;
                let r = (dx * dx + dy * dy).sqrt();
                (20.0..45.0).contains(&r)
            })
            .unwrap();
            let mut vehicle = VehicleDynamics::new(
                PhysicsTuning::default(),
                SensorConfig::default(),
                spawn(50.5, 18.5, 0.0),
            )
            .unwrap();

            let mut last_distance = 0.0;
            let mut crashed_at: Option<f32> = None;
            for input in &inputs {
                vehicle.update(input, &mask);
                let state = vehicle.state();
                prop_assert!(state.distance_traveled() >= last_distance);
                last_distance = state.distance_traveled();
                for &r in state.sensor_readings() {
                    prop_assert!(r > 0.0 && r <= SENSOR_RANGE as f32);
                }
                match crashed_at {
                    Some(d) => prop_assert_eq!(state.distance_traveled(), d),
                    None if !state.is_alive() => crashed_at = Some(state.distance_traveled()),
                    None => {}
                }
            }
        }
    }
}
