//! Vehicle simulation
//!
//! Single-threaded and frame-driven: one `step` per rendered frame, no
//! suspension points. The drivable mask is read-only once built.

pub mod sensors;
pub mod session;
pub mod state;
pub mod tick;

pub use sensors::{cast_ray, normalize_readings, sense, sense_into};
pub use session::Session;
pub use state::{CrashCause, VehiclePhase, VehiclePose, VehicleState};
pub use tick::{TickInput, VehicleDynamics};
