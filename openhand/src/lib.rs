use nalgebra::Point2;
use serde::{Deserialize, Serialize};

pub mod drivers;

pub mod kinematics;
pub mod protocol;
pub mod recording;
pub mod teleop;
pub mod errors;
pub use errors::*;

/// One time-step of raw motion-capture marker coordinates for a single
/// finger, in metres. Captured once per recording row and never mutated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointSample {
    /// Proximal marker position in the capture X/Z plane.
    pub proximal: Point2<f64>,
    /// Distal marker position in the capture X/Z plane.
    pub distal: Point2<f64>,
}

impl JointSample {
    pub fn new(px: f64, pz: f64, dx: f64, dz: f64) -> Self {
        Self {
            proximal: Point2::new(px, pz),
            distal: Point2::new(dx, dz),
        }
    }

    /// All four coordinates are finite (no NaN/inf from a bad capture row).
    pub fn is_finite(&self) -> bool {
        self.proximal.x.is_finite()
            && self.proximal.y.is_finite()
            && self.distal.x.is_finite()
            && self.distal.y.is_finite()
    }
}

/// Derived two-link state for one finger at one time-step. Lengths are in
/// metres, angles in radians; immutable once computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FingerKinematics {
    pub proximal_length: f64,
    pub distal_length: f64,
    pub proximal_angle: f64,
    pub distal_angle: f64,
}

/// Integer goal position for one actuator channel.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuatorCommand {
    pub id: u8,
    pub goal_position: i32,
}

/// Transient per-poll snapshot of one actuator; re-read every cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuatorStatus {
    pub id: u8,
    pub goal_position: i32,
    pub present_position: i32,
}

/// Lower bound of the movable finger range; the servo ignores goals below it.
pub const DXL_MINIMUM_POSITION_VALUE: i32 = 100;
/// Upper bound of the movable finger range.
pub const DXL_MAXIMUM_POSITION_VALUE: i32 = 4000;
/// Full encoder range used by the (inverted) spread axis.
pub const DXL_FULL_RANGE_POSITION_VALUE: i32 = 4095;
