use std::f64::consts::PI;

use nalgebra::Point2;

use crate::{FingerKinematics, JointSample};

use super::FingerConfig;

/// Half the base separation of the unit-link visualisation; finger bases sit
/// at x = -BASE_HALF_SPAN and x = +BASE_HALF_SPAN.
pub const BASE_HALF_SPAN: f64 = 1.0;

/// Polyline of one rendered finger: base, proximal tip, distal tip.
pub type FingerPolyline = [Point2<f64>; 3];

/// A displayable two-finger grasp pose reconstructed from joint angles.
///
/// Link lengths here are normalised to 1 and the base span is fixed; they do
/// not match the physical lengths recovered from the capture. That mismatch
/// is inherited from the original rig display and is intentional.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraspPose {
    pub base: [Point2<f64>; 2],
    pub finger1: FingerPolyline,
    pub finger2: FingerPolyline,
}

/// Standard two-link forward kinematics with the fingers mirrored about the
/// base centreline: finger 1 angles are measured from pi minus the joint
/// angle, finger 2 angles directly.
pub fn grasp_pose(finger1: &FingerKinematics, finger2: &FingerKinematics) -> GraspPose {
    let f1 = chain(-BASE_HALF_SPAN, PI - finger1.proximal_angle, PI - finger1.distal_angle);
    let f2 = chain(BASE_HALF_SPAN, finger2.proximal_angle, finger2.distal_angle);

    GraspPose {
        base: [
            Point2::new(-BASE_HALF_SPAN, 0.0),
            Point2::new(BASE_HALF_SPAN, 0.0),
        ],
        finger1: f1,
        finger2: f2,
    }
}

fn chain(base_x: f64, proximal: f64, distal: f64) -> FingerPolyline {
    let base = Point2::new(base_x, 0.0);
    let knuckle = Point2::new(base.x + proximal.cos(), base.y + proximal.sin());
    let tip = Point2::new(knuckle.x + distal.cos(), knuckle.y + distal.sin());
    [base, knuckle, tip]
}

/// Raw-capture polyline for one finger at one sample: anchor origin,
/// proximal marker, distal marker, in physical metres. Used by the raw
/// grasp-position overlay figure.
pub fn raw_polyline(config: &FingerConfig, sample: &JointSample) -> FingerPolyline {
    [config.origin, sample.proximal, sample.distal]
}
