//! Raw analog readings to actuator goal positions.
//!
//! Finger axes arrive in 0.0-2.5 and scale onto 0-2000 encoder ticks. The
//! spread axis arrives in 0.0-3.14 and is inverted across the full 0-4095
//! range because of the spread gearing.

use serde::{Deserialize, Serialize};

use crate::{
    HandError, DXL_FULL_RANGE_POSITION_VALUE, DXL_MAXIMUM_POSITION_VALUE,
    DXL_MINIMUM_POSITION_VALUE,
};

const FINGER_SCALE: f64 = 2000.0 / 2.5;
const SPREAD_SCALE: f64 = 4095.0 / 3.14;

/// Whether a channel flexes a finger or drives the lateral spread.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisKind {
    Finger,
    Spread,
}

impl AxisKind {
    /// Safe goal-position bounds for this axis.
    pub fn bounds(&self) -> (i32, i32) {
        match self {
            AxisKind::Finger => (DXL_MINIMUM_POSITION_VALUE, DXL_MAXIMUM_POSITION_VALUE),
            AxisKind::Spread => (0, DXL_FULL_RANGE_POSITION_VALUE),
        }
    }
}

/// What to do with a mapped goal outside the safe bounds. `Clamp` is the
/// default: out-of-range goals move physical hardware, so pinning them to
/// the boundary beats refusing mid-grasp.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClampPolicy {
    Clamp,
    Reject,
}

impl Default for ClampPolicy {
    fn default() -> Self {
        ClampPolicy::Clamp
    }
}

/// Raw finger reading to encoder ticks, unbounded.
pub fn map_finger(raw: f64) -> i32 {
    (raw * FINGER_SCALE).round() as i32
}

/// Encoder ticks back to a raw finger reading; inverse of [`map_finger`]
/// up to rounding.
pub fn inverse_map_finger(goal: i32) -> f64 {
    goal as f64 / FINGER_SCALE
}

/// Raw spread reading to encoder ticks, inverted, unbounded.
pub fn map_spread(raw: f64) -> i32 {
    DXL_FULL_RANGE_POSITION_VALUE - (raw * SPREAD_SCALE).round() as i32
}

/// Maps one axis reading to a dispatchable goal, applying the clamp policy
/// against the axis's safe bounds.
pub fn map_axis(kind: AxisKind, raw: f64, policy: ClampPolicy) -> Result<i32, HandError> {
    if !raw.is_finite() {
        return Err(HandError::Communication(format!("non-finite axis reading {}", raw)));
    }
    let goal = match kind {
        AxisKind::Finger => map_finger(raw),
        AxisKind::Spread => map_spread(raw),
    };
    let (min, max) = kind.bounds();
    if goal < min || goal > max {
        return match policy {
            ClampPolicy::Clamp => Ok(goal.clamp(min, max)),
            ClampPolicy::Reject => Err(HandError::OutOfRange { value: goal, min, max }),
        };
    }
    Ok(goal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finger_mapping_round_trips_within_rounding_tolerance() {
        let mut raw = 0.0;
        while raw <= 2.5 {
            let recovered = inverse_map_finger(map_finger(raw));
            assert!(
                (recovered - raw).abs() <= 0.5 / FINGER_SCALE + 1e-12,
                "raw {} recovered as {}",
                raw,
                recovered
            );
            raw += 0.01;
        }
    }

    #[test]
    fn spread_mapping_is_monotonically_decreasing() {
        let mut prev = map_spread(0.0);
        let mut raw = 0.05;
        while raw <= 3.14 {
            let goal = map_spread(raw);
            assert!(goal <= prev, "spread goal rose from {} to {} at raw {}", prev, goal, raw);
            prev = goal;
            raw += 0.05;
        }
    }

    #[test]
    fn spread_endpoints_cover_the_inverted_range() {
        assert_eq!(map_spread(0.0), 4095);
        assert_eq!(map_spread(3.14), 0);
    }

    #[test]
    fn clamp_policy_pins_goals_to_the_safe_bounds() {
        // Raw 0.0 maps below the finger minimum; clamp pins it at 100.
        assert_eq!(map_axis(AxisKind::Finger, 0.0, ClampPolicy::Clamp).unwrap(), 100);
        assert_eq!(map_axis(AxisKind::Finger, 2.5, ClampPolicy::Clamp).unwrap(), 2000);
        assert_eq!(map_axis(AxisKind::Finger, 6.0, ClampPolicy::Clamp).unwrap(), 4000);
    }

    #[test]
    fn reject_policy_fails_out_of_range_goals() {
        let err = map_axis(AxisKind::Finger, 6.0, ClampPolicy::Reject).unwrap_err();
        assert_eq!(err, HandError::OutOfRange { value: 4800, min: 100, max: 4000 });

        assert_eq!(map_axis(AxisKind::Finger, 1.0, ClampPolicy::Reject).unwrap(), 800);
    }

    #[test]
    fn non_finite_reading_is_a_communication_error() {
        assert!(matches!(
            map_axis(AxisKind::Spread, f64::NAN, ClampPolicy::Clamp),
            Err(HandError::Communication(_))
        ));
    }
}
