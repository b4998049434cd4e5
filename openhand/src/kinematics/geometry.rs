use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::{HandError, Link};

/// Sign convention applied to the horizontal displacement before the arccos.
///
/// The left finger measures its angles from the magnitude of the displacement,
/// the right finger keeps the sign. Carried in each finger's configuration so
/// the angle computation itself has a single code path.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignMode {
    Absolute,
    Signed,
}

impl SignMode {
    fn apply(&self, dx: f64) -> f64 {
        match self {
            SignMode::Absolute => dx.abs(),
            SignMode::Signed => dx,
        }
    }
}

/// Euclidean distance between two capture-plane points.
pub fn distance(p: &Point2<f64>, q: &Point2<f64>) -> f64 {
    (p - q).norm()
}

/// Angle of a rigid link from its horizontal displacement and length,
/// `arccos(dx / length)`, in [0, pi].
///
/// A zero-length link has no defined angle and is rejected; the ratio is
/// clamped to [-1, 1] so float noise at full extension cannot produce NaN.
pub fn link_angle(dx: f64, length: f64, mode: SignMode, link: Link, index: usize) -> Result<f64, HandError> {
    if !dx.is_finite() || !length.is_finite() {
        return Err(HandError::NonFiniteSample { index });
    }
    if length == 0.0 {
        return Err(HandError::DegenerateLink { link, index });
    }
    let ratio = (mode.apply(dx) / length).clamp(-1.0, 1.0);
    Ok(ratio.acos())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn distance_is_euclidean() {
        let p = Point2::new(0.0, 0.0);
        let q = Point2::new(3.0, 4.0);
        assert!((distance(&p, &q) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn link_angle_stays_in_valid_range() {
        for &(dx, len) in &[(0.5, 1.0), (-0.5, 1.0), (1.0, 1.0), (-1.0, 1.0), (0.0, 2.0)] {
            let angle = link_angle(dx, len, SignMode::Signed, Link::Proximal, 0).unwrap();
            assert!((0.0..=PI).contains(&angle), "angle {} out of range", angle);
        }
    }

    #[test]
    fn absolute_mode_folds_negative_displacement() {
        let a = link_angle(-0.5, 1.0, SignMode::Absolute, Link::Proximal, 0).unwrap();
        let b = link_angle(0.5, 1.0, SignMode::Absolute, Link::Proximal, 0).unwrap();
        assert!((a - b).abs() < 1e-12);

        let signed = link_angle(-0.5, 1.0, SignMode::Signed, Link::Proximal, 0).unwrap();
        assert!(signed > b);
    }

    #[test]
    fn zero_length_link_is_rejected() {
        let err = link_angle(0.0, 0.0, SignMode::Signed, Link::Distal, 7).unwrap_err();
        assert_eq!(err, HandError::DegenerateLink { link: Link::Distal, index: 7 });
    }

    #[test]
    fn overextended_ratio_is_clamped_not_nan() {
        // |dx| marginally above length, as float noise produces at full extension.
        let angle = link_angle(1.0 + 1e-12, 1.0, SignMode::Signed, Link::Proximal, 0).unwrap();
        assert_eq!(angle, 0.0);
    }
}
