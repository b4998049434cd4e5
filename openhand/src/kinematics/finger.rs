use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::{FingerKinematics, HandError, JointSample, Link};

use super::{distance, link_angle, SignMode};

/// Enumerated finger identifier. The rig tracks the two opposing fingers of
/// the hand; each carries its own origin and sign convention.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finger {
    One,
    Two,
}

impl Finger {
    /// Fixed per-finger configuration record, replacing branch-per-finger
    /// code paths with data.
    pub fn config(&self) -> FingerConfig {
        match self {
            Finger::One => FingerConfig {
                origin: Point2::new(0.024, 0.06),
                sign_mode: SignMode::Absolute,
            },
            Finger::Two => FingerConfig {
                origin: Point2::new(0.05, 0.06),
                sign_mode: SignMode::Signed,
            },
        }
    }
}

/// Where a finger's proximal link is anchored on the hand base, and which
/// sign convention its angles use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FingerConfig {
    pub origin: Point2<f64>,
    pub sign_mode: SignMode,
}

impl FingerConfig {
    /// Derives the two-link state for a single capture sample.
    pub fn solve(&self, sample: &JointSample, index: usize) -> Result<FingerKinematics, HandError> {
        if !sample.is_finite() {
            return Err(HandError::NonFiniteSample { index });
        }

        let proximal_length = distance(&sample.proximal, &self.origin);
        let distal_length = distance(&sample.distal, &sample.proximal);

        let proximal_angle = link_angle(
            sample.proximal.x - self.origin.x,
            proximal_length,
            self.sign_mode,
            Link::Proximal,
            index,
        )?;
        let distal_angle = link_angle(
            sample.distal.x - sample.proximal.x,
            distal_length,
            self.sign_mode,
            Link::Distal,
            index,
        )?;

        Ok(FingerKinematics {
            proximal_length,
            distal_length,
            proximal_angle,
            distal_angle,
        })
    }

    /// Derives the full kinematics sequence for an ordered capture. Output
    /// has the same length and order as the input; nothing is filtered.
    pub fn solve_sequence(&self, samples: &[JointSample]) -> Result<Vec<FingerKinematics>, HandError> {
        samples
            .iter()
            .enumerate()
            .map(|(index, sample)| self.solve(sample, index))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lengths_are_non_negative_for_valid_samples() {
        let config = Finger::One.config();
        let samples = vec![
            JointSample::new(0.03, 0.07, 0.04, 0.09),
            JointSample::new(0.031, 0.071, 0.041, 0.091),
        ];
        let kin = config.solve_sequence(&samples).unwrap();
        assert_eq!(kin.len(), samples.len());
        for k in &kin {
            assert!(k.proximal_length >= 0.0);
            assert!(k.distal_length >= 0.0);
            assert!(k.proximal_angle.is_finite());
            assert!(k.distal_angle.is_finite());
        }
    }

    #[test]
    fn finger_configs_differ_in_origin_and_sign() {
        let one = Finger::One.config();
        let two = Finger::Two.config();
        assert_eq!(one.origin, Point2::new(0.024, 0.06));
        assert_eq!(two.origin, Point2::new(0.05, 0.06));
        assert_eq!(one.sign_mode, SignMode::Absolute);
        assert_eq!(two.sign_mode, SignMode::Signed);
    }

    #[test]
    fn sign_convention_changes_the_proximal_angle() {
        // Marker left of the finger-2 origin: signed dx is negative, so the
        // angle opens past pi/2; under finger 1's convention it would not.
        let sample = JointSample::new(0.04, 0.08, 0.045, 0.1);
        let two = Finger::Two.config().solve(&sample, 0).unwrap();
        assert!(two.proximal_angle > std::f64::consts::FRAC_PI_2);
    }

    #[test]
    fn non_finite_sample_is_rejected_with_its_index() {
        let config = Finger::Two.config();
        let samples = vec![
            JointSample::new(0.06, 0.07, 0.05, 0.09),
            JointSample::new(f64::NAN, 0.07, 0.05, 0.09),
        ];
        let err = config.solve_sequence(&samples).unwrap_err();
        assert_eq!(err, HandError::NonFiniteSample { index: 1 });
    }

    #[test]
    fn marker_on_origin_is_a_degenerate_proximal_link() {
        let config = Finger::One.config();
        let sample = JointSample::new(0.024, 0.06, 0.04, 0.09);
        let err = config.solve(&sample, 3).unwrap_err();
        assert_eq!(err, HandError::DegenerateLink { link: Link::Proximal, index: 3 });
    }
}
