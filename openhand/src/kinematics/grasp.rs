use serde::{Deserialize, Serialize};

use crate::{FingerKinematics, HandError};

/// Named moments of a recorded grasp, used to group display output.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraspPhase {
    Setup,
    PreGrasp,
    Final,
}

impl GraspPhase {
    pub const ALL: [GraspPhase; 3] = [GraspPhase::Setup, GraspPhase::PreGrasp, GraspPhase::Final];

    /// Index of this phase within a sequence of length `n`, which must be at
    /// least 1; empty sequences are rejected by [`extract_phases`] before any
    /// index is taken. PreGrasp uses floor division, so even and odd
    /// sequences tie-break the same way the recordings were always indexed.
    pub fn index(&self, n: usize) -> usize {
        debug_assert!(n > 0, "phase index taken on an empty sequence");
        match self {
            GraspPhase::Setup => 0,
            GraspPhase::PreGrasp => n / 2,
            GraspPhase::Final => n.saturating_sub(1),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            GraspPhase::Setup => "Grasp Setup",
            GraspPhase::PreGrasp => "Pre-Grasp",
            GraspPhase::Final => "Final Grasp (Grasping Object)",
        }
    }
}

/// The three per-phase kinematics records selected from a full sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraspPhases {
    pub setup: FingerKinematics,
    pub pre_grasp: FingerKinematics,
    pub final_grasp: FingerKinematics,
}

impl GraspPhases {
    pub fn get(&self, phase: GraspPhase) -> &FingerKinematics {
        match phase {
            GraspPhase::Setup => &self.setup,
            GraspPhase::PreGrasp => &self.pre_grasp,
            GraspPhase::Final => &self.final_grasp,
        }
    }
}

/// Selects the Setup/PreGrasp/Final records from a kinematics sequence.
/// A single-sample sequence resolves all three phases to the same record.
pub fn extract_phases(sequence: &[FingerKinematics]) -> Result<GraspPhases, HandError> {
    if sequence.is_empty() {
        return Err(HandError::EmptySequence);
    }
    let n = sequence.len();
    Ok(GraspPhases {
        setup: sequence[GraspPhase::Setup.index(n)],
        pre_grasp: sequence[GraspPhase::PreGrasp.index(n)],
        final_grasp: sequence[GraspPhase::Final.index(n)],
    })
}
