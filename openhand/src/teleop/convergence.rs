use crate::ActuatorStatus;

/// A move is complete once the present position is within `threshold` ticks
/// of the goal. Pure and total.
pub fn converged(goal: i32, present: i32, threshold: i32) -> bool {
    (goal - present).abs() <= threshold
}

impl ActuatorStatus {
    pub fn converged(&self, threshold: i32) -> bool {
        converged(self.goal_position, self.present_position, threshold)
    }
}
