use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::drivers::{AnalogInput, ChannelConfig, ServoBus, TeleopConfig};
use crate::teleop::{converged, map_axis};
use crate::{ActuatorCommand, HandError, DXL_FULL_RANGE_POSITION_VALUE};

/// Lifecycle of one controller run. Polling repeats until the cancellation
/// token flips or an error escalates; torque disable and port release run on
/// every exit path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    PortOpen,
    TorqueEnabled,
    Polling,
    TorqueDisabled,
    PortClosed,
}

/// The online teleoperation loop: glove frame in, servo goals out, bounded
/// convergence wait per dispatch. Generic over the bus and input capability
/// traits so the whole loop runs against fakes in tests.
pub struct ControlLoop<B: ServoBus, A: AnalogInput> {
    bus: B,
    input: A,
    config: TeleopConfig,
    cancel: Arc<AtomicBool>,
    state: LoopState,
}

impl<B: ServoBus, A: AnalogInput> ControlLoop<B, A> {
    /// Takes exclusive ownership of both device handles for the lifetime of
    /// the loop; they are released when `run` returns.
    pub fn new(bus: B, input: A, config: TeleopConfig, cancel: Arc<AtomicBool>) -> Self {
        Self { bus, input, config, cancel, state: LoopState::PortOpen }
    }

    /// Runs the controller until cancellation or a fatal error. The shutdown
    /// path (torque off, ports dropped) runs regardless of how the polling
    /// phase ended.
    pub fn run(mut self) -> Result<(), HandError> {
        self.config.validate().map_err(HandError::Config)?;

        let result = self.startup().and_then(|_| self.poll_until_cancelled());
        self.shutdown();

        match &result {
            Ok(()) => info!("controller stopped on request"),
            Err(e) => error!("controller stopped: {}", e),
        }
        result
    }

    fn startup(&mut self) -> Result<(), HandError> {
        // Report where the hand is resting before torque goes on.
        for channel in &self.config.channels {
            let present = self.bus.read_present(channel.servo_id)?;
            info!("[ID:{:03}] PresPos:{:03}", channel.servo_id, present);
        }

        for channel in &self.config.channels {
            self.bus.enable_torque(channel.servo_id)?;
            debug!(id = channel.servo_id, "torque enabled");
        }
        self.state = LoopState::TorqueEnabled;
        Ok(())
    }

    fn poll_until_cancelled(&mut self) -> Result<(), HandError> {
        self.state = LoopState::Polling;
        let mut consecutive_comm_errors = 0u32;

        while !self.cancel.load(Ordering::SeqCst) {
            match self.run_cycle() {
                Ok(()) => consecutive_comm_errors = 0,
                Err(HandError::Communication(msg)) => {
                    consecutive_comm_errors += 1;
                    warn!(
                        "cycle communication error ({}/{}): {}",
                        consecutive_comm_errors, self.config.max_consecutive_comm_errors, msg
                    );
                    if consecutive_comm_errors >= self.config.max_consecutive_comm_errors {
                        return Err(HandError::Communication(format!(
                            "{} consecutive cycle failures, last: {}",
                            consecutive_comm_errors, msg
                        )));
                    }
                }
                Err(other) => return Err(other),
            }
        }
        Ok(())
    }

    /// One polling cycle: read input -> map -> dispatch -> await convergence.
    fn run_cycle(&mut self) -> Result<(), HandError> {
        let frame = self.input.read_frame()?;
        debug!(?frame, "input frame");

        let commands = self.map_frame(&frame)?;
        for command in &commands {
            info!("[ID:{:03}] GoalPos:{:03}", command.id, command.goal_position);
            self.bus.write_goal(command.id, command.goal_position)?;
        }

        self.await_convergence(&commands)
    }

    fn map_frame(&self, frame: &[f64]) -> Result<Vec<ActuatorCommand>, HandError> {
        self.config
            .channels
            .iter()
            .map(|channel| {
                let raw = frame.get(channel.axis).copied().ok_or_else(|| {
                    HandError::Communication(format!(
                        "input frame has {} axes, channel for servo {} expects axis {}",
                        frame.len(),
                        channel.servo_id,
                        channel.axis
                    ))
                })?;
                let goal = map_axis(channel.kind, raw, self.config.clamp_policy)?;
                Ok(ActuatorCommand { id: channel.servo_id, goal_position: goal })
            })
            .collect()
    }

    /// Polls present positions until every channel is within its threshold.
    /// The wait is bounded: a servo that is still out after the configured
    /// poll budget is reported as stalled instead of blocking forever.
    fn await_convergence(&mut self, commands: &[ActuatorCommand]) -> Result<(), HandError> {
        let mut pending: Vec<(&ChannelConfig, &ActuatorCommand)> = self
            .config
            .channels
            .iter()
            .zip(commands.iter())
            .collect();

        for _cycle in 0..self.config.max_poll_cycles {
            if self.cancel.load(Ordering::SeqCst) {
                return Ok(());
            }

            let mut still_moving = Vec::new();
            for (channel, command) in pending {
                let present = self.bus.read_present(command.id)?;
                info!(
                    "[ID:{:03}] GoalPos:{:03}  PresPos:{:03}",
                    command.id, command.goal_position, present
                );
                if !converged(command.goal_position, present, channel.threshold) {
                    still_moving.push((channel, command));
                }
            }

            if still_moving.is_empty() {
                return Ok(());
            }
            pending = still_moving;
            thread::sleep(Duration::from_millis(self.config.poll_interval_ms));
        }

        Err(HandError::Stalled { id: pending[0].1.id })
    }

    /// Returns every finger to its open position and the spread to zero.
    pub fn reset_hand(&mut self) -> Result<(), HandError> {
        for channel in self.config.channels.clone() {
            let goal = match channel.kind {
                crate::teleop::AxisKind::Finger => 0,
                crate::teleop::AxisKind::Spread => DXL_FULL_RANGE_POSITION_VALUE,
            };
            self.bus.write_goal(channel.servo_id, goal)?;
        }
        Ok(())
    }

    /// Best-effort teardown; failures are logged, not propagated, so a dead
    /// servo cannot keep the others energised.
    fn shutdown(&mut self) {
        for channel in &self.config.channels {
            if let Err(e) = self.bus.disable_torque(channel.servo_id) {
                warn!(id = channel.servo_id, "torque disable failed: {}", e);
            }
        }
        self.state = LoopState::TorqueDisabled;
        debug!("bus and input handles released");
        self.state = LoopState::PortClosed;
    }

    pub fn state(&self) -> LoopState {
        self.state
    }
}
