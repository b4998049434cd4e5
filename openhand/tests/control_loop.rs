/// Control-loop behaviour against fake bus and input devices: convergence,
/// bounded stall detection, communication-error escalation, and teardown on
/// the cancellation path.
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use openhand::drivers::{AnalogInput, ChannelConfig, ServoBus, TeleopConfig};
use openhand::teleop::{ClampPolicy, ControlLoop, LoopState};
use openhand::HandError;

/// Shared journal of everything the loop did to the hardware.
#[derive(Debug, Default)]
struct BusLog {
    goals: Vec<(u8, i32)>,
    present_reads: Vec<u8>,
    torque_enabled: Vec<u8>,
    torque_disabled: Vec<u8>,
}

/// Servo bus fake: every goal write lands instantly unless the servo is
/// marked stuck or failing.
struct FakeBus {
    positions: HashMap<u8, i32>,
    stuck: Option<u8>,
    fail_reads: bool,
    log: Rc<RefCell<BusLog>>,
}

impl FakeBus {
    fn new(ids: &[u8], log: Rc<RefCell<BusLog>>) -> Self {
        Self {
            positions: ids.iter().map(|id| (*id, 0)).collect(),
            stuck: None,
            fail_reads: false,
            log,
        }
    }
}

impl ServoBus for FakeBus {
    fn write_goal(&mut self, id: u8, value: i32) -> Result<(), HandError> {
        self.log.borrow_mut().goals.push((id, value));
        if self.stuck != Some(id) {
            self.positions.insert(id, value);
        }
        Ok(())
    }

    fn read_present(&mut self, id: u8) -> Result<i32, HandError> {
        if self.fail_reads {
            return Err(HandError::Communication("fake bus unplugged".to_string()));
        }
        self.log.borrow_mut().present_reads.push(id);
        Ok(*self.positions.get(&id).unwrap_or(&0))
    }

    fn enable_torque(&mut self, id: u8) -> Result<(), HandError> {
        self.log.borrow_mut().torque_enabled.push(id);
        Ok(())
    }

    fn disable_torque(&mut self, id: u8) -> Result<(), HandError> {
        self.log.borrow_mut().torque_disabled.push(id);
        Ok(())
    }
}

/// Analog input fake: replays frames, then trips the cancellation token once
/// the script is exhausted, the way a keypress would stop the real rig.
/// Earlier cycles run with the token clear, so their convergence waits poll
/// for real.
struct ScriptedGlove {
    frames: Vec<Vec<f64>>,
    next: usize,
    cancel: Arc<AtomicBool>,
}

impl ScriptedGlove {
    fn new(frames: Vec<Vec<f64>>, cancel: Arc<AtomicBool>) -> Self {
        Self { frames, next: 0, cancel }
    }
}

impl AnalogInput for ScriptedGlove {
    fn read_frame(&mut self) -> Result<Vec<f64>, HandError> {
        let frame = self
            .frames
            .get(self.next)
            .cloned()
            .ok_or_else(|| HandError::Communication("no more frames".to_string()))?;
        self.next += 1;
        if self.next >= self.frames.len() {
            self.cancel.store(true, Ordering::SeqCst);
        }
        Ok(frame)
    }
}

fn test_config() -> TeleopConfig {
    TeleopConfig {
        channels: vec![
            ChannelConfig::finger(2, 0),
            ChannelConfig::finger(4, 1),
            ChannelConfig::finger(1, 2),
            ChannelConfig::spread(3, 3),
        ],
        clamp_policy: ClampPolicy::Clamp,
        poll_interval_ms: 0,
        max_poll_cycles: 5,
        max_consecutive_comm_errors: 3,
        ..TeleopConfig::default()
    }
}

#[test]
fn frames_are_mapped_dispatched_and_converge() {
    let cancel = Arc::new(AtomicBool::new(false));
    let log = Rc::new(RefCell::new(BusLog::default()));
    let bus = FakeBus::new(&[1, 2, 3, 4], log.clone());
    // Two frames: the first cycle runs with the token clear, so its
    // convergence wait polls every servo to within threshold before the
    // second cycle dispatches.
    let glove = ScriptedGlove::new(
        vec![vec![1.0, 1.25, 2.5, 1.57], vec![2.0, 1.0, 1.5, 0.785]],
        cancel.clone(),
    );

    ControlLoop::new(bus, glove, test_config(), cancel).run().unwrap();

    let log = log.borrow();
    // Torque lifecycle covered every servo once.
    assert_eq!(log.torque_enabled, vec![2, 4, 1, 3]);
    assert_eq!(log.torque_disabled, vec![2, 4, 1, 3]);
    // Mapped goals per cycle: fingers raw * 800, spread inverted.
    assert_eq!(
        log.goals,
        vec![
            (2, 800),
            (4, 1000),
            (1, 2000),
            (3, 4095 - (1.57f64 * (4095.0 / 3.14)).round() as i32),
            (2, 1600),
            (4, 800),
            (1, 1200),
            (3, 4095 - (0.785f64 * (4095.0 / 3.14)).round() as i32),
        ]
    );
    // Present positions were read at startup and again by the first cycle's
    // convergence wait, which found every servo on goal in one poll. The
    // second cycle was cancelled before polling.
    assert_eq!(log.present_reads, vec![2, 4, 1, 3, 2, 4, 1, 3]);
}

#[test]
fn stuck_servo_is_reported_after_the_poll_budget() {
    let cancel = Arc::new(AtomicBool::new(false));
    let log = Rc::new(RefCell::new(BusLog::default()));
    let mut bus = FakeBus::new(&[1, 2, 3, 4], log.clone());
    bus.stuck = Some(4);
    let glove = ScriptedGlove::new(vec![vec![1.0, 1.25, 2.5, 1.57]; 3], cancel.clone());

    let err = ControlLoop::new(bus, glove, test_config(), cancel).run().unwrap_err();
    assert_eq!(err, HandError::Stalled { id: 4 });

    // Torque still released on the error path.
    assert_eq!(log.borrow().torque_disabled, vec![2, 4, 1, 3]);
}

#[test]
fn consecutive_comm_errors_escalate_to_a_fatal_stop() {
    let cancel = Arc::new(AtomicBool::new(false));
    let log = Rc::new(RefCell::new(BusLog::default()));
    let bus = FakeBus::new(&[1, 2, 3, 4], log.clone());

    // Glove that always fails; never trips the cancellation token itself.
    struct DeadGlove;
    impl AnalogInput for DeadGlove {
        fn read_frame(&mut self) -> Result<Vec<f64>, HandError> {
            Err(HandError::Communication("line noise".to_string()))
        }
    }

    let err = ControlLoop::new(bus, DeadGlove, test_config(), cancel).run().unwrap_err();
    match err {
        HandError::Communication(msg) => assert!(msg.contains("consecutive")),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(log.borrow().torque_disabled, vec![2, 4, 1, 3]);
}

#[test]
fn short_frame_is_a_cycle_error_not_a_panic() {
    let cancel = Arc::new(AtomicBool::new(false));
    let log = Rc::new(RefCell::new(BusLog::default()));
    let bus = FakeBus::new(&[1, 2, 3, 4], log.clone());
    // Three axes where four channels are configured, repeated until the
    // error budget runs out.
    let glove = ScriptedGlove::new(vec![vec![1.0, 1.0, 1.0]; 100], cancel.clone());

    let err = ControlLoop::new(bus, glove, test_config(), cancel).run().unwrap_err();
    assert!(matches!(err, HandError::Communication(_)));
    assert_eq!(log.borrow().torque_disabled, vec![2, 4, 1, 3]);
}

#[test]
fn reset_returns_fingers_to_open_and_spread_to_full_range() {
    let cancel = Arc::new(AtomicBool::new(false));
    let log = Rc::new(RefCell::new(BusLog::default()));
    let bus = FakeBus::new(&[1, 2, 3, 4], log.clone());
    let glove = ScriptedGlove::new(vec![], cancel.clone());

    let mut control = ControlLoop::new(bus, glove, test_config(), cancel);
    assert_eq!(control.state(), LoopState::PortOpen);
    control.reset_hand().unwrap();

    assert_eq!(
        log.borrow().goals,
        vec![(2, 0), (4, 0), (1, 0), (3, 4095)]
    );
}

#[test]
fn reject_policy_stops_the_loop_on_an_out_of_range_goal() {
    let cancel = Arc::new(AtomicBool::new(false));
    let log = Rc::new(RefCell::new(BusLog::default()));
    let bus = FakeBus::new(&[1, 2, 3, 4], log.clone());
    let glove = ScriptedGlove::new(vec![vec![6.0, 1.0, 1.0, 1.0]; 2], cancel.clone());

    let config = TeleopConfig { clamp_policy: ClampPolicy::Reject, ..test_config() };
    let err = ControlLoop::new(bus, glove, config, cancel).run().unwrap_err();
    assert_eq!(err, HandError::OutOfRange { value: 4800, min: 100, max: 4000 });
    assert_eq!(log.borrow().torque_disabled, vec![2, 4, 1, 3]);
}
