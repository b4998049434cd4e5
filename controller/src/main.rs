//! Online teleoperation: streams slide-potentiometer frames from the glove
//! box to the hand's servos until Ctrl-C, then releases torque and exits.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use openhand::drivers::{DynamixelBus, SlideGlove, TeleopConfig};
use openhand::teleop::ControlLoop;
use openhand::HandError;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run() {
        error!("controller failed: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), HandError> {
    // Optional single argument: a JSON rig config overriding the defaults.
    let config = match std::env::args().nth(1) {
        Some(path) => {
            TeleopConfig::load(std::path::Path::new(&path)).map_err(HandError::Config)?
        }
        None => TeleopConfig::default(),
    };
    config.validate().map_err(HandError::Config)?;

    let cancel = Arc::new(AtomicBool::new(false));
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || {
        handler_token.store(true, Ordering::SeqCst);
    })
    .map_err(|e| HandError::Config(format!("cannot install Ctrl-C handler: {}", e)))?;

    let bus = DynamixelBus::open(
        &config.bus_path,
        config.bus_baud_rate,
        Duration::from_millis(config.bus_timeout_ms),
    )?;
    let glove = SlideGlove::open(
        &config.input_path,
        config.input_baud_rate,
        Duration::from_millis(config.input_timeout_ms),
    )?;
    info!(
        bus = %config.bus_path,
        input = %config.input_path,
        channels = config.channels.len(),
        "teleoperation starting, Ctrl-C to stop"
    );

    ControlLoop::new(bus, glove, config, cancel).run()
}
