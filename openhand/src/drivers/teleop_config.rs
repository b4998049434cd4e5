use serde::{Deserialize, Serialize};

use crate::teleop::{AxisKind, ClampPolicy};

/// One actuator channel: which glove axis feeds which servo, and how tight
/// its convergence check is.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfig {
    pub servo_id: u8,
    /// Index into the glove frame this channel is driven by.
    pub axis: usize,
    pub kind: AxisKind,
    /// Maximum |goal - present| at which the move counts as complete.
    pub threshold: i32,
}

impl ChannelConfig {
    pub fn finger(servo_id: u8, axis: usize) -> Self {
        Self { servo_id, axis, kind: AxisKind::Finger, threshold: 10 }
    }

    pub fn spread(servo_id: u8, axis: usize) -> Self {
        Self { servo_id, axis, kind: AxisKind::Spread, threshold: 50 }
    }
}

/// Everything the control loop needs at startup. Replaces the pile of global
/// constants the rig scripts grew: device paths, baud rates, channel map,
/// clamping policy, and the retry/timeout budgets.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TeleopConfig {
    /// Servo bus serial device.
    pub bus_path: String,
    pub bus_baud_rate: u32,
    pub bus_timeout_ms: u64,
    /// Analog input serial device.
    pub input_path: String,
    pub input_baud_rate: u32,
    pub input_timeout_ms: u64,
    pub channels: Vec<ChannelConfig>,
    pub clamp_policy: ClampPolicy,
    /// Delay between present-position polls of one convergence wait.
    pub poll_interval_ms: u64,
    /// Poll budget per dispatch before a servo is declared stalled.
    pub max_poll_cycles: u32,
    /// Consecutive per-cycle communication failures before the loop stops.
    pub max_consecutive_comm_errors: u32,
}

impl TeleopConfig {
    /// Loads a config from a JSON file; missing fields are an error, so a rig
    /// file always states its full channel map and budgets.
    pub fn load(path: &std::path::Path) -> Result<TeleopConfig, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read config {}: {}", path.display(), e))?;
        serde_json::from_str(&contents)
            .map_err(|e| format!("malformed config {}: {}", path.display(), e))
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.bus_path.is_empty() {
            return Err("Servo bus path cannot be empty.".to_string());
        }
        if self.input_path.is_empty() {
            return Err("Analog input path cannot be empty.".to_string());
        }
        if self.bus_baud_rate == 0 || self.input_baud_rate == 0 {
            return Err("Baud rates must be greater than 0.".to_string());
        }
        if self.channels.is_empty() {
            return Err("At least one actuator channel must be configured.".to_string());
        }
        if self.max_poll_cycles == 0 {
            return Err("Poll budget must be greater than 0.".to_string());
        }
        if self.max_consecutive_comm_errors == 0 {
            return Err("Communication error budget must be greater than 0.".to_string());
        }
        for channel in &self.channels {
            if channel.threshold <= 0 {
                return Err(format!(
                    "Servo {} has a non-positive convergence threshold.",
                    channel.servo_id
                ));
            }
        }
        Ok(())
    }
}

impl Default for TeleopConfig {
    fn default() -> Self {
        Self {
            bus_path: "/dev/ttyUSB0".to_string(),
            bus_baud_rate: 57600,
            bus_timeout_ms: 100,
            input_path: "/dev/ttyACM0".to_string(),
            input_baud_rate: 9600,
            input_timeout_ms: 1000,
            // Rig wiring: finger 1 (blue) ID 2, finger 3 (orange) ID 4,
            // finger 2 (yellow) ID 1, spread ID 3.
            channels: vec![
                ChannelConfig::finger(2, 0),
                ChannelConfig::finger(4, 1),
                ChannelConfig::finger(1, 2),
                ChannelConfig::spread(3, 3),
            ],
            clamp_policy: ClampPolicy::Clamp,
            poll_interval_ms: 10,
            max_poll_cycles: 500,
            max_consecutive_comm_errors: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(TeleopConfig::default().validate(), Ok(()));
    }

    #[test]
    fn default_thresholds_follow_axis_kind() {
        let config = TeleopConfig::default();
        for channel in &config.channels {
            match channel.kind {
                AxisKind::Finger => assert_eq!(channel.threshold, 10),
                AxisKind::Spread => assert_eq!(channel.threshold, 50),
            }
        }
    }

    #[test]
    fn empty_channel_map_is_rejected() {
        let config = TeleopConfig { channels: Vec::new(), ..TeleopConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_poll_budget_is_rejected() {
        let config = TeleopConfig { max_poll_cycles: 0, ..TeleopConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_round_trips_through_a_json_file() {
        let mut path = std::env::temp_dir();
        path.push(format!("openhand-config-{}.json", std::process::id()));
        let original = TeleopConfig::default();
        std::fs::write(&path, serde_json::to_string_pretty(&original).unwrap()).unwrap();

        let loaded = TeleopConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn missing_config_file_reports_the_path() {
        let err = TeleopConfig::load(std::path::Path::new("/nonexistent/rig.json")).unwrap_err();
        assert!(err.contains("/nonexistent/rig.json"));
    }
}
