use std::error::Error;
use std::fmt;
use int_enum::IntEnum;
use serde::{Deserialize, Serialize};

/// Which of the two finger links a degenerate-geometry error refers to.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    Proximal,
    Distal,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum HandError {
    /// Recording file missing, unreadable, or a row failed to parse.
    Recording(String),
    /// A capture row contained NaN or infinite coordinates.
    NonFiniteSample { index: usize },
    /// A link collapsed to zero length; its angle is undefined.
    DegenerateLink { link: Link, index: usize },
    /// Grasp phases requested from an empty kinematics sequence.
    EmptySequence,
    /// Actuator command outside the safe bounds under the reject policy.
    OutOfRange { value: i32, min: i32, max: i32 },
    /// Bus transmit/receive failure (timeout, framing, checksum).
    Communication(String),
    /// A servo reported a non-zero alarm byte in its status packet.
    Device { id: u8, alarms: u8 },
    /// A servo failed to converge within the bounded poll budget.
    Stalled { id: u8 },
    /// Invalid configuration rejected before the loop starts.
    Config(String),
}

impl Error for HandError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

impl fmt::Display for HandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            HandError::Recording(ref msg) => write!(f, "Recording error: {}", msg),
            HandError::NonFiniteSample { index } => {
                write!(f, "Sample {} contains non-finite coordinates", index)
            }
            HandError::DegenerateLink { link, index } => {
                write!(f, "{:?} link has zero length at sample {}", link, index)
            }
            HandError::EmptySequence => write!(f, "Kinematics sequence is empty"),
            HandError::OutOfRange { value, min, max } => {
                write!(f, "Goal position {} outside safe range [{}, {}]", value, min, max)
            }
            HandError::Communication(ref msg) => write!(f, "Bus communication error: {}", msg),
            HandError::Device { id, alarms } => {
                write!(f, "Servo {} alarm:", id)?;
                for alarm in DeviceAlarm::decode(alarms) {
                    write!(f, " {}", alarm.message())?;
                }
                Ok(())
            }
            HandError::Stalled { id } => {
                write!(f, "Servo {} failed to reach its goal within the poll budget", id)
            }
            HandError::Config(ref msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

/// Individual alarm bits a servo can set in the status-packet error byte.
#[repr(u8)]
#[derive(Debug, Serialize, Deserialize, IntEnum, Clone, Copy, PartialEq, Eq)]
pub enum DeviceAlarm {
    InputVoltage = 0x01,
    AngleLimit = 0x02,
    Overheating = 0x04,
    Range = 0x08,
    Checksum = 0x10,
    Overload = 0x20,
    Instruction = 0x40,
}

impl DeviceAlarm {
    const ALL: [DeviceAlarm; 7] = [
        DeviceAlarm::InputVoltage,
        DeviceAlarm::AngleLimit,
        DeviceAlarm::Overheating,
        DeviceAlarm::Range,
        DeviceAlarm::Checksum,
        DeviceAlarm::Overload,
        DeviceAlarm::Instruction,
    ];

    /// Expands the status-packet error byte into the alarm bits it carries.
    pub fn decode(byte: u8) -> Vec<DeviceAlarm> {
        Self::ALL
            .iter()
            .copied()
            .filter(|alarm| byte & u8::from(*alarm) != 0)
            .collect()
    }

    pub fn message(&self) -> &str {
        match self {
            DeviceAlarm::InputVoltage => "Input Voltage Error.",
            DeviceAlarm::AngleLimit => "Angle Limit Error.",
            DeviceAlarm::Overheating => "Overheating Error.",
            DeviceAlarm::Range => "Range Error.",
            DeviceAlarm::Checksum => "Checksum Error.",
            DeviceAlarm::Overload => "Overload Error.",
            DeviceAlarm::Instruction => "Instruction Error.",
        }
    }
}
