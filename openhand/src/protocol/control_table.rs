//! Control-table registers of the geared MX-series servos on the hand.
//! Addresses follow the vendor's protocol 1.0 register map.

/// Torque on/off register (1 byte).
pub const ADDR_TORQUE_ENABLE: u8 = 24;
/// Goal position register (2 bytes, little-endian).
pub const ADDR_GOAL_POSITION: u8 = 30;
/// Present position register (2 bytes, little-endian).
pub const ADDR_PRESENT_POSITION: u8 = 36;

pub const TORQUE_ENABLE: u8 = 1;
pub const TORQUE_DISABLE: u8 = 0;
