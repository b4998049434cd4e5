use std::io::{Read, Write};
use std::time::Duration;

use serialport::SerialPort;
use tracing::debug;

use crate::protocol::{
    InstructionPacket, StatusPacket, ADDR_GOAL_POSITION, ADDR_PRESENT_POSITION,
    ADDR_TORQUE_ENABLE, TORQUE_DISABLE, TORQUE_ENABLE,
};
use crate::{drivers::ServoBus, HandError};

/// Serial binding to the hand's daisy-chained servos. Thin: one request, one
/// status packet, no retries; recovery policy lives in the control loop.
pub struct DynamixelBus {
    port: Box<dyn SerialPort>,
}

impl DynamixelBus {
    /// Opens the bus port. The port is owned exclusively by this value and
    /// released when it is dropped.
    pub fn open(path: &str, baud_rate: u32, timeout: Duration) -> Result<DynamixelBus, HandError> {
        let port = serialport::new(path, baud_rate)
            .timeout(timeout)
            .open()
            .map_err(|e| HandError::Communication(format!("failed to open {}: {}", path, e)))?;
        debug!(path, baud_rate, "servo bus port open");
        Ok(DynamixelBus { port })
    }

    fn transfer(&mut self, packet: &InstructionPacket, response_params: usize) -> Result<StatusPacket, HandError> {
        let frame = packet.encode();
        self.port
            .write_all(&frame)
            .map_err(|e| HandError::Communication(format!("tx to servo {}: {}", packet.id, e)))?;

        let mut response = vec![0u8; StatusPacket::frame_len(response_params)];
        self.port
            .read_exact(&mut response)
            .map_err(|e| HandError::Communication(format!("rx from servo {}: {}", packet.id, e)))?;

        let status = StatusPacket::decode(&response)?;
        if status.error != 0 {
            return Err(HandError::Device { id: status.id, alarms: status.error });
        }
        Ok(status)
    }

    fn write_register_u8(&mut self, id: u8, addr: u8, value: u8) -> Result<(), HandError> {
        self.transfer(&InstructionPacket::write(id, addr, &[value]), 0)?;
        Ok(())
    }
}

impl ServoBus for DynamixelBus {
    fn write_goal(&mut self, id: u8, value: i32) -> Result<(), HandError> {
        let encoded = u16::try_from(value)
            .map_err(|_| HandError::OutOfRange { value, min: 0, max: u16::MAX as i32 })?;
        self.transfer(
            &InstructionPacket::write(id, ADDR_GOAL_POSITION, &encoded.to_le_bytes()),
            0,
        )?;
        Ok(())
    }

    fn read_present(&mut self, id: u8) -> Result<i32, HandError> {
        let status = self.transfer(&InstructionPacket::read(id, ADDR_PRESENT_POSITION, 2), 2)?;
        Ok(status.value_u16()? as i32)
    }

    fn enable_torque(&mut self, id: u8) -> Result<(), HandError> {
        self.write_register_u8(id, ADDR_TORQUE_ENABLE, TORQUE_ENABLE)
    }

    fn disable_torque(&mut self, id: u8) -> Result<(), HandError> {
        self.write_register_u8(id, ADDR_TORQUE_ENABLE, TORQUE_DISABLE)
    }
}
