use crate::HandError;

/// Capability interface of the servo bus, as much of the vendor SDK as the
/// control loop needs. Implemented by the serial driver for hardware and by
/// fakes in tests, so the mapping/convergence core never touches a port.
pub trait ServoBus {
    fn write_goal(&mut self, id: u8, value: i32) -> Result<(), HandError>;
    fn read_present(&mut self, id: u8) -> Result<i32, HandError>;
    fn enable_torque(&mut self, id: u8) -> Result<(), HandError>;
    fn disable_torque(&mut self, id: u8) -> Result<(), HandError>;
}

/// Capability interface of the analog input device: one frame of raw axis
/// readings per poll, fingers first, spread last.
pub trait AnalogInput {
    fn read_frame(&mut self) -> Result<Vec<f64>, HandError>;
}
