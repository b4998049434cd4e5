mod bus;
pub use bus::*;

#[cfg(feature = "driver")]
mod dynamixel;
#[cfg(feature = "driver")]
pub use dynamixel::*;

#[cfg(feature = "driver")]
mod glove;
#[cfg(feature = "driver")]
pub use glove::*;

mod teleop_config;
pub use teleop_config::*;
