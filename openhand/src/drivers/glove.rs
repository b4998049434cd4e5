use std::io::{BufRead, BufReader};
use std::time::Duration;

use serialport::SerialPort;
use tracing::debug;

use crate::{drivers::AnalogInput, HandError};

/// Serial line from the slide-potentiometer input box: one newline-delimited
/// frame of comma-separated floats per poll, fingers first, spread last.
pub struct SlideGlove {
    reader: BufReader<Box<dyn SerialPort>>,
}

impl SlideGlove {
    /// Opens the input device and discards the first, possibly partial, line.
    pub fn open(path: &str, baud_rate: u32, timeout: Duration) -> Result<SlideGlove, HandError> {
        let port = serialport::new(path, baud_rate)
            .timeout(timeout)
            .open()
            .map_err(|e| HandError::Communication(format!("failed to open {}: {}", path, e)))?;
        debug!(path, baud_rate, "analog input port open");

        let mut glove = SlideGlove { reader: BufReader::new(port) };
        let mut banner = String::new();
        glove
            .reader
            .read_line(&mut banner)
            .map_err(|e| HandError::Communication(format!("input device not talking: {}", e)))?;
        Ok(glove)
    }
}

impl AnalogInput for SlideGlove {
    fn read_frame(&mut self) -> Result<Vec<f64>, HandError> {
        let mut line = String::new();
        self.reader
            .read_line(&mut line)
            .map_err(|e| HandError::Communication(format!("input frame read failed: {}", e)))?;

        line.trim()
            .split(',')
            .map(|field| {
                field
                    .trim()
                    .parse::<f64>()
                    .map_err(|e| HandError::Communication(format!("bad input field {:?}: {}", field, e)))
            })
            .collect()
    }
}
