//! Instruction/status packet codec for the vendor's protocol 1.0 servo bus.
//!
//! Framing: `0xFF 0xFF <id> <length> <instruction|error> <params...> <checksum>`
//! where `length` counts the params plus two and the checksum is the inverted
//! low byte of the sum of everything after the header. The wire protocol is
//! the vendor's; this module only encodes and decodes it.

use int_enum::IntEnum;

use crate::HandError;

const HEADER: [u8; 2] = [0xFF, 0xFF];

/// Instruction codes the hand controller uses.
#[repr(u8)]
#[derive(Debug, IntEnum, Clone, Copy, PartialEq, Eq)]
pub enum InstructionKind {
    Ping = 0x01,
    Read = 0x02,
    Write = 0x03,
}

/// One outbound instruction packet for a single servo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionPacket {
    pub id: u8,
    pub kind: InstructionKind,
    pub params: Vec<u8>,
}

impl InstructionPacket {
    pub fn ping(id: u8) -> Self {
        Self { id, kind: InstructionKind::Ping, params: Vec::new() }
    }

    /// Read `count` bytes starting at `addr`.
    pub fn read(id: u8, addr: u8, count: u8) -> Self {
        Self { id, kind: InstructionKind::Read, params: vec![addr, count] }
    }

    /// Write `data` starting at `addr`.
    pub fn write(id: u8, addr: u8, data: &[u8]) -> Self {
        let mut params = Vec::with_capacity(data.len() + 1);
        params.push(addr);
        params.extend_from_slice(data);
        Self { id, kind: InstructionKind::Write, params }
    }

    pub fn encode(&self) -> Vec<u8> {
        let length = self.params.len() as u8 + 2;
        let mut frame = Vec::with_capacity(self.params.len() + 6);
        frame.extend_from_slice(&HEADER);
        frame.push(self.id);
        frame.push(length);
        frame.push(u8::from(self.kind));
        frame.extend_from_slice(&self.params);
        frame.push(checksum(&frame[2..]));
        frame
    }
}

/// One inbound status packet from a servo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusPacket {
    pub id: u8,
    /// Alarm bits; zero means no error.
    pub error: u8,
    pub params: Vec<u8>,
}

impl StatusPacket {
    /// Expected wire size of a status packet carrying `param_count` bytes.
    pub fn frame_len(param_count: usize) -> usize {
        param_count + 6
    }

    /// Decodes a complete status frame. Header, length, and checksum
    /// mismatches are communication errors; a set alarm byte is reported by
    /// the caller once it knows which request failed.
    pub fn decode(frame: &[u8]) -> Result<StatusPacket, HandError> {
        if frame.len() < 6 {
            return Err(HandError::Communication(format!(
                "status packet truncated at {} bytes",
                frame.len()
            )));
        }
        if frame[0..2] != HEADER {
            return Err(HandError::Communication("status packet missing header".to_string()));
        }
        let id = frame[2];
        let length = frame[3] as usize;
        if length < 2 || frame.len() != length + 4 {
            return Err(HandError::Communication(format!(
                "status packet length field {} does not match frame of {} bytes",
                length,
                frame.len()
            )));
        }
        let expected = checksum(&frame[2..frame.len() - 1]);
        let received = frame[frame.len() - 1];
        if expected != received {
            return Err(HandError::Communication(format!(
                "status packet checksum mismatch: expected {:#04x}, received {:#04x}",
                expected, received
            )));
        }
        Ok(StatusPacket {
            id,
            error: frame[4],
            params: frame[5..frame.len() - 1].to_vec(),
        })
    }

    /// Little-endian u16 payload of a two-byte register read.
    pub fn value_u16(&self) -> Result<u16, HandError> {
        match self.params.as_slice() {
            [lo, hi] => Ok(u16::from_le_bytes([*lo, *hi])),
            other => Err(HandError::Communication(format!(
                "expected a 2-byte register value, received {} bytes",
                other.len()
            ))),
        }
    }
}

fn checksum(body: &[u8]) -> u8 {
    let sum: u32 = body.iter().map(|b| *b as u32).sum();
    !(sum as u8)
}
