//! Wire format for setpoint payloads received from the communication link.
//!
//! The layout is a fixed contract shared with the link peers: four fields
//! packed back to back, little-endian, no padding. Revision bumps of
//! [`WIRE_REVISION`] require a coordinated peer update since the frame
//! itself carries no version byte.

use anyhow::{ensure, Result};

/// Revision of the setpoint wire contract.
pub const WIRE_REVISION: u8 = 1;

/// Encoded size of a setpoint frame in bytes.
pub const SETPOINT_WIRE_LEN: usize = 14;

/// Raw setpoint as it travels over the link.
///
/// Field order and widths are normative: `roll f32 | pitch f32 | yaw f32 |
/// thrust u16`, all little-endian.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SetpointPacket {
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub thrust: u16,
}

impl SetpointPacket {
    pub fn encode(&self) -> [u8; SETPOINT_WIRE_LEN] {
        let mut buf = [0u8; SETPOINT_WIRE_LEN];
        buf[0..4].copy_from_slice(&self.roll.to_le_bytes());
        buf[4..8].copy_from_slice(&self.pitch.to_le_bytes());
        buf[8..12].copy_from_slice(&self.yaw.to_le_bytes());
        buf[12..14].copy_from_slice(&self.thrust.to_le_bytes());
        buf
    }

    pub fn decode(buf: &[u8]) -> Result<Self> {
        ensure!(
            buf.len() == SETPOINT_WIRE_LEN,
            "setpoint frame is {} bytes, expected {}",
            buf.len(),
            SETPOINT_WIRE_LEN
        );
        Ok(Self {
            roll: f32::from_le_bytes(buf[0..4].try_into()?),
            pitch: f32::from_le_bytes(buf[4..8].try_into()?),
            yaw: f32::from_le_bytes(buf[8..12].try_into()?),
            thrust: u16::from_le_bytes(buf[12..14].try_into()?),
        })
    }
}
