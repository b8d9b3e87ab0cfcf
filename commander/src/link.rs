//! Producer context: turns raw link frames into setpoint submissions.
//!
//! The transport hands frames over a channel endpoint; this module owns
//! the only [`SetpointWriter`], decodes each frame and submits it.
//! Malformed frames are dropped with a warning, never propagated.

use std::sync::mpsc::Receiver;

use log::{info, warn};
use uplink::SetpointPacket;

use crate::commander::SetpointWriter;

/// Drain `frames` until the sending side hangs up. `clock` supplies the
/// tick passed to the watchdog on each accepted setpoint.
pub fn run<C>(mut writer: SetpointWriter, frames: Receiver<Vec<u8>>, clock: C)
where
    C: Fn() -> u64,
{
    for frame in frames {
        match SetpointPacket::decode(&frame) {
            Ok(packet) => writer.submit(packet.into(), clock()),
            Err(e) => warn!("dropping setpoint frame: {:#}", e),
        }
    }
    info!("link channel closed, command ingest stopped");
}
