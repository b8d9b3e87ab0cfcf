//! Setpoint value types and the lock-free double-buffer store.
//!
//! The link context and the control loop never share a critical section:
//! the producer writes the inactive slot and publishes it by flipping the
//! active-side selector, the sole synchronization point between the two.

use std::sync::atomic::{AtomicU16, AtomicU32, AtomicUsize, Ordering};

use uplink::SetpointPacket;

/// Commanded attitude angles.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Angles {
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
}

/// One complete commanded setpoint. A new setpoint is always a full
/// replacement, never a partial field update.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Setpoint {
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub thrust: u16,
}

impl Setpoint {
    pub fn angles(&self) -> Angles {
        Angles {
            roll: self.roll,
            pitch: self.pitch,
            yaw: self.yaw,
        }
    }
}

impl From<SetpointPacket> for Setpoint {
    fn from(packet: SetpointPacket) -> Self {
        Self {
            roll: packet.roll,
            pitch: packet.pitch,
            yaw: packet.yaw,
            thrust: packet.thrust,
        }
    }
}

/// One storage slot. Fields are word-sized atomics so a reader paging
/// through a slot that is being rewritten sees whole field values; record
/// consistency comes from the selector protocol, not from the slot itself.
struct Slot {
    roll: AtomicU32,
    pitch: AtomicU32,
    yaw: AtomicU32,
    thrust: AtomicU16,
}

impl Slot {
    const fn zeroed() -> Self {
        Self {
            roll: AtomicU32::new(0),
            pitch: AtomicU32::new(0),
            yaw: AtomicU32::new(0),
            thrust: AtomicU16::new(0),
        }
    }

    fn store(&self, setpoint: Setpoint) {
        self.roll.store(setpoint.roll.to_bits(), Ordering::Relaxed);
        self.pitch.store(setpoint.pitch.to_bits(), Ordering::Relaxed);
        self.yaw.store(setpoint.yaw.to_bits(), Ordering::Relaxed);
        self.thrust.store(setpoint.thrust, Ordering::Relaxed);
    }

    fn load(&self) -> Setpoint {
        Setpoint {
            roll: f32::from_bits(self.roll.load(Ordering::Relaxed)),
            pitch: f32::from_bits(self.pitch.load(Ordering::Relaxed)),
            yaw: f32::from_bits(self.yaw.load(Ordering::Relaxed)),
            thrust: self.thrust.load(Ordering::Relaxed),
        }
    }
}

/// Two setpoint slots plus the active-side selector.
///
/// Single producer: only [`crate::commander::SetpointWriter`] reaches
/// [`SetpointBuffer::submit`], so the selector is never flipped
/// concurrently with itself. Any number of readers may call
/// [`SetpointBuffer::latest`] at any time.
pub struct SetpointBuffer {
    slots: [Slot; 2],
    active: AtomicUsize,
}

impl SetpointBuffer {
    pub fn new() -> Self {
        Self {
            slots: [Slot::zeroed(), Slot::zeroed()],
            active: AtomicUsize::new(0),
        }
    }

    /// Write `setpoint` into the inactive slot, then flip the selector.
    /// The release store on the selector orders the slot writes before the
    /// flip becomes visible to readers.
    pub(crate) fn submit(&self, setpoint: Setpoint) {
        let side = self.active.load(Ordering::Relaxed);
        let back = 1 - side;
        self.slots[back].store(setpoint);
        self.active.store(back, Ordering::Release);
    }

    /// Copy of the record in the currently active slot. Never blocks.
    pub fn latest(&self) -> Setpoint {
        let side = self.active.load(Ordering::Acquire);
        self.slots[side].load()
    }
}

impl Default for SetpointBuffer {
    fn default() -> Self {
        Self::new()
    }
}
