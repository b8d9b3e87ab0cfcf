//! The commander context: owns the double-buffered setpoint, the link
//! watchdog and the mode flags, and serves degraded-or-clamped values to
//! the control loop.
//!
//! One `Commander` is built per process and shared by reference between
//! the producer (link) and consumer (control loop) contexts. All accessor
//! operations are O(1) and never block.

use std::sync::Arc;

use crate::config::CommanderConfig;
use crate::modes::{FlightMode, ModeFlags};
use crate::setpoint::{Angles, Setpoint, SetpointBuffer};
use crate::watchdog::{Stage, Watchdog};

/// Mid-scale of the 16-bit thrust domain, the neutral point of the
/// altitude-hold climb/descend stick.
const THRUST_MIDPOINT: f32 = 32767.0;

/// Result of the altitude-hold accessor.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AltHoldAdjustment {
    pub holding: bool,
    pub just_activated: bool,
    /// Signed normalized climb/descend rate in [-1, 1]; zero when not
    /// holding.
    pub delta: f32,
}

pub struct Commander {
    buffer: SetpointBuffer,
    watchdog: Watchdog,
    modes: ModeFlags,
    config: CommanderConfig,
}

/// Producer handle. Exactly one exists per `Commander`, which is what
/// enforces the single-producer discipline of the double buffer.
pub struct SetpointWriter {
    commander: Arc<Commander>,
}

impl Commander {
    pub fn new(config: CommanderConfig, now: u64) -> (Arc<Self>, SetpointWriter) {
        let commander = Arc::new(Self {
            buffer: SetpointBuffer::new(),
            watchdog: Watchdog::new(config.stabilize_timeout, config.shutdown_timeout, now),
            modes: ModeFlags::new(),
            config,
        });
        let writer = SetpointWriter {
            commander: Arc::clone(&commander),
        };
        (commander, writer)
    }

    /// Commanded thrust after watchdog degradation and clamping: zero past
    /// the shutdown timeout, zero at or below the minimum-thrust deadband,
    /// capped at the maximum otherwise.
    pub fn thrust(&self, now: u64) -> u16 {
        if self.watchdog.stage(now) == Stage::Shutdown {
            return 0;
        }
        let raw = self.buffer.latest().thrust;
        if raw <= self.config.min_thrust {
            0
        } else if raw > self.config.max_thrust {
            self.config.max_thrust
        } else {
            raw
        }
    }

    /// Commanded attitude, forced to neutral once the stabilize timeout
    /// has passed without a fresh setpoint.
    pub fn attitude(&self, now: u64) -> Angles {
        match self.watchdog.stage(now) {
            Stage::Active => self.buffer.latest().angles(),
            Stage::DegradedAttitude | Stage::Shutdown => Angles::default(),
        }
    }

    /// Altitude-hold state with edge-triggered activation and the
    /// normalized climb/descend rate derived from raw thrust.
    pub fn alt_hold_adjustment(&self) -> AltHoldAdjustment {
        let (holding, just_activated) = self.modes.get_with_edge(FlightMode::AltitudeHold);
        let delta = if holding {
            (f32::from(self.buffer.latest().thrust) - THRUST_MIDPOINT) / THRUST_MIDPOINT
        } else {
            0.0
        };
        AltHoldAdjustment {
            holding,
            just_activated,
            delta,
        }
    }

    /// Ticks since the last accepted setpoint.
    pub fn inactivity(&self, now: u64) -> u64 {
        self.watchdog.inactivity(now)
    }

    /// Current watchdog stage.
    pub fn stage(&self, now: u64) -> Stage {
        self.watchdog.stage(now)
    }

    /// True until the first setpoint arrives, and again once the link has
    /// been silent past the shutdown timeout.
    pub fn is_inactive(&self, now: u64) -> bool {
        !self.watchdog.ever_touched() || self.watchdog.stage(now) == Stage::Shutdown
    }

    /// Last setpoint as submitted, with no degradation or clamping applied.
    pub fn raw_setpoint(&self) -> Setpoint {
        self.buffer.latest()
    }

    /// Mode flag registry, the export surface for telemetry and remote
    /// parameter override.
    pub fn modes(&self) -> &ModeFlags {
        &self.modes
    }
}

impl SetpointWriter {
    /// Accept one setpoint from the link: publish it through the double
    /// buffer, then reset the watchdog.
    pub fn submit(&mut self, setpoint: Setpoint, now: u64) {
        self.commander.buffer.submit(setpoint);
        self.commander.watchdog.touch(now);
    }
}
