//! Flight-mode flag registry with edge-triggered activation reporting.
//!
//! Each flag is written by one owning controller and read by the control
//! loop. The edge tracker holds a single `previous` cell per flag, so only
//! one consumer may use [`ModeFlags::get_with_edge`] for a given flag;
//! additional edge consumers would each need their own tracker.

use std::sync::atomic::{AtomicBool, Ordering};

/// The flags exported to the control loop and to telemetry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlightMode {
    AltitudeHold,
    PositionControl,
    Takeoff,
    Landing,
    /// Owned entirely by external collaborators; this registry only stores
    /// and reports it.
    ManualOverride,
}

pub const FLIGHT_MODES: [FlightMode; 5] = [
    FlightMode::AltitudeHold,
    FlightMode::PositionControl,
    FlightMode::Takeoff,
    FlightMode::Landing,
    FlightMode::ManualOverride,
];

impl FlightMode {
    pub fn name(&self) -> &'static str {
        match self {
            FlightMode::AltitudeHold => "althold",
            FlightMode::PositionControl => "posctrl",
            FlightMode::Takeoff => "takeoff",
            FlightMode::Landing => "landing",
            FlightMode::ManualOverride => "manovrd",
        }
    }
}

struct Flag {
    current: AtomicBool,
    previous: AtomicBool,
}

impl Flag {
    const fn cleared() -> Self {
        Self {
            current: AtomicBool::new(false),
            previous: AtomicBool::new(false),
        }
    }
}

pub struct ModeFlags {
    flags: [Flag; 5],
}

impl ModeFlags {
    pub fn new() -> Self {
        Self {
            flags: [
                Flag::cleared(),
                Flag::cleared(),
                Flag::cleared(),
                Flag::cleared(),
                Flag::cleared(),
            ],
        }
    }

    fn flag(&self, mode: FlightMode) -> &Flag {
        &self.flags[mode as usize]
    }

    pub fn set(&self, mode: FlightMode, value: bool) {
        self.flag(mode).current.store(value, Ordering::Release);
    }

    /// Current value, without touching the edge tracker.
    pub fn get(&self, mode: FlightMode) -> bool {
        self.flag(mode).current.load(Ordering::Acquire)
    }

    /// `(current, just_activated)` where `just_activated` is true exactly
    /// on the first call that observes a false-to-true transition. The
    /// tracker is updated after the edge is produced.
    pub fn get_with_edge(&self, mode: FlightMode) -> (bool, bool) {
        let flag = self.flag(mode);
        let current = flag.current.load(Ordering::Acquire);
        let previous = flag.previous.swap(current, Ordering::AcqRel);
        (current, current && !previous)
    }
}

impl Default for ModeFlags {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_fires_once_per_activation() {
        let modes = ModeFlags::new();
        modes.set(FlightMode::Takeoff, true);
        assert_eq!(modes.get_with_edge(FlightMode::Takeoff), (true, true));
        assert_eq!(modes.get_with_edge(FlightMode::Takeoff), (true, false));
        assert_eq!(modes.get_with_edge(FlightMode::Takeoff), (true, false));
    }

    #[test]
    fn edge_rearms_after_deactivation() {
        let modes = ModeFlags::new();
        modes.set(FlightMode::AltitudeHold, true);
        assert_eq!(modes.get_with_edge(FlightMode::AltitudeHold), (true, true));
        modes.set(FlightMode::AltitudeHold, false);
        assert_eq!(
            modes.get_with_edge(FlightMode::AltitudeHold),
            (false, false)
        );
        modes.set(FlightMode::AltitudeHold, true);
        assert_eq!(modes.get_with_edge(FlightMode::AltitudeHold), (true, true));
    }

    #[test]
    fn plain_get_does_not_consume_edge() {
        let modes = ModeFlags::new();
        modes.set(FlightMode::Landing, true);
        assert!(modes.get(FlightMode::Landing));
        assert!(modes.get(FlightMode::Landing));
        assert_eq!(modes.get_with_edge(FlightMode::Landing), (true, true));
    }

    #[test]
    fn flags_are_independent() {
        let modes = ModeFlags::new();
        modes.set(FlightMode::PositionControl, true);
        assert!(!modes.get(FlightMode::Takeoff));
        assert_eq!(
            modes.get_with_edge(FlightMode::PositionControl),
            (true, true)
        );
        assert_eq!(modes.get_with_edge(FlightMode::Takeoff), (false, false));
    }

    #[test]
    fn all_flags_start_cleared() {
        let modes = ModeFlags::new();
        for mode in FLIGHT_MODES {
            assert!(!modes.get(mode));
            assert_eq!(modes.get_with_edge(mode), (false, false));
        }
    }
}
