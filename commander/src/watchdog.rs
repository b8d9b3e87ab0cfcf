//! Staged inactivity watchdog for the command link.
//!
//! Silence from the producer is the only failure signal. The degradation
//! stage is a pure function of elapsed ticks since the last accepted
//! setpoint, recomputed on every query; recovery happens only through a
//! fresh [`Watchdog::touch`].

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Degradation stage derived from link inactivity.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Recent update, setpoint served as commanded.
    Active,
    /// No update past the stabilize timeout: attitude forced to neutral,
    /// thrust untouched.
    DegradedAttitude,
    /// No update past the shutdown timeout: thrust forced to zero.
    Shutdown,
}

pub struct Watchdog {
    last_update: AtomicU64,
    touched: AtomicBool,
    stabilize_timeout: u64,
    shutdown_timeout: u64,
}

impl Watchdog {
    /// `now` seeds the update tick so a freshly built watchdog does not
    /// report shutdown before the timeouts had a chance to elapse.
    pub fn new(stabilize_timeout: u64, shutdown_timeout: u64, now: u64) -> Self {
        Self {
            last_update: AtomicU64::new(now),
            touched: AtomicBool::new(false),
            stabilize_timeout,
            shutdown_timeout,
        }
    }

    /// Record `now` as the latest accepted producer update.
    pub fn touch(&self, now: u64) {
        self.last_update.store(now, Ordering::Release);
        self.touched.store(true, Ordering::Relaxed);
    }

    /// Ticks elapsed since the last touch.
    pub fn inactivity(&self, now: u64) -> u64 {
        now.saturating_sub(self.last_update.load(Ordering::Acquire))
    }

    /// Current degradation stage. Pure, no side effects.
    pub fn stage(&self, now: u64) -> Stage {
        let elapsed = self.inactivity(now);
        if elapsed <= self.stabilize_timeout {
            Stage::Active
        } else if elapsed <= self.shutdown_timeout {
            Stage::DegradedAttitude
        } else {
            Stage::Shutdown
        }
    }

    /// Whether any producer update was ever accepted.
    pub fn ever_touched(&self) -> bool {
        self.touched.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn watchdog() -> Watchdog {
        Watchdog::new(500, 2000, 0)
    }

    #[test]
    fn stage_boundaries() {
        let wd = watchdog();
        wd.touch(0);
        assert_eq!(wd.stage(0), Stage::Active);
        assert_eq!(wd.stage(500), Stage::Active);
        assert_eq!(wd.stage(501), Stage::DegradedAttitude);
        assert_eq!(wd.stage(2000), Stage::DegradedAttitude);
        assert_eq!(wd.stage(2001), Stage::Shutdown);
    }

    #[test]
    fn touch_recovers_from_shutdown() {
        let wd = watchdog();
        wd.touch(0);
        assert_eq!(wd.stage(3000), Stage::Shutdown);
        wd.touch(3000);
        assert_eq!(wd.stage(3100), Stage::Active);
    }

    #[test]
    fn inactivity_tracks_last_touch() {
        let wd = watchdog();
        wd.touch(100);
        assert_eq!(wd.inactivity(100), 0);
        assert_eq!(wd.inactivity(750), 650);
        wd.touch(800);
        assert_eq!(wd.inactivity(900), 100);
    }

    #[test]
    fn inactivity_saturates_on_stale_clock() {
        let wd = watchdog();
        wd.touch(500);
        assert_eq!(wd.inactivity(400), 0);
        assert_eq!(wd.stage(400), Stage::Active);
    }

    #[test]
    fn never_touched_until_first_update() {
        let wd = watchdog();
        assert!(!wd.ever_touched());
        wd.touch(10);
        assert!(wd.ever_touched());
    }
}
