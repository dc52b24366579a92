// Copyright 2026 the Inkpane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The repeating animation timer.
//!
//! Application engines ask the frontend to activate a timer while something
//! animates (a flash, a clock) and to deactivate it afterwards. While active,
//! the owning loop polls [`TickTimer`] and forwards each [`Tick`]'s elapsed
//! time to the engine, which typically redraws and so produces damage for the
//! next render.

use core::time::Duration;

use crate::time::Timestamp;

/// Configuration for [`TickTimer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickTimerConfig {
    /// Minimum time between two ticks.
    pub interval: Duration,
}

impl TickTimerConfig {
    /// 100 ms ticks. Refreshing an e-ink panel faster than this only queues
    /// work the hardware cannot show.
    #[must_use]
    pub const fn eink() -> Self {
        Self {
            interval: Duration::from_millis(100),
        }
    }
}

impl Default for TickTimerConfig {
    fn default() -> Self {
        Self::eink()
    }
}

/// One timer firing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tick {
    /// When the tick was observed.
    pub now: Timestamp,
    /// Time since the previous tick (or since activation).
    pub elapsed: Duration,
}

/// A repeating timer driven by explicit polling.
#[derive(Clone, Copy, Debug)]
pub struct TickTimer {
    config: TickTimerConfig,
    /// Time of the previous tick; `None` while inactive.
    prev: Option<Timestamp>,
}

impl TickTimer {
    /// Creates an inactive timer.
    #[must_use]
    pub const fn new(config: TickTimerConfig) -> Self {
        Self { config, prev: None }
    }

    /// Starts ticking. Activating an active timer keeps its phase.
    pub fn activate(&mut self, now: Timestamp) {
        if self.prev.is_none() {
            self.prev = Some(now);
            log::trace!("tick timer activated at {now:?}");
        }
    }

    /// Stops ticking. Returns `true` if the timer was active.
    pub fn deactivate(&mut self) -> bool {
        let was_active = self.prev.take().is_some();
        if was_active {
            log::trace!("tick timer deactivated");
        }
        was_active
    }

    /// Returns whether the timer is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.prev.is_some()
    }

    /// When the next tick is due, if active.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.prev.map(|prev| prev + self.config.interval)
    }

    /// Fires if at least one interval has passed since the previous tick.
    ///
    /// Late polls produce a single tick carrying the full elapsed time; missed
    /// intervals are not replayed.
    pub fn poll(&mut self, now: Timestamp) -> Option<Tick> {
        let prev = self.prev?;
        let elapsed = now.saturating_duration_since(prev);
        if elapsed < self.config.interval {
            return None;
        }
        self.prev = Some(now);
        Some(Tick { now, elapsed })
    }
}

impl Default for TickTimer {
    fn default() -> Self {
        Self::new(TickTimerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inactive_timer_never_fires() {
        let mut t = TickTimer::default();
        assert_eq!(t.poll(Timestamp::from_millis(1_000)), None);
        assert_eq!(t.next_deadline(), None);
    }

    #[test]
    fn fires_after_interval_with_elapsed_time() {
        let mut t = TickTimer::default();
        t.activate(Timestamp::from_millis(0));
        assert_eq!(t.poll(Timestamp::from_millis(99)), None);

        let tick = t.poll(Timestamp::from_millis(130)).expect("interval passed");
        assert_eq!(tick.elapsed, Duration::from_millis(130));
        assert_eq!(t.next_deadline(), Some(Timestamp::from_millis(230)));
    }

    #[test]
    fn reactivation_keeps_phase() {
        let mut t = TickTimer::default();
        t.activate(Timestamp::from_millis(0));
        t.activate(Timestamp::from_millis(80));
        assert!(t.poll(Timestamp::from_millis(100)).is_some());
    }

    #[test]
    fn deactivate_reports_previous_state() {
        let mut t = TickTimer::default();
        assert!(!t.deactivate());
        t.activate(Timestamp::from_millis(5));
        assert!(t.deactivate());
        assert!(!t.is_active());
    }
}
