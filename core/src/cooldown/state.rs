use crate::host::CooldownReading;

use super::clock;

/// Last published cooldown of one capability.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CooldownState {
    pub start: f64,
    pub duration: f64,
    pub enabled: bool,
    /// Uptime at which (start, duration) last changed
    pub last_change: Option<f64>,
}

impl CooldownState {
    /// Fold a new reading into the state.
    ///
    /// Returns the reading to publish when (start, duration) differ from the
    /// stored pair, `None` otherwise. `enabled` is always refreshed but never
    /// causes a publish on its own. A reading with no running cooldown is
    /// normalized to (0, 0) so the sink receives an explicit clear.
    pub fn observe(&mut self, reading: CooldownReading, now: f64) -> Option<CooldownReading> {
        let (start, duration) = if reading.start > 0.0 && reading.duration > 0.0 {
            (reading.start, reading.duration)
        } else {
            (0.0, 0.0)
        };

        self.enabled = reading.enabled;

        if start == self.start && duration == self.duration {
            return None;
        }

        self.start = start;
        self.duration = duration;
        self.last_change = Some(now);
        Some(CooldownReading::new(start, duration, reading.enabled))
    }

    /// Overwrite with a cooldown restored from a snapshot.
    pub fn restore(&mut self, start: f64, duration: f64, now: f64) -> CooldownReading {
        self.start = start;
        self.duration = duration;
        self.enabled = true;
        self.last_change = Some(now);
        CooldownReading::new(start, duration, true)
    }

    pub fn is_running(&self) -> bool {
        self.start > 0.0 && self.duration > 0.0
    }

    /// Seconds left, or `None` when no cooldown is running or it has elapsed.
    pub fn remaining(&self, uptime: f64, wall_clock: f64) -> Option<f64> {
        if !self.is_running() {
            return None;
        }
        let left = clock::remaining(self.start, self.duration, uptime, wall_clock);
        (left > 0.0).then_some(left)
    }

    /// Derived "active" flag: running and not yet elapsed.
    pub fn is_active(&self, uptime: f64, wall_clock: f64) -> bool {
        self.remaining(uptime, wall_clock).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_readings_publish_once() {
        let mut state = CooldownState::default();
        let reading = CooldownReading::new(100.0, 30.0, true);

        assert_eq!(state.observe(reading, 100.0), Some(reading));
        assert_eq!(state.observe(reading, 100.1), None);
        assert_eq!(state.last_change, Some(100.0));
    }

    #[test]
    fn test_enabled_flip_alone_does_not_publish() {
        let mut state = CooldownState::default();
        state.observe(CooldownReading::new(100.0, 30.0, true), 100.0);

        assert_eq!(state.observe(CooldownReading::new(100.0, 30.0, false), 101.0), None);
        assert!(!state.enabled);
    }

    #[test]
    fn test_collapse_to_zero_publishes_clear() {
        let mut state = CooldownState::default();
        state.observe(CooldownReading::new(100.0, 30.0, true), 100.0);

        let cleared = state.observe(CooldownReading::new(100.0, 0.0, true), 130.0);
        assert_eq!(cleared, Some(CooldownReading::new(0.0, 0.0, true)));
        assert!(!state.is_running());

        // Subsequent idle readings stay quiet
        assert_eq!(state.observe(CooldownReading::idle(), 131.0), None);
    }

    #[test]
    fn test_initial_idle_reading_is_quiet() {
        let mut state = CooldownState::default();
        assert_eq!(state.observe(CooldownReading::idle(), 1.0), None);
    }

    #[test]
    fn test_active_is_derived_from_clock() {
        let mut state = CooldownState::default();
        state.observe(CooldownReading::new(100.0, 30.0, true), 100.0);

        assert!(state.is_active(110.0, 1_000.0));
        assert_eq!(state.remaining(110.0, 1_000.0), Some(20.0));
        assert!(!state.is_active(131.0, 1_021.0));
    }
}
