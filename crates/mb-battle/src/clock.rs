use std::time::Duration;

/// Virtual time for deferred transitions.
///
/// Nothing in the engine reads the wall clock. A real-time frontend advances
/// this clock as time passes; tests jump it forward instantly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VirtualClock {
    now: Duration,
}

impl VirtualClock {
    /// Create a clock at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time since the engine was created.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Current virtual time in whole milliseconds.
    pub fn now_ms(&self) -> u64 {
        u64::try_from(self.now.as_millis()).unwrap_or(u64::MAX)
    }

    /// Move forward by `by`. Returns the new time.
    pub fn advance_by(&mut self, by: Duration) -> Duration {
        self.now = self.now.saturating_add(by);
        self.now
    }

    /// Move forward to `at`. Times in the past leave the clock unchanged.
    pub fn advance_to(&mut self, at: Duration) -> Duration {
        self.now = self.now.max(at);
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_initial_state() {
        let clock = VirtualClock::new();
        assert_eq!(clock.now(), Duration::ZERO);
        assert_eq!(clock.now_ms(), 0);
    }

    #[test]
    fn clock_advance_accumulates() {
        let mut clock = VirtualClock::new();
        clock.advance_by(Duration::from_millis(300));
        clock.advance_by(Duration::from_millis(500));
        assert_eq!(clock.now_ms(), 800);
    }

    #[test]
    fn clock_never_runs_backwards() {
        let mut clock = VirtualClock::new();
        clock.advance_to(Duration::from_secs(2));
        clock.advance_to(Duration::from_secs(1));
        assert_eq!(clock.now(), Duration::from_secs(2));
    }
}
