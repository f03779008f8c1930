use chrono::Utc;
use crossbook_core::Timestamp;
use crossbook_ports::Clock;

/// Real system clock
///
/// Returns the current wall-clock time with no ordering guarantee between
/// calls. [`crate::MonotonicClock`] wraps it by default for order priority.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }

    fn name(&self) -> &str {
        "SystemClock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::thread;

    #[test]
    fn test_wall_time_passes_between_reads() {
        let clock = SystemClock;
        let before = clock.now();
        thread::sleep(std::time::Duration::from_millis(5));
        let elapsed = clock.now() - before;

        assert!(elapsed >= Duration::milliseconds(4));
        assert_eq!(clock.name(), "SystemClock");
    }
}
