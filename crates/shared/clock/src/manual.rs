use chrono::{DateTime, Utc};
use crossbook_core::Timestamp;
use crossbook_ports::Clock;
use std::sync::atomic::{AtomicI64, Ordering};

/// Deterministic clock for tests and batch replay
///
/// Starts at a fixed instant and advances one nanosecond per read.
/// [`ManualClock::advance`] jumps forward explicitly.
#[derive(Debug)]
pub struct ManualClock {
    nanos: AtomicI64,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            nanos: AtomicI64::new(start.timestamp_nanos_opt().unwrap_or(0)),
        }
    }

    /// Clock starting at the Unix epoch
    pub fn at_epoch() -> Self {
        Self {
            nanos: AtomicI64::new(0),
        }
    }

    pub fn advance(&self, nanos: i64) {
        self.nanos.fetch_add(nanos, Ordering::AcqRel);
    }

    /// Current reading without ticking
    pub fn peek(&self) -> Timestamp {
        DateTime::<Utc>::from_timestamp_nanos(self.nanos.load(Ordering::Acquire))
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::at_epoch()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        DateTime::<Utc>::from_timestamp_nanos(self.nanos.fetch_add(1, Ordering::AcqRel))
    }

    fn name(&self) -> &str {
        "ManualClock"
    }
}
