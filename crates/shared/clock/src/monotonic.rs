use chrono::{DateTime, Utc};
use crossbook_core::Timestamp;
use crossbook_ports::Clock;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::SystemClock;

/// A source clock forced to be strictly increasing
///
/// Each reading is `max(source_nanos, last + 1)`, so consecutive reads differ
/// by at least one nanosecond even when the source stalls or steps back.
#[derive(Debug)]
pub struct MonotonicClock<S: Clock = SystemClock> {
    source: S,
    last_nanos: AtomicI64,
}

impl MonotonicClock<SystemClock> {
    pub fn new() -> Self {
        Self::wrap(SystemClock::new())
    }
}

impl<S: Clock> MonotonicClock<S> {
    pub fn wrap(source: S) -> Self {
        Self {
            source,
            last_nanos: AtomicI64::new(i64::MIN),
        }
    }

    fn source_nanos(&self) -> i64 {
        // None only past the year 2262
        self.source.now().timestamp_nanos_opt().unwrap_or(i64::MAX)
    }
}

impl Default for MonotonicClock<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Clock> Clock for MonotonicClock<S> {
    fn now(&self) -> Timestamp {
        let wall = self.source_nanos();
        let mut last = self.last_nanos.load(Ordering::Acquire);
        loop {
            let next = wall.max(last.saturating_add(1));
            match self.last_nanos.compare_exchange_weak(
                last,
                next,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return DateTime::<Utc>::from_timestamp_nanos(next),
                Err(current) => last = current,
            }
        }
    }

    fn name(&self) -> &str {
        "MonotonicClock"
    }
}
