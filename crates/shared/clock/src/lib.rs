//! Crossbook Clock Infrastructure
//!
//! Time sources for order priority:
//!
//! ```text
//! SystemClock     wall time, may repeat or step backwards
//!     │
//!     └── MonotonicClock   wraps any Clock, forced strictly increasing
//!
//! ManualClock     fixed start, one nanosecond per read (tests)
//! ```
//!
//! The engine stamps every order with [`MonotonicClock`], so two orders
//! created back to back are never tied on time priority.

mod manual;
mod monotonic;
mod system;

pub use manual::ManualClock;
pub use monotonic::MonotonicClock;
pub use system::SystemClock;

// Re-export the Clock trait for convenience
pub use crossbook_ports::Clock;
