//! Crossbook Ports
//!
//! Port definitions (traits) for the crossbook matching engine, plus the
//! boundary types exchanged across them. These define the seam between the
//! engine and the transport adapters that drive it.

mod clock;
mod error;
mod gateway;

pub use clock::Clock;
pub use error::{MatchingError, MatchingResult};
pub use gateway::{
    BookSnapshot, CancelOutcome, CancelStatus, OrderGateway, OrderSnapshot, SubmitOutcome,
    SubmitRequest, SubmitStatus,
};
