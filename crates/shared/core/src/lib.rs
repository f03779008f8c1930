//! Crossbook Core Domain
//!
//! Pure domain types for the crossbook matching engine.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod entities;
pub mod error;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{Order, OrderId, Side, Trade, TradeId, Trader, TraderId};
pub use error::{OrderError, OrderResult};
pub use values::{Price, PriceParseError, Quantity, Symbol, Timestamp};
