//! Crossbook Matching
//!
//! The two data structures at the heart of the engine:
//!
//! - [`PriorityIndex`]: id-keyed table plus a priority queue over
//!   `(side-adjusted price, timestamp)`, giving O(log n) insert, lookup,
//!   delete and extract-best.
//! - [`OrderBook`]: one index per side and the extract/match/reinsert loop
//!   that enforces strict price-then-time priority.
//!
//! ```rust,ignore
//! use crossbook_matching::OrderBook;
//!
//! let mut book = OrderBook::new();
//! book.add_order(sell);
//! book.add_order(buy);
//! let report = book.match_orders()?;
//! ```

mod order_book;
mod priority_index;

pub use order_book::{MatchReport, OrderBook};
pub use priority_index::{PriorityIndex, PriorityKey};

// Re-export the error types from ports for convenience
pub use crossbook_ports::{MatchingError, MatchingResult};
