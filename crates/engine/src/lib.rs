//! Crossbook Engine
//!
//! The externally facing orchestration layer. Transport adapters talk to it
//! through the [`OrderGateway`] port:
//!
//! ```text
//!  transport adapter
//!        │ submit / cancel / view
//!        ▼
//!  ┌───────────────────────────┐      ┌───────────────────────────────┐
//!  │     MatchingService       │  or  │   ShardedMatchingService      │
//!  │  one Mutex, books keyed   │      │  N MatchingService shards,    │
//!  │  by symbol                │      │  symbol -> shard by strategy  │
//!  └─────────────┬─────────────┘      └───────────────────────────────┘
//!                │ lock held
//!                ▼
//!         OrderBook (bids / asks PriorityIndex)
//! ```
//!
//! Every operation runs to completion under its book lock. Nothing in this
//! crate is async.

pub mod config;
pub mod error;
pub mod ledger;
pub mod service;
pub mod sharded;

pub use config::{ConfigError, EngineConfig, SeedOrderConfig, ServerConfig, StreamConfig, TraderConfig};
pub use error::{EngineError, Result};
pub use ledger::TraderLedger;
pub use service::MatchingService;
pub use sharded::{ConsistentHashStrategy, ShardedMatchingService, ShardingStrategy};

// Re-export the port for convenience
pub use crossbook_ports::OrderGateway;
