//! Crossbook Runner
//!
//! Wires the engine to its outer surfaces:
//!
//! - **Bootstrap**: builds a single or sharded engine from an [`EngineConfig`],
//!   registers traders and submits seed orders
//! - **Replay**: loads a batch order file, runs it through an engine and
//!   renders the resulting book
//!
//! ```text
//!   config.json ──► bootstrap ──► Arc<dyn OrderGateway> ──► gateway (HTTP / WS)
//!                                          ▲
//!   orders.json ──► replay ────────────────┘
//! ```

pub mod bootstrap;
pub mod error;
pub mod replay;

pub use bootstrap::{Bootstrap, apply_env_overrides};
pub use crossbook_engine::EngineConfig;
pub use error::{Result, RunnerError};
pub use replay::{ReplaySummary, format_outcome, load_orders, parse_orders, render_book, replay};
