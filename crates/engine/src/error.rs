use crossbook_core::{OrderError, Side};
use crossbook_ports::MatchingError;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid order: {0}")]
    InvalidOrder(#[from] OrderError),

    #[error("Duplicate order id {order_id} on {side} side")]
    DuplicateOrder { order_id: String, side: Side },

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Internal matching fault: {0}")]
    Matching(#[from] MatchingError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
