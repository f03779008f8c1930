use thiserror::Error;

use crate::values::Quantity;

/// Validation and invariant errors raised by [`crate::Order`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error("Order quantity must be positive, got {0}")]
    InvalidQuantity(Quantity),

    #[error("Order price must be non-negative, got {0}")]
    NegativePrice(String),

    #[error("Order notional {price} x {quantity} is out of range")]
    NotionalOverflow { price: String, quantity: Quantity },

    #[error("Reduce amount must be positive, got {0}")]
    InvalidReduction(Quantity),

    #[error("Cannot reduce {requested} from order {order_id} with {remaining} remaining")]
    Overfill {
        order_id: String,
        requested: Quantity,
        remaining: Quantity,
    },
}

pub type OrderResult<T> = std::result::Result<T, OrderError>;
