use crossbook_core::{Order, OrderId, Price, Quantity, Side, Symbol, Timestamp, Trade, TraderId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Inbound order submission, already validated for shape by the transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub order_id: OrderId,
    pub trader_id: TraderId,
    pub symbol: Symbol,
    pub price: Price,
    pub quantity: Quantity,
    pub side: Side,
}

impl SubmitRequest {
    pub fn new(
        order_id: impl Into<OrderId>,
        trader_id: impl Into<TraderId>,
        symbol: impl Into<Symbol>,
        price: Price,
        quantity: Quantity,
        side: Side,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            trader_id: trader_id.into(),
            symbol: symbol.into(),
            price,
            quantity,
            side,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubmitStatus {
    /// Accepted and resting, nothing matched
    Success,
    PartialFill,
    FullyFilled,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitOutcome {
    pub status: SubmitStatus,
    /// Volume-weighted price of the incoming order's fills, zero if none
    pub matched_price: Decimal,
    pub matched_quantity: Quantity,
    /// Every trade produced by this submission, including ones between
    /// resting orders that became crossable
    pub fills: Vec<Trade>,
    pub message: Option<String>,
    pub timestamp: Timestamp,
}

impl SubmitOutcome {
    pub fn error(message: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            status: SubmitStatus::Error,
            matched_price: Decimal::ZERO,
            matched_quantity: 0,
            fills: Vec::new(),
            message: Some(message.into()),
            timestamp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CancelStatus {
    Cancelled,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelOutcome {
    pub status: CancelStatus,
    pub message: Option<String>,
    pub timestamp: Timestamp,
}

impl CancelOutcome {
    pub fn cancelled(timestamp: Timestamp) -> Self {
        Self {
            status: CancelStatus::Cancelled,
            message: None,
            timestamp,
        }
    }

    pub fn error(message: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            status: CancelStatus::Error,
            message: Some(message.into()),
            timestamp,
        }
    }
}

/// Read-only view of one resting order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSnapshot {
    pub order_id: OrderId,
    pub trader_id: TraderId,
    pub symbol: Symbol,
    pub price: Price,
    pub quantity: Quantity,
    pub remaining_quantity: Quantity,
    pub is_buy: bool,
    /// Time priority, kept so merged views can re-sort stably
    pub timestamp: Timestamp,
}

impl From<&Order> for OrderSnapshot {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.order_id().to_string(),
            trader_id: order.trader_id().to_string(),
            symbol: order.symbol().to_string(),
            price: order.price(),
            quantity: order.quantity(),
            remaining_quantity: order.remaining_quantity(),
            is_buy: order.is_buy(),
            timestamp: order.timestamp(),
        }
    }
}

/// Active orders, best of book first on each side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub bids: Vec<OrderSnapshot>,
    pub asks: Vec<OrderSnapshot>,
    pub total_bids: usize,
    pub total_asks: usize,
    pub timestamp: Timestamp,
}

impl BookSnapshot {
    /// Build a snapshot, sorting bids by price descending and asks by price
    /// ascending. Equal prices keep time priority.
    pub fn new(mut bids: Vec<OrderSnapshot>, mut asks: Vec<OrderSnapshot>, timestamp: Timestamp) -> Self {
        bids.sort_by(|a, b| b.price.cmp(&a.price).then_with(|| a.timestamp.cmp(&b.timestamp)));
        asks.sort_by(|a, b| a.price.cmp(&b.price).then_with(|| a.timestamp.cmp(&b.timestamp)));
        Self {
            total_bids: bids.len(),
            total_asks: asks.len(),
            bids,
            asks,
            timestamp,
        }
    }
}

/// Port the transport adapters drive
///
/// Each call is atomic with respect to every other call on the same
/// gateway. Expected failures come back as `Error` statuses, never panics.
pub trait OrderGateway: Send + Sync {
    fn submit(&self, request: SubmitRequest) -> SubmitOutcome;

    fn cancel(&self, order_id: &str, side: Side) -> CancelOutcome;

    /// Snapshot of active orders, optionally restricted to one symbol
    fn view(&self, symbol: Option<&str>) -> BookSnapshot;

    fn name(&self) -> &str {
        "OrderGateway"
    }
}
