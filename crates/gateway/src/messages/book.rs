//! Order book snapshot messages

use crossbook_ports::{BookSnapshot, OrderSnapshot};
use serde::{Deserialize, Serialize};

use super::wire_timestamp;

/// GET /api/v1/book query; an empty symbol means every symbol
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookQuery {
    #[serde(default)]
    pub symbol: Option<String>,
}

impl BookQuery {
    pub fn symbol_filter(&self) -> Option<&str> {
        self.symbol.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// GET /ws/book query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamQuery {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub interval_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderMessage {
    pub order_id: String,
    pub trader_id: String,
    pub symbol: String,
    pub price: f64,
    pub quantity: i64,
    pub remaining_quantity: i64,
    pub is_buy: bool,
}

impl From<OrderSnapshot> for OrderMessage {
    fn from(order: OrderSnapshot) -> Self {
        Self {
            order_id: order.order_id,
            trader_id: order.trader_id,
            symbol: order.symbol,
            price: order.price.to_f64(),
            quantity: order.quantity,
            remaining_quantity: order.remaining_quantity,
            is_buy: order.is_buy,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBookResponse {
    pub bids: Vec<OrderMessage>,
    pub asks: Vec<OrderMessage>,
    pub total_bids: usize,
    pub total_asks: usize,
    pub timestamp: i64,
}

impl From<BookSnapshot> for OrderBookResponse {
    fn from(book: BookSnapshot) -> Self {
        Self {
            bids: book.bids.into_iter().map(OrderMessage::from).collect(),
            asks: book.asks.into_iter().map(OrderMessage::from).collect(),
            total_bids: book.total_bids,
            total_asks: book.total_asks,
            timestamp: wire_timestamp(book.timestamp),
        }
    }
}
