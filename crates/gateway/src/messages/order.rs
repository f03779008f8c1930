//! Order submission and cancellation messages

use crossbook_core::{Price, Side, Trade};
use crossbook_ports::{CancelOutcome, SubmitOutcome, SubmitRequest};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::{WireStatus, wire_timestamp};
use crate::error::ApiError;

/// POST /api/v1/orders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitOrderRequest {
    pub order_id: String,
    pub trader_id: String,
    pub symbol: String,
    pub price: f64,
    pub quantity: i64,
    pub is_buy: bool,
}

impl SubmitOrderRequest {
    /// Check the request's shape and convert it for the engine
    pub fn validate(self) -> Result<SubmitRequest, ApiError> {
        for (name, value) in [
            ("order_id", &self.order_id),
            ("trader_id", &self.trader_id),
            ("symbol", &self.symbol),
        ] {
            if value.trim().is_empty() {
                return Err(ApiError::missing_parameter(name));
            }
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(ApiError::invalid_parameter("price", "must be a non-negative number"));
        }
        if self.quantity <= 0 {
            return Err(ApiError::invalid_parameter("quantity", "must be positive"));
        }
        let price = Price::from_f64(self.price)
            .ok_or_else(|| ApiError::invalid_parameter("price", "out of range"))?;

        Ok(SubmitRequest::new(
            self.order_id,
            self.trader_id,
            self.symbol,
            price,
            self.quantity,
            Side::from_is_buy(self.is_buy),
        ))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillMessage {
    pub buy_order_id: String,
    pub sell_order_id: String,
    pub price: f64,
    pub quantity: i64,
}

impl From<&Trade> for FillMessage {
    fn from(trade: &Trade) -> Self {
        Self {
            buy_order_id: trade.buy_order_id.clone(),
            sell_order_id: trade.sell_order_id.clone(),
            price: trade.price.to_f64(),
            quantity: trade.quantity,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitOrderResponse {
    pub status: WireStatus,
    pub matched_price: f64,
    pub matched_quantity: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fills: Vec<FillMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub timestamp: i64,
}

impl From<SubmitOutcome> for SubmitOrderResponse {
    fn from(outcome: SubmitOutcome) -> Self {
        Self {
            status: outcome.status.into(),
            matched_price: outcome.matched_price.to_f64().unwrap_or_default(),
            matched_quantity: outcome.matched_quantity,
            fills: outcome.fills.iter().map(FillMessage::from).collect(),
            message: outcome.message,
            timestamp: wire_timestamp(outcome.timestamp),
        }
    }
}

/// DELETE /api/v1/orders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelOrderRequest {
    pub order_id: String,
    pub is_buy: bool,
}

impl CancelOrderRequest {
    pub fn validate(&self) -> Result<Side, ApiError> {
        if self.order_id.trim().is_empty() {
            return Err(ApiError::missing_parameter("order_id"));
        }
        Ok(Side::from_is_buy(self.is_buy))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelOrderResponse {
    pub status: WireStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub timestamp: i64,
}

impl From<CancelOutcome> for CancelOrderResponse {
    fn from(outcome: CancelOutcome) -> Self {
        Self {
            status: outcome.status.into(),
            message: outcome.message,
            timestamp: wire_timestamp(outcome.timestamp),
        }
    }
}
