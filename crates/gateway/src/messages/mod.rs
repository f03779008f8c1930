//! Wire message types

pub mod book;
pub mod order;

use crossbook_ports::{CancelStatus, SubmitStatus};
use serde::{Deserialize, Serialize};

pub use book::{BookQuery, OrderBookResponse, OrderMessage, StreamQuery};
pub use order::{CancelOrderRequest, CancelOrderResponse, FillMessage, SubmitOrderRequest, SubmitOrderResponse};

/// Operation status as it appears on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WireStatus {
    Success,
    PartialFill,
    FullyFilled,
    Cancelled,
    Error,
}

impl From<SubmitStatus> for WireStatus {
    fn from(status: SubmitStatus) -> Self {
        match status {
            SubmitStatus::Success => Self::Success,
            SubmitStatus::PartialFill => Self::PartialFill,
            SubmitStatus::FullyFilled => Self::FullyFilled,
            SubmitStatus::Error => Self::Error,
        }
    }
}

impl From<CancelStatus> for WireStatus {
    fn from(status: CancelStatus) -> Self {
        match status {
            CancelStatus::Cancelled => Self::Cancelled,
            CancelStatus::Error => Self::Error,
        }
    }
}

/// GET /api/v1/ping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingResponse {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: i32,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        ErrorResponse {
            code,
            message: message.into(),
        }
    }
}

/// Nanoseconds since the epoch
pub(crate) fn wire_timestamp(timestamp: crossbook_core::Timestamp) -> i64 {
    timestamp.timestamp_nanos_opt().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        let names: Vec<String> = [
            WireStatus::Success,
            WireStatus::PartialFill,
            WireStatus::FullyFilled,
            WireStatus::Cancelled,
            WireStatus::Error,
        ]
        .iter()
        .map(|s| serde_json::to_string(s).unwrap())
        .collect();

        assert_eq!(
            names,
            [r#""SUCCESS""#, r#""PARTIAL_FILL""#, r#""FULLY_FILLED""#, r#""CANCELLED""#, r#""ERROR""#]
        );
    }
}
