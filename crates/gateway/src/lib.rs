//! Crossbook Gateway
//!
//! Transport adapter for the matching engine. Translates HTTP/JSON and
//! WebSocket traffic into [`OrderGateway`] calls and back; it holds no
//! matching logic of its own.
//!
//! ## Endpoints
//!
//! ```text
//! GET    /api/v1/ping                     liveness
//! POST   /api/v1/orders                   submit   {order_id, trader_id, symbol, price, quantity, is_buy}
//! DELETE /api/v1/orders                   cancel   {order_id, is_buy}
//! GET    /api/v1/book?symbol=AAPL         snapshot of active orders
//! GET    /ws/book?symbol=&interval_ms=    snapshot pushed on a fixed interval
//! ```
//!
//! Malformed requests are answered with `400` and never reach the engine.
//! Engine outcomes, including engine-side errors such as an unknown order,
//! come back as `200` with a `status` field.

pub mod error;
pub mod messages;
pub mod rest;
pub mod server;
pub mod websocket;

// Re-export commonly used types
pub use crossbook_ports::OrderGateway;
pub use error::{ApiError, GatewayError};
pub use rest::{AppState, create_router};
pub use server::serve;
