//! Batch order replay
//!
//! Order files share the seed order layout:
//!
//! ```json
//! { "orders": [ { "order_id": "B1", "trader_id": "T1", "symbol": "AAPL",
//!                 "price": 150.0, "quantity": 100, "is_buy": true } ] }
//! ```

use crossbook_engine::{OrderGateway, SeedOrderConfig};
use crossbook_ports::{BookSnapshot, OrderSnapshot, SubmitOutcome, SubmitRequest, SubmitStatus};
use log::debug;
use serde::Deserialize;
use std::fmt::Write;
use std::path::Path;

use crate::error::{Result, RunnerError};

#[derive(Debug, Deserialize)]
struct OrderFile {
    orders: Vec<SeedOrderConfig>,
}

/// Parse an order file body
pub fn parse_orders(json: &str) -> Result<Vec<SubmitRequest>> {
    let file: OrderFile =
        serde_json::from_str(json).map_err(|e| RunnerError::InvalidOrders(e.to_string()))?;

    let requests = file
        .orders
        .iter()
        .map(|order| order.to_request())
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(requests)
}

/// Read and parse an order file
pub fn load_orders(path: impl AsRef<Path>) -> Result<Vec<SubmitRequest>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| RunnerError::OrderFile {
        path: path.display().to_string(),
        error: e.to_string(),
    })?;
    parse_orders(&content)
}

/// Totals over one replay run
#[derive(Debug, Default)]
pub struct ReplaySummary {
    /// Each order id with its outcome, in submission order
    pub outcomes: Vec<(String, SubmitOutcome)>,
    pub rejected: usize,
    pub trades: usize,
    pub matched_quantity: i64,
}

impl ReplaySummary {
    pub fn submitted(&self) -> usize {
        self.outcomes.len()
    }
}

/// Submit every request in order
pub fn replay(gateway: &dyn OrderGateway, requests: Vec<SubmitRequest>) -> ReplaySummary {
    let mut summary = ReplaySummary::default();
    for request in requests {
        let order_id = request.order_id.clone();
        let outcome = gateway.submit(request);
        debug!("Replayed {}: {:?}", order_id, outcome.status);

        if outcome.status == SubmitStatus::Error {
            summary.rejected += 1;
        }
        summary.trades += outcome.fills.len();
        summary.matched_quantity += outcome.matched_quantity;
        summary.outcomes.push((order_id, outcome));
    }
    summary
}

/// One line per submission for the console
pub fn format_outcome(order_id: &str, outcome: &SubmitOutcome) -> String {
    match outcome.status {
        SubmitStatus::Error => format!(
            "{:<12} ERROR         {}",
            order_id,
            outcome.message.as_deref().unwrap_or("")
        ),
        status => format!(
            "{:<12} {:<13} matched {} @ {}",
            order_id,
            format!("{:?}", status),
            outcome.matched_quantity,
            outcome.matched_price
        ),
    }
}

/// Render a snapshot as a fixed-width table, best prices first
pub fn render_book(book: &BookSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<4}  {:<12}  {:<10}  {:<8}  {:>18}  {:>10}  {:>10}",
        "SIDE", "ORDER", "TRADER", "SYMBOL", "PRICE", "REMAINING", "QUANTITY"
    );
    for order in book.bids.iter().chain(book.asks.iter()) {
        write_row(&mut out, order);
    }

    let bid_qty: i64 = book.bids.iter().map(|o| o.remaining_quantity).sum();
    let ask_qty: i64 = book.asks.iter().map(|o| o.remaining_quantity).sum();
    let _ = writeln!(
        out,
        "bids: {} ({} remaining)  asks: {} ({} remaining)",
        book.total_bids, bid_qty, book.total_asks, ask_qty
    );
    out
}

fn write_row(out: &mut String, order: &OrderSnapshot) {
    let side = if order.is_buy { "BUY" } else { "SELL" };
    let _ = writeln!(
        out,
        "{:<4}  {:<12}  {:<10}  {:<8}  {:>18}  {:>10}  {:>10}",
        side,
        order.order_id,
        order.trader_id,
        order.symbol,
        order.price.to_string(),
        order.remaining_quantity,
        order.quantity
    );
}
