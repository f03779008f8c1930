use crossbook_clock::MonotonicClock;
use crossbook_core::{Order, OrderId, Price, Quantity, Side, Symbol, Trade, Trader};
use crossbook_matching::{MatchReport, OrderBook};
use crossbook_ports::{
    BookSnapshot, CancelOutcome, Clock, OrderGateway, OrderSnapshot, SubmitOutcome, SubmitRequest,
    SubmitStatus,
};
use log::{debug, error, info};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{EngineError, Result};
use crate::ledger::TraderLedger;

/// Everything the service lock guards
#[derive(Debug, Default)]
struct ServiceState {
    /// One book per symbol
    books: HashMap<Symbol, OrderBook>,
    /// Where each resting order lives, for cancels that carry no symbol
    routes: HashMap<(Side, OrderId), Symbol>,
    trades: Vec<Trade>,
}

impl ServiceState {
    fn book_of(&self, order_id: &str, side: Side) -> Option<&OrderBook> {
        let symbol = self.routes.get(&(side, order_id.to_string()))?;
        self.books.get(symbol)
    }

    fn is_resting(&self, order_id: &str, side: Side) -> bool {
        self.book_of(order_id, side)
            .is_some_and(|book| book.contains(order_id, side))
    }

    /// Drop routes for orders that matching removed from `symbol`'s book
    fn forget_departed(&mut self, symbol: &str, report: &MatchReport) {
        let Some(book) = self.books.get(symbol) else {
            return;
        };
        let departed: Vec<(Side, OrderId)> = report
            .trades
            .iter()
            .flat_map(|t| {
                [
                    (Side::Buy, t.buy_order_id.clone()),
                    (Side::Sell, t.sell_order_id.clone()),
                ]
            })
            .chain(report.discarded.iter().map(|o| (o.side(), o.order_id().to_string())))
            .filter(|(side, id)| !book.contains(id, *side))
            .collect();

        for key in departed {
            if self.routes.get(&key).is_some_and(|s| s == symbol) {
                self.routes.remove(&key);
            }
        }
    }
}

/// Lock-guarded matching service
///
/// One mutex covers every book the service owns, so submit, cancel and view
/// are linearizable and each order's timestamp is drawn inside the critical
/// section. That lock is the throughput ceiling; see
/// [`crate::ShardedMatchingService`] for the symbol-sharded variant.
pub struct MatchingService<C: Clock = MonotonicClock> {
    state: Mutex<ServiceState>,
    clock: C,
    ledger: Arc<TraderLedger>,
}

impl MatchingService<MonotonicClock> {
    pub fn new() -> Self {
        Self::with_clock(MonotonicClock::new())
    }
}

impl Default for MatchingService<MonotonicClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> MatchingService<C> {
    pub fn with_clock(clock: C) -> Self {
        Self::with_ledger(clock, Arc::new(TraderLedger::new()))
    }

    /// Create a service that settles against a shared ledger
    pub fn with_ledger(clock: C, ledger: Arc<TraderLedger>) -> Self {
        Self {
            state: Mutex::new(ServiceState::default()),
            clock,
            ledger,
        }
    }

    pub fn ledger(&self) -> &Arc<TraderLedger> {
        &self.ledger
    }

    pub fn register_trader(&self, trader: Trader) {
        self.ledger.register(trader);
    }

    pub fn trader(&self, trader_id: &str) -> Option<Trader> {
        self.ledger.get(trader_id)
    }

    /// Submit an order and cross its book
    ///
    /// Fails on invalid input, on an id already resting on the same side,
    /// or on a matching invariant fault.
    pub fn try_submit(&self, request: SubmitRequest) -> Result<SubmitOutcome> {
        let mut state = self.state.lock();
        let timestamp = self.clock.now();

        if state.is_resting(&request.order_id, request.side) {
            return Err(EngineError::DuplicateOrder {
                order_id: request.order_id,
                side: request.side,
            });
        }

        let order = Order::new(
            request.order_id,
            request.trader_id,
            request.symbol,
            request.price,
            request.quantity,
            request.side,
            timestamp,
        )?;
        let (order_id, side, original) = (order.order_id().to_string(), order.side(), order.quantity());
        let symbol = order.symbol().to_string();

        debug!("Submit {} {} {} {}@{}", symbol, side, order_id, original, order.price());

        let book = state.books.entry(symbol.clone()).or_default();
        book.add_order(order);
        let report = match book.match_orders() {
            Ok(report) => report,
            Err(err) => {
                error!("Matching fault on {} after submit of {}: {}", symbol, order_id, err);
                book.cancel_order(&order_id, side);
                return Err(err.into());
            }
        };
        let remaining = book
            .get_order(&order_id, side)
            .map_or(0, Order::remaining_quantity);

        state.routes.insert((side, order_id.clone()), symbol.clone());
        state.forget_departed(&symbol, &report);

        for trade in &report.trades {
            if !self.ledger.settle(trade) {
                debug!("Trade {} left unsettled: trader not registered", trade.id);
            }
        }

        let own_fills: Vec<&Trade> = report
            .trades
            .iter()
            .filter(|t| match side {
                Side::Buy => t.buy_order_id == order_id,
                Side::Sell => t.sell_order_id == order_id,
            })
            .collect();
        let matched_quantity: Quantity = own_fills.iter().map(|t| t.quantity).sum();
        let matched_price = volume_weighted_price(&own_fills, matched_quantity);

        let status = if remaining == 0 {
            SubmitStatus::FullyFilled
        } else if remaining < original {
            SubmitStatus::PartialFill
        } else {
            SubmitStatus::Success
        };

        state.trades.extend(report.trades.iter().cloned());

        Ok(SubmitOutcome {
            status,
            matched_price,
            matched_quantity,
            fills: report.trades,
            message: None,
            timestamp,
        })
    }

    /// Remove a resting order
    pub fn try_cancel(&self, order_id: &str, side: Side) -> Result<Order> {
        let mut state = self.state.lock();
        let key = (side, order_id.to_string());

        let canceled = match state.routes.remove(&key) {
            Some(symbol) => state
                .books
                .get_mut(&symbol)
                .and_then(|book| book.cancel_order(order_id, side)),
            None => None,
        };

        match canceled {
            Some(order) => {
                debug!("Cancel {} {} ({} remaining)", side, order_id, order.remaining_quantity());
                Ok(order)
            }
            None => Err(EngineError::OrderNotFound(order_id.to_string())),
        }
    }

    /// Active orders, best first, optionally for one symbol only
    pub fn snapshot(&self, symbol: Option<&str>) -> BookSnapshot {
        let state = self.state.lock();
        let timestamp = self.clock.now();

        let mut bids = Vec::new();
        let mut asks = Vec::new();
        let books = state
            .books
            .iter()
            .filter(|(s, _)| symbol.is_none_or(|wanted| wanted == s.as_str()));
        for (_, book) in books {
            bids.extend(book.active_orders(Side::Buy).into_iter().map(OrderSnapshot::from));
            asks.extend(book.active_orders(Side::Sell).into_iter().map(OrderSnapshot::from));
        }

        BookSnapshot::new(bids, asks, timestamp)
    }

    /// Whether the order is out of play; unknown ids count as canceled
    pub fn is_order_canceled(&self, order_id: &str, side: Side) -> bool {
        let state = self.state.lock();
        state
            .book_of(order_id, side)
            .is_none_or(|book| book.is_order_canceled(order_id, side))
    }

    /// True while the order sits in a book
    pub fn is_resting(&self, order_id: &str, side: Side) -> bool {
        self.state.lock().is_resting(order_id, side)
    }

    pub fn order(&self, order_id: &str, side: Side) -> Option<Order> {
        let state = self.state.lock();
        state
            .book_of(order_id, side)
            .and_then(|book| book.get_order(order_id, side))
            .cloned()
    }

    pub fn quantity_at_price(&self, symbol: &str, price: Price, side: Side) -> Quantity {
        let state = self.state.lock();
        state
            .books
            .get(symbol)
            .map_or(0, |book| book.get_quantity_at_price(price, side))
    }

    /// Every trade executed so far, oldest first
    pub fn trades(&self) -> Vec<Trade> {
        self.state.lock().trades.clone()
    }

    /// Symbols that have a book
    pub fn symbols(&self) -> Vec<Symbol> {
        let mut symbols: Vec<Symbol> = self.state.lock().books.keys().cloned().collect();
        symbols.sort();
        symbols
    }
}

/// Average fill price weighted by quantity, 0 when nothing filled
///
/// Each fill's notional fits a `Decimal`, but their sum may not. Past that
/// point the average is taken over quantity shares instead, which stays
/// bounded by the highest fill price.
fn volume_weighted_price(fills: &[&Trade], quantity: Quantity) -> Decimal {
    if quantity == 0 {
        return Decimal::ZERO;
    }
    let total = Decimal::from(quantity);
    let exact = fills
        .iter()
        .try_fold(Decimal::ZERO, |sum, t| sum.checked_add(t.checked_notional()?))
        .and_then(|notional| notional.checked_div(total));

    let average = exact.unwrap_or_else(|| {
        debug!("Fill notional overflows, averaging over quantity shares");
        fills
            .iter()
            .filter_map(|t| {
                let share = Decimal::from(t.quantity).checked_div(total)?;
                t.price.to_decimal().checked_mul(share)
            })
            .fold(Decimal::ZERO, |sum, part| sum.saturating_add(part))
    });
    average.round_dp(crossbook_core::values::PRICE_DECIMALS)
}

impl<C: Clock> OrderGateway for MatchingService<C> {
    fn submit(&self, request: SubmitRequest) -> SubmitOutcome {
        let order_id = request.order_id.clone();
        self.try_submit(request).unwrap_or_else(|err| {
            info!("Rejected order {}: {}", order_id, err);
            SubmitOutcome::error(err.to_string(), self.clock.now())
        })
    }

    fn cancel(&self, order_id: &str, side: Side) -> CancelOutcome {
        match self.try_cancel(order_id, side) {
            Ok(_) => CancelOutcome::cancelled(self.clock.now()),
            Err(err) => CancelOutcome::error(err.to_string(), self.clock.now()),
        }
    }

    fn view(&self, symbol: Option<&str>) -> BookSnapshot {
        self.snapshot(symbol)
    }

    fn name(&self) -> &str {
        "MatchingService"
    }
}
