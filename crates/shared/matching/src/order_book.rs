use crossbook_core::{Order, OrderId, Price, Quantity, Side, Trade};
use crossbook_ports::MatchingResult;
use log::{debug, warn};

use crate::priority_index::PriorityIndex;

/// Result of one [`OrderBook::match_orders`] pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchReport {
    /// Trades in execution order
    pub trades: Vec<Trade>,
    /// Orders pulled out of either index during the pass
    pub extractions: usize,
    /// Canceled or empty orders dropped from the book
    pub discarded: Vec<Order>,
}

impl MatchReport {
    pub fn matched_quantity(&self) -> Quantity {
        self.trades.iter().map(|t| t.quantity).sum()
    }
}

/// Two-sided price-time priority book
///
/// Bids and asks each live in their own [`PriorityIndex`]. Adding an order
/// never matches it; [`OrderBook::match_orders`] is the separate step that
/// crosses the book.
///
/// Cancellation deletes the order outright. Orders that are already canceled
/// or empty when the matching loop reaches them are discarded.
#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    bids: PriorityIndex<OrderId, Order>,
    asks: PriorityIndex<OrderId, Order>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    fn index(&self, side: Side) -> &PriorityIndex<OrderId, Order> {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    fn index_mut(&mut self, side: Side) -> &mut PriorityIndex<OrderId, Order> {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }

    /// Place the order on its own side, keyed by its original price and time
    fn insert(&mut self, order: Order) {
        let id = order.order_id().to_string();
        let (price, timestamp, side) = (order.price(), order.timestamp(), order.side());
        self.index_mut(side).put(id, price, timestamp, order, side);
    }

    /// Add an order to its side of the book without matching
    ///
    /// Returns `false` and leaves the book untouched if the order's quantity
    /// is not positive.
    pub fn add_order(&mut self, order: Order) -> bool {
        if order.quantity() <= 0 {
            warn!("Rejecting order {} with quantity {}", order.order_id(), order.quantity());
            return false;
        }
        debug!(
            "Adding {} order {} {}@{}",
            order.side(),
            order.order_id(),
            order.quantity(),
            order.price()
        );
        self.insert(order);
        true
    }

    /// Whether `buy` and `sell` can trade against each other
    pub fn is_match_possible(buy: &Order, sell: &Order) -> bool {
        if !buy.is_buy() || sell.is_buy() {
            warn!(
                "Match check called with {} as buy and {} as sell",
                buy.side(),
                sell.side()
            );
            return false;
        }

        buy.is_active()
            && sell.is_active()
            && buy.symbol() == sell.symbol()
            && buy.price() >= sell.price()
    }

    /// Trade `buy` against `sell`, both already taken out of the book
    ///
    /// Executes `min(remaining)` at the resting order's price, the resting
    /// order being the one with the earlier timestamp. Any side left with
    /// quantity goes back in at its original priority.
    ///
    /// If the pair cannot match, both are put back and `Ok(None)` is
    /// returned. Both orders are active here, so reducing each by the smaller
    /// remaining quantity cannot fail.
    pub fn process_match(&mut self, mut buy: Order, mut sell: Order) -> MatchingResult<Option<Trade>> {
        if !Self::is_match_possible(&buy, &sell) {
            self.insert(buy);
            self.insert(sell);
            return Ok(None);
        }

        let quantity = buy.remaining_quantity().min(sell.remaining_quantity());
        buy.reduce_quantity(quantity)?;
        sell.reduce_quantity(quantity)?;

        let (resting, incoming) = if buy.timestamp() <= sell.timestamp() {
            (&buy, &sell)
        } else {
            (&sell, &buy)
        };
        let trade = Trade::new_with_time(&buy, &sell, resting.price(), quantity, incoming.timestamp());

        debug!(
            "Matched {} x {} @ {} (buy {} / sell {})",
            trade.symbol, quantity, trade.price, trade.buy_order_id, trade.sell_order_id
        );

        if buy.remaining_quantity() > 0 {
            self.insert(buy);
        }
        if sell.remaining_quantity() > 0 {
            self.insert(sell);
        }
        Ok(Some(trade))
    }

    /// Cross the book until the best bid and best ask no longer match
    ///
    /// Each pass takes the best order from each side. Dead orders are
    /// dropped and the other order goes back. The first live pair that
    /// cannot match is put back and ends the loop, since nothing deeper on
    /// either side can cross when the best pair does not.
    pub fn match_orders(&mut self) -> MatchingResult<MatchReport> {
        let mut report = MatchReport::default();

        while !self.bids.is_empty() && !self.asks.is_empty() {
            let Some(bid) = self.bids.delete_min() else {
                break;
            };
            let Some(ask) = self.asks.delete_min() else {
                self.insert(bid);
                break;
            };
            report.extractions += 2;

            if !bid.is_active() || !ask.is_active() {
                for order in [bid, ask] {
                    if order.is_active() {
                        self.insert(order);
                    } else {
                        debug!("Discarding inactive order {}", order.order_id());
                        report.discarded.push(order);
                    }
                }
                continue;
            }

            if !Self::is_match_possible(&bid, &ask) {
                self.insert(bid);
                self.insert(ask);
                break;
            }

            match self.process_match(bid, ask)? {
                Some(trade) => report.trades.push(trade),
                None => break,
            }
        }

        Ok(report)
    }

    /// Remove an active order from the book
    ///
    /// Returns the order, now marked canceled. Unknown ids and orders that
    /// were already canceled return `None`; the latter are purged too.
    pub fn cancel_order(&mut self, order_id: &str, side: Side) -> Option<Order> {
        let mut order = self.index_mut(side).delete(order_id)?;
        if order.is_canceled() {
            return None;
        }
        order.cancel();
        debug!("Canceled {} order {}", side, order_id);
        Some(order)
    }

    /// Whether the order is out of play
    ///
    /// Ids the book does not hold count as canceled.
    pub fn is_order_canceled(&self, order_id: &str, side: Side) -> bool {
        self.index(side)
            .get(order_id)
            .is_none_or(|order| order.is_canceled())
    }

    /// Total remaining quantity of active orders at exactly `price`
    pub fn get_quantity_at_price(&self, price: Price, side: Side) -> Quantity {
        self.index(side)
            .values()
            .filter(|o| o.is_active() && o.price() == price)
            .map(Order::remaining_quantity)
            .sum()
    }

    pub fn get_order(&self, order_id: &str, side: Side) -> Option<&Order> {
        self.index(side).get(order_id)
    }

    pub fn contains(&self, order_id: &str, side: Side) -> bool {
        self.index(side).contains(order_id)
    }

    /// Best-priority bid, whether or not it is still active
    pub fn best_bid(&self) -> Option<&Order> {
        self.bids.peek_min()
    }

    /// Best-priority ask, whether or not it is still active
    pub fn best_ask(&self) -> Option<&Order> {
        self.asks.peek_min()
    }

    /// Active orders on one side, best first
    pub fn active_orders(&self, side: Side) -> Vec<&Order> {
        self.index(side)
            .sorted_values()
            .into_iter()
            .filter(|o| o.is_active())
            .collect()
    }

    pub fn bid_count(&self) -> usize {
        self.bids.len()
    }

    pub fn ask_count(&self) -> usize {
        self.asks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use crossbook_core::Timestamp;

    fn at(nanos: i64) -> Timestamp {
        DateTime::<Utc>::from_timestamp_nanos(nanos)
    }

    fn order(id: &str, symbol: &str, price: &str, qty: Quantity, side: Side, t: i64) -> Order {
        Order::new(id, "T1", symbol, Price::parse(price).unwrap(), qty, side, at(t)).unwrap()
    }

    fn buy(id: &str, price: &str, qty: Quantity, t: i64) -> Order {
        order(id, "AAPL", price, qty, Side::Buy, t)
    }

    fn sell(id: &str, price: &str, qty: Quantity, t: i64) -> Order {
        order(id, "AAPL", price, qty, Side::Sell, t)
    }

    fn remaining(book: &OrderBook, id: &str, side: Side) -> Option<Quantity> {
        book.get_order(id, side).map(Order::remaining_quantity)
    }

    #[test]
    fn test_add_order_does_not_match() {
        let mut book = OrderBook::new();
        assert!(book.add_order(sell("S1", "100", 50, 1)));
        assert!(book.add_order(buy("B1", "102", 50, 2)));

        assert_eq!(book.bid_count(), 1);
        assert_eq!(book.ask_count(), 1);
    }

    #[test]
    fn test_price_crossing_match_clears_both_sides() {
        let mut book = OrderBook::new();
        book.add_order(sell("S1", "100.0", 50, 1));
        book.add_order(buy("B1", "102.0", 50, 2));

        let report = book.match_orders().unwrap();

        assert_eq!(report.trades.len(), 1);
        assert_eq!(report.trades[0].quantity, 50);
        assert_eq!(book.bid_count(), 0);
        assert_eq!(book.ask_count(), 0);
    }

    #[test]
    fn test_partial_fill_leaves_remainder_resting() {
        let mut book = OrderBook::new();
        book.add_order(sell("S1", "100.0", 50, 1));
        book.add_order(buy("B1", "100.0", 75, 2));

        book.match_orders().unwrap();

        assert_eq!(book.ask_count(), 0);
        assert_eq!(book.bid_count(), 1);
        assert_eq!(remaining(&book, "B1", Side::Buy), Some(25));
    }

    #[test]
    fn test_executes_at_resting_price() {
        // Resting sell, aggressive buy: trade at the sell price
        let mut book = OrderBook::new();
        book.add_order(sell("S1", "100", 10, 1));
        book.add_order(buy("B1", "102", 10, 2));
        let report = book.match_orders().unwrap();
        assert_eq!(report.trades[0].price, Price::from_int(100));
        assert_eq!(report.trades[0].timestamp, at(2));

        // Resting buy, aggressive sell: trade at the buy price
        let mut book = OrderBook::new();
        book.add_order(buy("B1", "102", 10, 1));
        book.add_order(sell("S1", "100", 10, 2));
        let report = book.match_orders().unwrap();
        assert_eq!(report.trades[0].price, Price::from_int(102));
    }

    #[test]
    fn test_higher_bid_matches_first_regardless_of_insertion_order() {
        let mut book = OrderBook::new();
        book.add_order(buy("LOW", "101", 10, 1));
        book.add_order(buy("HIGH", "102", 10, 2));
        book.add_order(sell("S1", "100", 10, 3));

        let report = book.match_orders().unwrap();

        assert_eq!(report.trades.len(), 1);
        assert_eq!(report.trades[0].buy_order_id, "HIGH");
        assert_eq!(remaining(&book, "LOW", Side::Buy), Some(10));
        assert!(!book.contains("HIGH", Side::Buy));
    }

    #[test]
    fn test_equal_price_matches_earlier_timestamp_first() {
        let mut book = OrderBook::new();
        book.add_order(buy("LATE", "100", 10, 5));
        book.add_order(buy("EARLY", "100", 10, 4));
        book.add_order(sell("S1", "100", 10, 6));

        let report = book.match_orders().unwrap();

        assert_eq!(report.trades[0].buy_order_id, "EARLY");
        assert_eq!(remaining(&book, "LATE", Side::Buy), Some(10));
    }

    #[test]
    fn test_sweeps_multiple_levels() {
        let _ = env_logger::try_init();

        let mut book = OrderBook::new();
        book.add_order(buy("B1", "150", 100, 1));
        book.add_order(buy("B2", "151", 50, 2));
        book.add_order(sell("S1", "149", 75, 3));
        book.add_order(sell("S2", "150", 50, 4));

        let report = book.match_orders().unwrap();

        // B2 takes 50 of S1, B1 takes the other 25 of S1 then 50 of S2
        let fills: Vec<_> = report
            .trades
            .iter()
            .map(|t| (t.buy_order_id.as_str(), t.sell_order_id.as_str(), t.quantity, t.price))
            .collect();
        assert_eq!(
            fills,
            [
                ("B2", "S1", 50, Price::from_int(151)),
                ("B1", "S1", 25, Price::from_int(150)),
                ("B1", "S2", 50, Price::from_int(150)),
            ]
        );
        assert_eq!(remaining(&book, "B1", Side::Buy), Some(25));
        assert_eq!(book.bid_count(), 1);
        assert_eq!(book.ask_count(), 0);
    }

    #[test]
    fn test_partially_filled_order_keeps_time_priority() {
        let mut book = OrderBook::new();
        book.add_order(buy("FIRST", "100", 30, 1));
        book.add_order(buy("SECOND", "100", 30, 2));
        book.add_order(sell("S1", "100", 10, 3));
        book.match_orders().unwrap();
        assert_eq!(remaining(&book, "FIRST", Side::Buy), Some(20));

        book.add_order(sell("S2", "100", 25, 4));
        let report = book.match_orders().unwrap();

        assert_eq!(report.trades[0].buy_order_id, "FIRST");
        assert_eq!(report.trades[0].quantity, 20);
        assert_eq!(report.trades[1].buy_order_id, "SECOND");
        assert_eq!(report.trades[1].quantity, 5);
        assert_eq!(remaining(&book, "SECOND", Side::Buy), Some(25));
    }

    #[test]
    fn test_canceled_order_never_matches() {
        let mut book = OrderBook::new();
        book.add_order(buy("B1", "101", 10, 1));
        book.add_order(buy("B2", "100", 10, 2));

        let canceled = book.cancel_order("B1", Side::Buy).unwrap();
        assert!(canceled.is_canceled());
        assert_eq!(canceled.remaining_quantity(), 10);
        assert!(book.is_order_canceled("B1", Side::Buy));

        book.add_order(sell("S1", "100", 10, 3));
        let report = book.match_orders().unwrap();

        assert_eq!(report.trades.len(), 1);
        assert_eq!(report.trades[0].buy_order_id, "B2");
        assert!(book.is_order_canceled("B1", Side::Buy));
    }

    #[test]
    fn test_is_order_canceled_distinguishes_live_and_absent() {
        let mut book = OrderBook::new();
        book.add_order(buy("B1", "100", 10, 1));

        assert!(!book.is_order_canceled("B1", Side::Buy));
        // Unknown id on either side reads as canceled
        assert!(book.is_order_canceled("NOPE", Side::Buy));
        // Same id on the other side is a different order
        assert!(book.is_order_canceled("B1", Side::Sell));
    }

    #[test]
    fn test_cancel_unknown_or_twice_returns_none() {
        let mut book = OrderBook::new();
        book.add_order(sell("S1", "100", 10, 1));

        assert!(book.cancel_order("S1", Side::Buy).is_none());
        assert!(book.cancel_order("S1", Side::Sell).is_some());
        assert!(book.cancel_order("S1", Side::Sell).is_none());
    }

    #[test]
    fn test_inactive_orders_are_discarded_by_matching() {
        let mut book = OrderBook::new();
        let mut dead = buy("DEAD", "105", 10, 1);
        dead.cancel();
        book.add_order(dead);
        book.add_order(buy("LIVE", "100", 10, 2));
        book.add_order(sell("S1", "100", 10, 3));

        let report = book.match_orders().unwrap();

        assert_eq!(report.discarded.len(), 1);
        assert_eq!(report.discarded[0].order_id(), "DEAD");
        assert_eq!(report.trades.len(), 1);
        assert_eq!(report.trades[0].buy_order_id, "LIVE");
        assert!(book.is_empty());
    }

    #[test]
    fn test_no_cross_symbol_matching() {
        let mut book = OrderBook::new();
        book.add_order(order("B1", "AAPL", "150", 5, Side::Buy, 1));
        book.add_order(order("S1", "MSFT", "150", 5, Side::Sell, 2));

        let report = book.match_orders().unwrap();

        assert!(report.trades.is_empty());
        assert_eq!(remaining(&book, "B1", Side::Buy), Some(5));
        assert_eq!(remaining(&book, "S1", Side::Sell), Some(5));
    }

    #[test]
    fn test_no_match_terminates_after_one_pair() {
        let mut book = OrderBook::new();
        for i in 0..500 {
            book.add_order(buy(&format!("B{i}"), &format!("{}", 90 - (i % 10)), 1, i));
            book.add_order(sell(&format!("S{i}"), &format!("{}", 100 + (i % 10)), 1, 1_000 + i));
        }

        let report = book.match_orders().unwrap();

        assert!(report.trades.is_empty());
        assert!(report.extractions <= 2);
        assert_eq!(book.bid_count(), 500);
        assert_eq!(book.ask_count(), 500);
    }

    #[test]
    fn test_matching_settled_book_is_idempotent() {
        let mut book = OrderBook::new();
        book.add_order(buy("B1", "99", 10, 1));
        book.add_order(buy("B2", "98", 5, 2));
        book.add_order(sell("S1", "101", 7, 3));

        let bids_before: Vec<Order> = book.active_orders(Side::Buy).into_iter().cloned().collect();
        let asks_before: Vec<Order> = book.active_orders(Side::Sell).into_iter().cloned().collect();

        for _ in 0..3 {
            let report = book.match_orders().unwrap();
            assert!(report.trades.is_empty());
            assert!(report.discarded.is_empty());
        }

        let bids_after: Vec<Order> = book.active_orders(Side::Buy).into_iter().cloned().collect();
        let asks_after: Vec<Order> = book.active_orders(Side::Sell).into_iter().cloned().collect();
        assert_eq!(bids_before, bids_after);
        assert_eq!(asks_before, asks_after);
    }

    #[test]
    fn test_empty_book_matches_nothing() {
        let mut book = OrderBook::new();
        let report = book.match_orders().unwrap();
        assert_eq!(report, MatchReport::default());

        book.add_order(buy("B1", "100", 1, 1));
        let report = book.match_orders().unwrap();
        assert_eq!(report.extractions, 0);
    }

    #[test]
    fn test_quantity_at_price_is_exact_and_skips_inactive() {
        let mut book = OrderBook::new();
        book.add_order(buy("B1", "100.10", 10, 1));
        book.add_order(buy("B2", "100.1", 5, 2));
        book.add_order(buy("B3", "100.11", 7, 3));
        book.add_order(buy("B4", "100.10", 3, 4));
        book.cancel_order("B4", Side::Buy);

        assert_eq!(book.get_quantity_at_price(Price::parse("100.1").unwrap(), Side::Buy), 15);
        assert_eq!(book.get_quantity_at_price(Price::parse("100.1").unwrap(), Side::Sell), 0);
        assert_eq!(book.get_quantity_at_price(Price::from_f64(100.11).unwrap(), Side::Buy), 7);
    }

    #[test]
    fn test_is_match_possible_rules() {
        let b = buy("B", "100", 1, 1);
        let s = sell("S", "100", 1, 2);
        assert!(OrderBook::is_match_possible(&b, &s));
        assert!(!OrderBook::is_match_possible(&b, &sell("S", "100.01", 1, 2)));
        assert!(!OrderBook::is_match_possible(&b, &order("S", "MSFT", "99", 1, Side::Sell, 2)));
        // Roles swapped
        assert!(!OrderBook::is_match_possible(&s, &b));
        assert!(!OrderBook::is_match_possible(&b, &buy("B2", "99", 1, 2)));

        let mut canceled = s.clone();
        canceled.cancel();
        assert!(!OrderBook::is_match_possible(&b, &canceled));
    }

    #[test]
    fn test_process_match_without_cross_restores_both() {
        let mut book = OrderBook::new();
        let result = book
            .process_match(buy("B1", "99", 5, 1), sell("S1", "100", 5, 2))
            .unwrap();

        assert!(result.is_none());
        assert_eq!(remaining(&book, "B1", Side::Buy), Some(5));
        assert_eq!(remaining(&book, "S1", Side::Sell), Some(5));
    }

    #[test]
    fn test_best_bid_and_ask() {
        let mut book = OrderBook::new();
        assert!(book.best_bid().is_none());
        book.add_order(buy("B1", "99", 5, 1));
        book.add_order(buy("B2", "99.5", 5, 2));
        book.add_order(sell("S1", "101", 5, 3));
        book.add_order(sell("S2", "100.5", 5, 4));

        assert_eq!(book.best_bid().map(Order::order_id), Some("B2"));
        assert_eq!(book.best_ask().map(Order::order_id), Some("S2"));
    }
}
