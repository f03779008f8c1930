use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::{Side, TraderId};
use crate::error::{OrderError, OrderResult};
use crate::values::{Price, Quantity, Symbol, Timestamp};

/// Caller-assigned order identifier, unique per side of a book
pub type OrderId = String;

/// A single limit order
///
/// Identity (`order_id`, `trader_id`, `symbol`, `side`, `price`, `quantity`,
/// `timestamp`) is fixed at construction. Only `remaining_quantity` and the
/// canceled flag change afterwards, through [`Order::reduce_quantity`] and
/// [`Order::cancel`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    order_id: OrderId,
    trader_id: TraderId,
    symbol: Symbol,
    price: Price,
    quantity: Quantity,
    remaining_quantity: Quantity,
    side: Side,
    timestamp: Timestamp,
    canceled: bool,
}

impl Order {
    /// Create a new order with a clock-provided timestamp
    ///
    /// Fails if `quantity <= 0`, the price is negative, or `price * quantity`
    /// does not fit a `Decimal`; such an order never exists and so can never
    /// reach a book. Any trade against it is then bounded by that notional.
    pub fn new(
        order_id: impl Into<OrderId>,
        trader_id: impl Into<TraderId>,
        symbol: impl Into<Symbol>,
        price: Price,
        quantity: Quantity,
        side: Side,
        timestamp: Timestamp,
    ) -> OrderResult<Self> {
        if quantity <= 0 {
            return Err(OrderError::InvalidQuantity(quantity));
        }
        if price.is_negative() {
            return Err(OrderError::NegativePrice(price.to_string()));
        }
        if price.checked_notional(quantity).is_none() {
            return Err(OrderError::NotionalOverflow {
                price: price.to_string(),
                quantity,
            });
        }

        Ok(Self {
            order_id: order_id.into(),
            trader_id: trader_id.into(),
            symbol: symbol.into(),
            price,
            quantity,
            remaining_quantity: quantity,
            side,
            timestamp,
            canceled: false,
        })
    }

    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    pub fn trader_id(&self) -> &str {
        &self.trader_id
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn price(&self) -> Price {
        self.price
    }

    /// Original quantity, immutable after creation
    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn remaining_quantity(&self) -> Quantity {
        self.remaining_quantity
    }

    /// Quantity filled so far
    pub fn filled_quantity(&self) -> Quantity {
        self.quantity - self.remaining_quantity
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn is_buy(&self) -> bool {
        self.side.is_buy()
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn is_canceled(&self) -> bool {
        self.canceled
    }

    pub fn is_filled(&self) -> bool {
        self.remaining_quantity == 0
    }

    /// Eligible for matching and quantity queries
    pub fn is_active(&self) -> bool {
        !self.canceled && self.remaining_quantity > 0
    }

    /// Validate a reduction without applying it
    fn check_reduce(&self, amount: Quantity) -> OrderResult<()> {
        if amount <= 0 {
            return Err(OrderError::InvalidReduction(amount));
        }
        if amount > self.remaining_quantity {
            return Err(OrderError::Overfill {
                order_id: self.order_id.clone(),
                requested: amount,
                remaining: self.remaining_quantity,
            });
        }
        Ok(())
    }

    /// Reduce remaining quantity by `amount`
    ///
    /// Leaves the order untouched on error.
    pub fn reduce_quantity(&mut self, amount: Quantity) -> OrderResult<()> {
        self.check_reduce(amount)?;
        self.remaining_quantity -= amount;
        Ok(())
    }

    /// Mark the order canceled. Idempotent; remaining quantity is kept.
    pub fn cancel(&mut self) {
        self.canceled = true;
    }

    /// Price-time priority comparison
    ///
    /// `Less` means `self` ranks better. Buys rank higher prices first, sells
    /// lower prices first, and equal prices fall back to the earlier
    /// timestamp. Orders on different sides are incomparable.
    pub fn priority_cmp(&self, other: &Order) -> Option<Ordering> {
        if self.side != other.side {
            return None;
        }
        let by_price = match self.side {
            Side::Buy => other.price.cmp(&self.price),
            Side::Sell => self.price.cmp(&other.price),
        };
        Some(by_price.then_with(|| self.timestamp.cmp(&other.timestamp)))
    }

    /// True when `self` ranks strictly ahead of `other` on the same side
    pub fn has_priority_over(&self, other: &Order) -> bool {
        self.priority_cmp(other) == Some(Ordering::Less)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn ts(nanos: i64) -> Timestamp {
        DateTime::<Utc>::from_timestamp_nanos(nanos)
    }

    fn order(id: &str, price: i64, side: Side, at: i64) -> Order {
        Order::new(id, "T1", "AAPL", Price::from_int(price), 10, side, ts(at)).unwrap()
    }

    #[test]
    fn test_new_order_starts_fully_open() {
        let o = order("O1", 150, Side::Buy, 1);
        assert_eq!(o.remaining_quantity(), 10);
        assert_eq!(o.filled_quantity(), 0);
        assert!(!o.is_canceled());
        assert!(o.is_active());
    }

    #[test]
    fn test_rejects_non_positive_quantity() {
        for qty in [0, -5] {
            let err = Order::new("O1", "T1", "AAPL", Price::from_int(1), qty, Side::Buy, ts(1))
                .unwrap_err();
            assert_eq!(err, OrderError::InvalidQuantity(qty));
        }
    }

    #[test]
    fn test_rejects_negative_price() {
        let result = Order::new("O1", "T1", "AAPL", Price::from_int(-1), 1, Side::Sell, ts(1));
        assert!(matches!(result, Err(OrderError::NegativePrice(_))));
    }

    #[test]
    fn test_rejects_unrepresentable_notional() {
        let price = Price::from_int(10_000_000_000);
        let result = Order::new("O1", "T1", "AAPL", price, 9_000_000_000_000_000_000, Side::Sell, ts(1));
        assert!(matches!(result, Err(OrderError::NotionalOverflow { .. })));

        assert!(Order::new("O2", "T1", "AAPL", price, 7_000_000_000_000_000_000, Side::Sell, ts(1)).is_ok());
    }

    #[test]
    fn test_reduce_quantity() {
        let mut o = order("O1", 150, Side::Buy, 1);
        o.reduce_quantity(4).unwrap();
        assert_eq!(o.remaining_quantity(), 6);
        assert_eq!(o.quantity(), 10);

        assert_eq!(o.reduce_quantity(0), Err(OrderError::InvalidReduction(0)));
        assert!(matches!(o.reduce_quantity(7), Err(OrderError::Overfill { .. })));
        assert_eq!(o.remaining_quantity(), 6);

        o.reduce_quantity(6).unwrap();
        assert!(o.is_filled());
        assert!(!o.is_active());
    }

    #[test]
    fn test_cancel_is_idempotent_and_keeps_remaining() {
        let mut o = order("O1", 150, Side::Sell, 1);
        o.reduce_quantity(3).unwrap();
        o.cancel();
        o.cancel();
        assert!(o.is_canceled());
        assert_eq!(o.remaining_quantity(), 7);
        assert!(!o.is_active());
    }

    #[test]
    fn test_buy_priority_prefers_higher_price_then_earlier_time() {
        let high = order("A", 151, Side::Buy, 5);
        let low = order("B", 150, Side::Buy, 1);
        let low_later = order("C", 150, Side::Buy, 2);

        assert!(high.has_priority_over(&low));
        assert!(low.has_priority_over(&low_later));
        assert!(!low_later.has_priority_over(&low));
        assert_eq!(low.priority_cmp(&low), Some(Ordering::Equal));
    }

    #[test]
    fn test_sell_priority_prefers_lower_price_then_earlier_time() {
        let cheap = order("A", 149, Side::Sell, 5);
        let dear = order("B", 150, Side::Sell, 1);
        let dear_later = order("C", 150, Side::Sell, 2);

        assert!(cheap.has_priority_over(&dear));
        assert!(dear.has_priority_over(&dear_later));
    }

    #[test]
    fn test_opposite_sides_are_incomparable() {
        let buy = order("A", 150, Side::Buy, 1);
        let sell = order("B", 150, Side::Sell, 2);
        assert_eq!(buy.priority_cmp(&sell), None);
        assert!(!buy.has_priority_over(&sell));
    }
}
