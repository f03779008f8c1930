use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Order, OrderId, Trader, TraderId};
use crate::values::{Price, Quantity, Symbol, Timestamp};

/// Unique identifier for a trade
pub type TradeId = Uuid;

/// Trade resulting from matching a buy against a sell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    pub symbol: Symbol,
    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,
    pub buyer_id: TraderId,
    pub seller_id: TraderId,
    pub price: Price,
    pub quantity: Quantity,
    pub timestamp: Timestamp,
}

impl Trade {
    /// Create a new trade with explicit timestamp
    pub fn new_with_time(
        buy: &Order,
        sell: &Order,
        price: Price,
        quantity: Quantity,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            symbol: buy.symbol().to_string(),
            buy_order_id: buy.order_id().to_string(),
            sell_order_id: sell.order_id().to_string(),
            buyer_id: buy.trader_id().to_string(),
            seller_id: sell.trader_id().to_string(),
            price,
            quantity,
            timestamp,
        }
    }

    /// Notional value of the trade (price * quantity), `None` on overflow
    pub fn checked_notional(&self) -> Option<Decimal> {
        self.price.checked_notional(self.quantity)
    }

    /// Settle cash between the two counterparties
    ///
    /// The buyer pays the notional and the seller receives it. Returns
    /// `false` and moves nothing if any amount overflows.
    pub fn execute(&self, buyer: &mut Trader, seller: &mut Trader) -> bool {
        let Some(notional) = self.checked_notional() else {
            return false;
        };
        let (Some(paid), Some(received)) = (
            buyer.balance().checked_sub(notional),
            seller.balance().checked_add(notional),
        ) else {
            return false;
        };
        buyer.set_balance(paid);
        seller.set_balance(received);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Side;
    use chrono::{DateTime, Utc};
    use rust_decimal_macros::dec;

    fn at(nanos: i64) -> Timestamp {
        DateTime::<Utc>::from_timestamp_nanos(nanos)
    }

    fn sample_trade() -> Trade {
        let buy = Order::new("B1", "alice", "AAPL", Price::from_int(150), 100, Side::Buy, at(1))
            .unwrap();
        let sell = Order::new("S1", "bob", "AAPL", Price::parse("149.5").unwrap(), 40, Side::Sell, at(2))
            .unwrap();
        Trade::new_with_time(&buy, &sell, sell.price(), 40, at(3))
    }

    #[test]
    fn test_trade_copies_counterparties() {
        let trade = sample_trade();
        assert_eq!(trade.buy_order_id, "B1");
        assert_eq!(trade.sell_order_id, "S1");
        assert_eq!(trade.buyer_id, "alice");
        assert_eq!(trade.seller_id, "bob");
        assert_eq!(trade.symbol, "AAPL");
    }

    #[test]
    fn test_notional() {
        assert_eq!(sample_trade().checked_notional(), Some(dec!(5980)));
    }

    #[test]
    fn test_execute_moves_cash() {
        let trade = sample_trade();
        let mut alice = Trader::new("alice", "Alice", dec!(10000));
        let mut bob = Trader::new("bob", "Bob", dec!(500));

        assert!(trade.execute(&mut alice, &mut bob));

        assert_eq!(alice.balance(), dec!(4020));
        assert_eq!(bob.balance(), dec!(6480));
    }

    #[test]
    fn test_execute_overflow_moves_nothing() {
        let trade = sample_trade();
        let mut alice = Trader::new("alice", "Alice", dec!(10000));
        let mut bob = Trader::new("bob", "Bob", Decimal::MAX);

        assert!(!trade.execute(&mut alice, &mut bob));

        assert_eq!(alice.balance(), dec!(10000));
        assert_eq!(bob.balance(), Decimal::MAX);
    }
}
