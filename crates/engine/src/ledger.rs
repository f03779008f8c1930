use crossbook_core::{Trade, Trader};
use log::{debug, warn};
use parking_lot::Mutex;
use std::collections::HashMap;

/// Registered traders and their cash balances
///
/// Shared by every shard so a trader's balance is one number no matter
/// which symbol they trade.
#[derive(Debug, Default)]
pub struct TraderLedger {
    traders: Mutex<HashMap<String, Trader>>,
}

impl TraderLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace a trader
    pub fn register(&self, trader: Trader) {
        debug!("Registering trader {} with balance {}", trader.id(), trader.balance());
        self.traders.lock().insert(trader.id().to_string(), trader);
    }

    pub fn get(&self, trader_id: &str) -> Option<Trader> {
        self.traders.lock().get(trader_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.traders.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.traders.lock().is_empty()
    }

    /// Move cash for one trade
    ///
    /// Returns `false` when either side is unregistered, both sides are the
    /// same trader, or a balance would overflow; nothing moves in any case.
    pub fn settle(&self, trade: &Trade) -> bool {
        if trade.buyer_id == trade.seller_id {
            return false;
        }

        let mut traders = self.traders.lock();
        let Some(mut buyer) = traders.remove(&trade.buyer_id) else {
            return false;
        };
        let settled = match traders.get_mut(&trade.seller_id) {
            Some(seller) => {
                let executed = trade.execute(&mut buyer, seller);
                if !executed {
                    warn!("Trade {} overflows a balance, not settled", trade.id);
                }
                executed
            }
            None => false,
        };
        traders.insert(trade.buyer_id.clone(), buyer);
        settled
    }
}
