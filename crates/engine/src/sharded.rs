use crossbook_clock::MonotonicClock;
use crossbook_core::{OrderId, Side, Trade, Trader};
use crossbook_ports::{
    BookSnapshot, CancelOutcome, Clock, OrderGateway, SubmitOutcome, SubmitRequest, SubmitStatus,
};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use log::{debug, info};
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;

use crate::error::EngineError;
use crate::ledger::TraderLedger;
use crate::service::MatchingService;

// ============================================================================
// Sharding Strategy
// ============================================================================

/// Strategy for distributing symbols across shards
pub trait ShardingStrategy: Send + Sync {
    /// Get the shard index for a symbol
    fn get_shard_index(&self, symbol: &str, num_shards: usize) -> usize;
}

/// Default sharding strategy using consistent hashing
pub struct ConsistentHashStrategy;

impl ShardingStrategy for ConsistentHashStrategy {
    fn get_shard_index(&self, symbol: &str, num_shards: usize) -> usize {
        let mut hasher = DefaultHasher::new();
        symbol.hash(&mut hasher);
        (hasher.finish() as usize) % num_shards
    }
}

// ============================================================================
// Sharded Matching Service
// ============================================================================

/// Symbol-sharded matching service
///
/// Each shard is an independent [`MatchingService`] with its own lock, so
/// symbols on different shards never contend. All shards share one clock,
/// which keeps timestamps globally ordered, and one trader ledger.
///
/// Cancels carry no symbol, so `routes` remembers which shard each resting
/// order went to. The route map is always locked before a shard.
pub struct ShardedMatchingService<C: Clock = MonotonicClock> {
    shards: Vec<MatchingService<Arc<C>>>,
    routes: DashMap<(Side, OrderId), usize>,
    sharding_strategy: Arc<dyn ShardingStrategy>,
    clock: Arc<C>,
    ledger: Arc<TraderLedger>,
}

impl ShardedMatchingService<MonotonicClock> {
    /// Create with the default clock and sharding strategy
    pub fn new(num_shards: usize) -> Self {
        Self::with_strategy(num_shards, MonotonicClock::new(), Arc::new(ConsistentHashStrategy))
    }
}

impl<C: Clock> ShardedMatchingService<C> {
    /// Create with a custom clock and sharding strategy
    ///
    /// A shard count of zero is raised to one.
    pub fn with_strategy(
        num_shards: usize,
        clock: C,
        sharding_strategy: Arc<dyn ShardingStrategy>,
    ) -> Self {
        let clock = Arc::new(clock);
        let ledger = Arc::new(TraderLedger::new());
        let shards = (0..num_shards.max(1))
            .map(|_| MatchingService::with_ledger(Arc::clone(&clock), Arc::clone(&ledger)))
            .collect::<Vec<_>>();

        info!("ShardedMatchingService started with {} shards", shards.len());

        Self {
            shards,
            routes: DashMap::new(),
            sharding_strategy,
            clock,
            ledger,
        }
    }

    pub fn num_shards(&self) -> usize {
        self.shards.len()
    }

    /// Shard index a symbol maps to
    pub fn shard_index(&self, symbol: &str) -> usize {
        self.sharding_strategy
            .get_shard_index(symbol, self.shards.len())
    }

    pub fn shard(&self, index: usize) -> Option<&MatchingService<Arc<C>>> {
        self.shards.get(index)
    }

    pub fn register_trader(&self, trader: Trader) {
        self.ledger.register(trader);
    }

    pub fn trader(&self, trader_id: &str) -> Option<Trader> {
        self.ledger.get(trader_id)
    }

    pub fn is_resting(&self, order_id: &str, side: Side) -> bool {
        let Some(index) = self.routes.get(&(side, order_id.to_string())).map(|r| *r) else {
            return false;
        };
        self.shards[index].is_resting(order_id, side)
    }

    /// Every trade, grouped by shard
    pub fn trades(&self) -> Vec<Trade> {
        self.shards.iter().flat_map(|s| s.trades()).collect()
    }

    fn duplicate(&self, order_id: &str, side: Side) -> SubmitOutcome {
        let err = EngineError::DuplicateOrder {
            order_id: order_id.to_string(),
            side,
        };
        SubmitOutcome::error(err.to_string(), self.clock.now())
    }

    /// Drop routes of orders the fills took out of shard `index`
    fn forget_filled(&self, index: usize, fills: &[Trade]) {
        for trade in fills {
            for (side, id) in [(Side::Buy, &trade.buy_order_id), (Side::Sell, &trade.sell_order_id)] {
                if !self.shards[index].is_resting(id, side) {
                    self.routes.remove_if(&(side, id.clone()), |_, shard| *shard == index);
                }
            }
        }
    }
}

impl<C: Clock> OrderGateway for ShardedMatchingService<C> {
    fn submit(&self, request: SubmitRequest) -> SubmitOutcome {
        let index = self.shard_index(&request.symbol);
        let (order_id, side) = (request.order_id.clone(), request.side);

        let outcome = match self.routes.entry((side, order_id.clone())) {
            Entry::Occupied(mut entry) => {
                let existing = *entry.get();
                if existing != index && self.shards[existing].is_resting(&order_id, side) {
                    return self.duplicate(&order_id, side);
                }
                let outcome = self.shards[index].submit(request);
                if outcome.status != SubmitStatus::Error {
                    entry.insert(index);
                }
                outcome
            }
            Entry::Vacant(entry) => {
                let outcome = self.shards[index].submit(request);
                if outcome.status != SubmitStatus::Error {
                    entry.insert(index);
                }
                outcome
            }
        };

        self.forget_filled(index, &outcome.fills);
        debug!("Shard {} handled {} {}: {:?}", index, side, order_id, outcome.status);
        outcome
    }

    fn cancel(&self, order_id: &str, side: Side) -> CancelOutcome {
        match self.routes.remove(&(side, order_id.to_string())) {
            Some((_, index)) => self.shards[index].cancel(order_id, side),
            None => CancelOutcome::error(
                EngineError::OrderNotFound(order_id.to_string()).to_string(),
                self.clock.now(),
            ),
        }
    }

    fn view(&self, symbol: Option<&str>) -> BookSnapshot {
        if let Some(symbol) = symbol {
            return self.shards[self.shard_index(symbol)].view(Some(symbol));
        }

        let mut bids = Vec::new();
        let mut asks = Vec::new();
        for shard in &self.shards {
            let snapshot = shard.view(None);
            bids.extend(snapshot.bids);
            asks.extend(snapshot.asks);
        }
        BookSnapshot::new(bids, asks, self.clock.now())
    }

    fn name(&self) -> &str {
        "ShardedMatchingService"
    }
}
