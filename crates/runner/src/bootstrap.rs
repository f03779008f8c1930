//! Engine setup from configuration
//!
//! Traders are registered before any seed order is submitted, so seed fills
//! settle against real balances.

use crossbook_engine::{EngineConfig, MatchingService, OrderGateway, ShardedMatchingService};
use crossbook_ports::{SubmitOutcome, SubmitStatus};
use log::{info, warn};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::error::{Result, RunnerError};

/// A ready engine and the outcome of each seed order
pub struct Bootstrap {
    pub gateway: Arc<dyn OrderGateway>,
    pub config: EngineConfig,
    pub seed_outcomes: Vec<SubmitOutcome>,
}

impl Bootstrap {
    pub fn new(config: EngineConfig) -> Result<Self> {
        // Convert every seed order up front so a bad file leaves no half-built engine
        let seeds = config
            .seed_orders
            .iter()
            .map(|seed| seed.to_request())
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let gateway: Arc<dyn OrderGateway> = if config.shards > 1 {
            let sharded = ShardedMatchingService::new(config.shards);
            for trader in &config.traders {
                sharded.register_trader(trader.to_trader());
            }
            Arc::new(sharded)
        } else {
            let single = MatchingService::new();
            for trader in &config.traders {
                single.register_trader(trader.to_trader());
            }
            Arc::new(single)
        };

        info!(
            "{} ready: {} traders, {} seed orders",
            gateway.name(),
            config.traders.len(),
            seeds.len()
        );

        let seed_outcomes = seeds
            .into_iter()
            .map(|request| {
                let order_id = request.order_id.clone();
                let outcome = gateway.submit(request);
                if outcome.status == SubmitStatus::Error {
                    warn!(
                        "Seed order {} rejected: {}",
                        order_id,
                        outcome.message.as_deref().unwrap_or("unknown error")
                    );
                }
                outcome
            })
            .collect();

        Ok(Self {
            gateway,
            config,
            seed_outcomes,
        })
    }

    /// Address the server should bind
    pub fn server_addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.config.server.host, self.config.server.port);
        addr.parse().map_err(|_| RunnerError::Address(addr))
    }
}

/// Apply `HOST` and `PORT` overrides on top of the loaded config
///
/// An unparsable `PORT` is ignored with a warning.
pub fn apply_env_overrides(
    config: &mut EngineConfig,
    host: Option<String>,
    port: Option<String>,
) {
    if let Some(host) = host.filter(|h| !h.trim().is_empty()) {
        config.server.host = host;
    }
    if let Some(port) = port {
        match port.parse() {
            Ok(port) => config.server.port = port,
            Err(_) => warn!("Ignoring invalid PORT value '{}'", port),
        }
    }
}
