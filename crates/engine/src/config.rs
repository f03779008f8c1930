//! Configuration loading for the engine
//!
//! Supports JSON configuration files for:
//! - Shard count
//! - Server and book-stream settings used by the gateway
//! - Trader accounts with opening balances
//! - Seed orders for initial liquidity

use crossbook_core::{Price, Quantity, Side, Trader};
use crossbook_ports::SubmitRequest;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Number of symbol shards; 1 runs a single lock-guarded service
    #[serde(default = "default_shards")]
    pub shards: usize,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub stream: StreamConfig,

    /// Traders to register before any order arrives
    #[serde(default)]
    pub traders: Vec<TraderConfig>,

    /// Orders submitted at startup, in file order
    #[serde(default)]
    pub seed_orders: Vec<SeedOrderConfig>,
}

fn default_shards() -> usize {
    1
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            shards: default_shards(),
            server: ServerConfig::default(),
            stream: StreamConfig::default(),
            traders: Vec::new(),
            seed_orders: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    /// Parse configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.shards == 0 {
            return Err(ConfigError::Invalid("shards must be at least 1".to_string()));
        }
        if self.stream.interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "stream.interval_ms must be positive".to_string(),
            ));
        }
        for trader in &self.traders {
            if trader.id.trim().is_empty() {
                return Err(ConfigError::InvalidTrader("empty trader id".to_string()));
            }
        }
        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    50051
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Book snapshot streaming configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Default polling interval when the client does not ask for one
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

fn default_interval_ms() -> u64 {
    1000
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
        }
    }
}

/// Trader account configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraderConfig {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub balance: Decimal,
}

impl TraderConfig {
    pub fn to_trader(&self) -> Trader {
        let name = self.name.clone().unwrap_or_else(|| self.id.clone());
        Trader::new(self.id.clone(), name, self.balance)
    }
}

/// Seed order configuration
///
/// Same field layout as the batch order files the runner replays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedOrderConfig {
    pub order_id: String,
    pub trader_id: String,
    pub symbol: String,
    pub price: f64,
    pub quantity: Quantity,
    pub is_buy: bool,
}

impl SeedOrderConfig {
    /// Convert to a submission, rejecting prices that are not finite
    pub fn to_request(&self) -> Result<SubmitRequest, ConfigError> {
        let price = Price::from_f64(self.price).ok_or_else(|| {
            ConfigError::InvalidSeedOrder(format!("{}: bad price {}", self.order_id, self.price))
        })?;
        Ok(SubmitRequest::new(
            self.order_id.clone(),
            self.trader_id.clone(),
            self.symbol.clone(),
            price,
            self.quantity,
            Side::from_is_buy(self.is_buy),
        ))
    }
}

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {error}")]
    Io { path: String, error: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("Invalid trader config: {0}")]
    InvalidTrader(String),

    #[error("Invalid seed order: {0}")]
    InvalidSeedOrder(String),
}
