use crossbook_engine::ConfigError;
use crossbook_gateway::GatewayError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to read order file '{path}': {error}")]
    OrderFile { path: String, error: String },

    #[error("Invalid order file: {0}")]
    InvalidOrders(String),

    #[error("Invalid server address '{0}'")]
    Address(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

pub type Result<T> = std::result::Result<T, RunnerError>;
