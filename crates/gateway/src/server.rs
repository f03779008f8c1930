//! HTTP server bootstrap

use log::info;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::error::{GatewayError, Result};
use crate::rest::{AppState, create_router};

/// Bind `addr` and serve the API until the process stops
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> Result<()> {
    let router = create_router(state);
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| GatewayError::Bind {
            addr: addr.to_string(),
            source,
        })?;

    info!("Gateway listening on {}", addr);
    axum::serve(listener, router).await?;
    Ok(())
}
