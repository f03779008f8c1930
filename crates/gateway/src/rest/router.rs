use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::OrderGateway;
use crate::websocket;

/// Application state shared across handlers
pub struct AppState {
    pub gateway: Arc<dyn OrderGateway>,
    /// Book stream period when the client does not pick one
    pub stream_interval: Duration,
}

impl AppState {
    pub fn new(gateway: Arc<dyn OrderGateway>, stream_interval: Duration) -> Self {
        AppState {
            gateway,
            stream_interval,
        }
    }
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/ping", get(handlers::ping))
        .route(
            "/api/v1/orders",
            post(handlers::submit_order).delete(handlers::cancel_order),
        )
        .route("/api/v1/book", get(handlers::order_book))
        .route("/ws/book", get(websocket::book_stream))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
