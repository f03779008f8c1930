use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use log::{debug, info};
use std::sync::Arc;

use crate::error::ApiError;
use crate::messages::{
    BookQuery, CancelOrderRequest, CancelOrderResponse, OrderBookResponse, PingResponse,
    SubmitOrderRequest, SubmitOrderResponse,
};

use super::AppState;

/// GET /api/v1/ping
pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse {})
}

/// POST /api/v1/orders
pub async fn submit_order(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SubmitOrderRequest>, JsonRejection>,
) -> Result<Json<SubmitOrderResponse>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::malformed_body(e.body_text()))?;
    let request = req.validate()?;

    info!(
        "Submit {} {} {} x{} @ {} for {}",
        request.side, request.order_id, request.symbol, request.quantity, request.price,
        request.trader_id
    );

    let outcome = state.gateway.submit(request);
    debug!("Submit outcome: {:?}", outcome.status);
    Ok(Json(outcome.into()))
}

/// DELETE /api/v1/orders
pub async fn cancel_order(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CancelOrderRequest>, JsonRejection>,
) -> Result<Json<CancelOrderResponse>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::malformed_body(e.body_text()))?;
    let side = req.validate()?;

    info!("Cancel {} {}", side, req.order_id);

    let outcome = state.gateway.cancel(&req.order_id, side);
    Ok(Json(outcome.into()))
}

/// GET /api/v1/book
pub async fn order_book(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BookQuery>,
) -> Json<OrderBookResponse> {
    let snapshot = state.gateway.view(query.symbol_filter());
    Json(snapshot.into())
}
