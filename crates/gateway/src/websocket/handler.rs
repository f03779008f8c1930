use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};

use crate::error::ApiError;
use crate::messages::{OrderBookResponse, StreamQuery};
use crate::rest::AppState;

/// Resolve the push period, falling back to `default` when none is given
pub fn stream_period(requested_ms: Option<u64>, default: Duration) -> Result<Duration, ApiError> {
    match requested_ms {
        None => Ok(default),
        Some(0) => Err(ApiError::invalid_parameter("interval_ms", "must be positive")),
        Some(ms) => Ok(Duration::from_millis(ms)),
    }
}

/// GET /ws/book
pub async fn book_stream(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<StreamQuery>,
) -> Result<Response, ApiError> {
    let period = stream_period(query.interval_ms, state.stream_interval)?;
    let symbol = query.symbol.filter(|s| !s.trim().is_empty());

    Ok(ws.on_upgrade(move |socket| push_snapshots(socket, state, symbol, period)))
}

/// Send a snapshot every `period` until the client goes away
async fn push_snapshots(
    socket: WebSocket,
    state: Arc<AppState>,
    symbol: Option<String>,
    period: Duration,
) {
    let (mut sender, mut receiver) = socket.split();
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    debug!("Book stream opened for {:?} every {:?}", symbol, period);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let snapshot: OrderBookResponse = state.gateway.view(symbol.as_deref()).into();
                let json = match serde_json::to_string(&snapshot) {
                    Ok(json) => json,
                    Err(e) => {
                        warn!("Failed to encode book snapshot: {}", e);
                        continue;
                    }
                };
                if sender.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    debug!("Book stream closed for {:?}", symbol);
}
