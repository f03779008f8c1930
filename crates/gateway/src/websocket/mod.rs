//! Periodic order book push over WebSocket

mod handler;

pub use handler::{book_stream, stream_period};
