mod handlers;
mod router;

pub use router::{AppState, create_router};
