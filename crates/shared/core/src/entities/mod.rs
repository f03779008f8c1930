mod order;
mod side;
mod trade;
mod trader;

pub use order::{Order, OrderId};
pub use side::Side;
pub use trade::{Trade, TradeId};
pub use trader::{Trader, TraderId};
