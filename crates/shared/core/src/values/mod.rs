use chrono::{DateTime, Utc};

mod price;

pub use price::{PRICE_DECIMALS, PRICE_SCALE, Price, PriceParseError};

/// Whole-unit order quantity
pub type Quantity = i64;

/// Timestamp in UTC
///
/// Used only as the time-priority tiebreaker, never for economic meaning.
pub type Timestamp = DateTime<Utc>;

/// Symbol identifier for a tradeable instrument
pub type Symbol = String;
