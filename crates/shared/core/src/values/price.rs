//! Fixed-point price representation
//!
//! Uses i64 with 8 implied decimal places (scale = 100_000_000), so two
//! prices compare equal exactly when their raw values do. Quantity-at-price
//! queries rely on that.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Scale factor: 8 decimal places
pub const PRICE_DECIMALS: u32 = 8;
pub const PRICE_SCALE: i64 = 100_000_000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceParseError {
    #[error("empty price string")]
    Empty,

    #[error("invalid price: {0}")]
    Invalid(String),

    #[error("price out of range: {0}")]
    OutOfRange(String),
}

/// Fixed-point price with 8 decimal places
///
/// Internally stored as i64 where the value represents:
/// actual_price = raw_value / 100_000_000
///
/// Example: 123.45 is stored as 12_345_000_000
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Price(i64);

impl Price {
    pub const ZERO: Price = Price(0);
    pub const SCALE: i64 = PRICE_SCALE;

    /// Create from raw scaled value
    #[inline(always)]
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Create from integer (whole number)
    #[inline(always)]
    pub const fn from_int(value: i64) -> Self {
        Self(value * PRICE_SCALE)
    }

    /// Get the raw scaled value
    #[inline(always)]
    pub const fn raw(self) -> i64 {
        self.0
    }

    #[inline(always)]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[inline(always)]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Parse from string (e.g., "123.45678901")
    ///
    /// Digits beyond the eighth decimal place are truncated.
    pub fn parse(s: &str) -> Result<Self, PriceParseError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PriceParseError::Empty);
        }

        let negative = s.starts_with('-');
        let digits = if negative { &s[1..] } else { s };

        let mut parts = digits.split('.');
        let int_str = parts.next().unwrap_or_default();
        let frac_str = parts.next().unwrap_or_default();
        if parts.next().is_some() || (int_str.is_empty() && frac_str.is_empty()) {
            return Err(PriceParseError::Invalid(s.to_string()));
        }
        if !int_str.chars().chain(frac_str.chars()).all(|c| c.is_ascii_digit()) {
            return Err(PriceParseError::Invalid(s.to_string()));
        }

        let int_part: i64 = if int_str.is_empty() {
            0
        } else {
            int_str
                .parse()
                .map_err(|_| PriceParseError::OutOfRange(s.to_string()))?
        };

        let frac_digits = &frac_str[..frac_str.len().min(PRICE_DECIMALS as usize)];
        let frac_scaled = if frac_digits.is_empty() {
            0
        } else {
            let frac: i64 = frac_digits
                .parse()
                .map_err(|_| PriceParseError::Invalid(s.to_string()))?;
            frac * 10i64.pow(PRICE_DECIMALS - frac_digits.len() as u32)
        };

        let raw = int_part
            .checked_mul(PRICE_SCALE)
            .and_then(|v| v.checked_add(frac_scaled))
            .ok_or_else(|| PriceParseError::OutOfRange(s.to_string()))?;
        Ok(Self(if negative { -raw } else { raw }))
    }

    /// Convert to f64 (for compatibility with external systems)
    #[inline]
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / PRICE_SCALE as f64
    }

    /// Create from f64, rounding to the nearest representable price
    ///
    /// Returns `None` for NaN, infinities and values outside the i64 range.
    pub fn from_f64(value: f64) -> Option<Self> {
        Self::from_scaled_f64((value * PRICE_SCALE as f64).round())
    }

    /// `i64::MAX as f64` rounds up to 2^63, which is already out of range
    fn from_scaled_f64(scaled: f64) -> Option<Self> {
        if !scaled.is_finite() || scaled < i64::MIN as f64 || scaled >= i64::MAX as f64 {
            return None;
        }
        Some(Self(scaled as i64))
    }

    /// Exact decimal view of this price
    #[inline]
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, PRICE_DECIMALS)
    }

    /// `self * quantity`, or `None` if it does not fit a `Decimal`
    pub fn checked_notional(self, quantity: i64) -> Option<Decimal> {
        self.to_decimal().checked_mul(Decimal::from(quantity))
    }

    /// Create from a decimal, rounding past the eighth decimal place
    pub fn from_decimal(value: Decimal) -> Option<Self> {
        (value.round_dp(PRICE_DECIMALS) * Decimal::from(PRICE_SCALE))
            .to_i64()
            .map(Self)
    }
}

impl Default for Price {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let int_part = (self.0 / PRICE_SCALE).abs();
        let frac_part = (self.0 % PRICE_SCALE).abs();
        write!(f, "{}{}.{:08}", sign, int_part, frac_part)
    }
}

impl FromStr for Price {
    type Err = PriceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.to_decimal()
    }
}
