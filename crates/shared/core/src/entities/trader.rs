use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Trader identifier
pub type TraderId = String;

/// A market participant with a cash balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trader {
    id: TraderId,
    name: String,
    balance: Decimal,
}

impl Trader {
    pub fn new(id: impl Into<TraderId>, name: impl Into<String>, balance: Decimal) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            balance,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Balances may go negative; there is no margin check
    pub(crate) fn set_balance(&mut self, balance: Decimal) {
        self.balance = balance;
    }
}
