//! Position domain model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Shares of one instrument held in one account.
///
/// `average_cost` is the average cost basis (ACB) per share. It is only
/// meaningful while `quantity` is positive; a closed position keeps its last
/// ACB, which the next purchase ignores.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub account_id: i32,
    pub symbol: String,
    pub quantity: Decimal,
    pub average_cost: Decimal,
}

impl Position {
    pub fn new(account_id: i32, symbol: impl Into<String>) -> Self {
        Position {
            account_id,
            symbol: symbol.into(),
            quantity: Decimal::ZERO,
            average_cost: Decimal::ZERO,
        }
    }

    /// True while the account holds a positive quantity.
    pub fn is_open(&self) -> bool {
        self.quantity > Decimal::ZERO
    }

    /// Market value at `price`.
    pub fn market_value(&self, price: Decimal) -> Result<Decimal> {
        self.quantity.checked_mul(price).ok_or_else(|| {
            Error::out_of_range("marketValue", format!("{} x {}", self.quantity, price))
        })
    }

    /// Unrealized gain at `price`: quantity × (price − ACB).
    pub fn unrealized_gain(&self, price: Decimal) -> Result<Decimal> {
        price
            .checked_sub(self.average_cost)
            .and_then(|gain| gain.checked_mul(self.quantity))
            .ok_or_else(|| {
                Error::out_of_range("unrealizedGain", format!("{} {}", self.quantity, self.symbol))
            })
    }
}
