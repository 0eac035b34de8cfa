//! Trade receipts and order validation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};
use crate::holdings::Position;

/// Direction of a ledger movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeSide {
    Buy,
    Sell,
    /// Direct deposit or withdrawal through the cash pseudo-symbol.
    Cash,
}

/// Result of a settled trade or cash adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeReceipt {
    pub account_id: i32,
    pub symbol: String,
    pub side: TradeSide,
    pub quantity: Decimal,
    pub price: Decimal,
    /// Signed change applied to the cash balance.
    pub cash_delta: Decimal,
    /// Cash balance after the trade.
    pub cash_balance: Decimal,
    /// Position after the trade; `None` for cash adjustments.
    pub position: Option<Position>,
    pub executed_at: DateTime<Utc>,
}

impl TradeReceipt {
    /// Receipt for a share trade, stamped now.
    pub fn settled(
        side: TradeSide,
        position: Position,
        price: Decimal,
        quantity: Decimal,
        cash_delta: Decimal,
        cash_balance: Decimal,
    ) -> Self {
        TradeReceipt {
            account_id: position.account_id,
            symbol: position.symbol.clone(),
            side,
            quantity,
            price,
            cash_delta,
            cash_balance,
            position: Some(position),
            executed_at: Utc::now(),
        }
    }

    /// Receipt for a direct cash movement, stamped now.
    pub fn cash(account_id: i32, symbol: &str, amount: Decimal, cash_balance: Decimal) -> Self {
        TradeReceipt {
            account_id,
            symbol: symbol.to_string(),
            side: TradeSide::Cash,
            quantity: amount,
            price: Decimal::ONE,
            cash_delta: amount,
            cash_balance,
            position: None,
            executed_at: Utc::now(),
        }
    }
}

/// Checks the caller-supplied order parameters.
pub fn validate_order(symbol: &str, shares: Decimal, price: Decimal) -> Result<()> {
    if symbol.trim().is_empty() {
        return Err(Error::Validation(ValidationError::MissingField(
            "symbol".to_string(),
        )));
    }
    if shares <= Decimal::ZERO {
        return Err(Error::Validation(ValidationError::OutOfRange {
            field: "shares".to_string(),
            value: shares.to_string(),
        }));
    }
    if price < Decimal::ZERO {
        return Err(Error::Validation(ValidationError::OutOfRange {
            field: "price".to_string(),
            value: price.to_string(),
        }));
    }
    Ok(())
}
