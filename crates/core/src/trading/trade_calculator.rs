use log::debug;
use rust_decimal::Decimal;

use crate::errors::{Error, Result, TradeError};
use crate::holdings::Position;

/// Cash value of `shares` at `price`, rejected when it overflows.
pub fn trade_value(shares: Decimal, price: Decimal) -> Result<Decimal> {
    shares
        .checked_mul(price)
        .ok_or_else(|| Error::out_of_range("tradeValue", format!("{} x {}", shares, price)))
}

/// Applies a purchase to a position and returns the updated position.
///
/// `newACB = (oldACB × oldShares + shares × price) / (oldShares + shares)`.
/// A missing or closed position starts from a zero cost basis. Fails when the
/// resulting quantity or cost does not fit in a `Decimal`.
pub fn apply_buy(
    current: Option<Position>,
    account_id: i32,
    symbol: &str,
    shares: Decimal,
    price: Decimal,
) -> Result<Position> {
    let mut position = current.unwrap_or_else(|| Position::new(account_id, symbol));

    let held = position.quantity.max(Decimal::ZERO);
    let prior_cost = if held > Decimal::ZERO {
        trade_value(held, position.average_cost)?
    } else {
        Decimal::ZERO
    };

    let new_quantity = held
        .checked_add(shares)
        .ok_or_else(|| Error::out_of_range("quantity", format!("{} + {}", held, shares)))?;
    let added_cost = trade_value(shares, price)?;
    let new_cost = prior_cost.checked_add(added_cost).ok_or_else(|| {
        Error::out_of_range("bookValue", format!("{} + {}", prior_cost, added_cost))
    })?;
    position.average_cost = if new_quantity > Decimal::ZERO {
        new_cost.checked_div(new_quantity).ok_or_else(|| {
            Error::out_of_range("averageCost", format!("{} / {}", new_cost, new_quantity))
        })?
    } else {
        Decimal::ZERO
    };
    position.quantity = new_quantity;

    debug!(
        "Buy {} {} for account {}: quantity {} -> {}, ACB {}",
        shares, symbol, account_id, held, new_quantity, position.average_cost
    );
    Ok(position)
}

/// Applies a sale to a position.
///
/// The average cost basis is carried forward unchanged; only the quantity
/// moves. Fails when the account holds fewer than `shares`.
pub fn apply_sell(
    current: Option<Position>,
    account_id: i32,
    symbol: &str,
    shares: Decimal,
) -> Result<Position> {
    let held = current
        .as_ref()
        .map(|p| p.quantity)
        .unwrap_or(Decimal::ZERO);
    if held < shares {
        return Err(TradeError::InsufficientShares {
            account_id,
            symbol: symbol.to_string(),
            requested: shares,
            held,
        }
        .into());
    }

    let mut position = current.unwrap_or_else(|| Position::new(account_id, symbol));
    position.quantity = held - shares;

    debug!(
        "Sell {} {} for account {}: quantity {} -> {}, ACB kept at {}",
        shares, symbol, account_id, held, position.quantity, position.average_cost
    );
    Ok(position)
}

/// Fails with `InsufficientFunds` when `available < required`.
pub fn ensure_funds(account_id: i32, available: Decimal, required: Decimal) -> Result<()> {
    if available < required {
        return Err(TradeError::InsufficientFunds {
            account_id,
            required,
            available,
        }
        .into());
    }
    Ok(())
}
