use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a holder's dividend was paid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayoutMethod {
    Cash,
    Reinvested,
}

/// Dividend paid to one holder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DividendPayout {
    pub account_id: i32,
    /// Shares held when the dividend was declared.
    pub shares_held: Decimal,
    pub amount: Decimal,
    pub method: PayoutMethod,
    /// Shares bought with the dividend; zero for cash payouts.
    pub shares_bought: Decimal,
    /// Sub-share part of the reinvestment added to the firm's fractional total.
    pub fractional_shares: Decimal,
}

/// Outcome of reconciling a run's fractional total with the firm carry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarrySettlement {
    pub previous_carry: Decimal,
    pub new_carry: Decimal,
    /// Whole shares the firm must settle to cover the shortfall.
    pub whole_shares: u32,
}

/// Result of one dividend distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DividendDistribution {
    pub symbol: String,
    pub per_share: Decimal,
    pub price: Decimal,
    pub payouts: Vec<DividendPayout>,
    pub fractional_total: Decimal,
    pub settlement: CarrySettlement,
}

impl DividendDistribution {
    /// Total dividend paid across all holders.
    pub fn total_paid(&self) -> Decimal {
        self.payouts.iter().map(|p| p.amount).sum()
    }
}

/// Reconciles the fractional shares accumulated in a run with the carried
/// firm balance.
///
/// If the carry covers the new fractional amount it is simply reduced.
/// Otherwise the shortfall is rounded up to whole shares and the excess over
/// the fractional amount is carried forward, so the carry stays below one
/// share.
pub fn reconcile_carry(previous: Decimal, fractional: Decimal) -> CarrySettlement {
    if previous > fractional {
        return CarrySettlement {
            previous_carry: previous,
            new_carry: previous - fractional,
            whole_shares: 0,
        };
    }

    let rounded = (fractional - previous).ceil();
    CarrySettlement {
        previous_carry: previous,
        new_carry: (previous + rounded) - fractional,
        // saturates on absurdly large runs
        whole_shares: rounded.to_u32().unwrap_or(u32::MAX),
    }
}
