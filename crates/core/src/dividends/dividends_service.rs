use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};
use rust_decimal::{Decimal, RoundingStrategy};

use super::dividends_model::{
    reconcile_carry, DividendDistribution, DividendPayout, PayoutMethod,
};
use super::dividends_traits::{DividendServiceTrait, FractionalCarryRepositoryTrait};
use crate::accounts::AccountRepositoryTrait;
use crate::constants::DECIMAL_PRECISION;
use crate::errors::{Error, Result, ValidationError};
use crate::holdings::{HoldingRepositoryTrait, Position};
use crate::instruments::InstrumentRepositoryTrait;
use crate::trading::{trade_value, TradeSide, TradingServiceTrait};

/// Pays dividends in cash or reinvests them through the trading service.
pub struct DividendService {
    trading: Arc<dyn TradingServiceTrait>,
    accounts: Arc<dyn AccountRepositoryTrait>,
    holdings: Arc<dyn HoldingRepositoryTrait>,
    instruments: Arc<dyn InstrumentRepositoryTrait>,
    carry: Arc<dyn FractionalCarryRepositoryTrait>,
}

impl DividendService {
    pub fn new(
        trading: Arc<dyn TradingServiceTrait>,
        accounts: Arc<dyn AccountRepositoryTrait>,
        holdings: Arc<dyn HoldingRepositoryTrait>,
        instruments: Arc<dyn InstrumentRepositoryTrait>,
        carry: Arc<dyn FractionalCarryRepositoryTrait>,
    ) -> Self {
        Self {
            trading,
            accounts,
            holdings,
            instruments,
            carry,
        }
    }

    /// Shares a dividend buys at `price`, truncated to the stored precision,
    /// and the sub-share part of that amount.
    fn reinvestment_split(dividend: Decimal, price: Decimal) -> Result<(Decimal, Decimal)> {
        let shares = dividend
            .checked_div(price)
            .ok_or_else(|| Error::Unexpected(format!("cannot divide {} by {}", dividend, price)))?
            .round_dp_with_strategy(DECIMAL_PRECISION, RoundingStrategy::ToZero);
        Ok((shares, shares.fract()))
    }

    async fn pay_holder(
        &self,
        holder: &Position,
        per_share: Decimal,
        price: Decimal,
    ) -> Result<DividendPayout> {
        let account = self.accounts.get_by_id(holder.account_id)?;
        let amount = trade_value(holder.quantity, per_share)?;

        let mut payout = DividendPayout {
            account_id: holder.account_id,
            shares_held: holder.quantity,
            amount,
            method: PayoutMethod::Cash,
            shares_bought: Decimal::ZERO,
            fractional_shares: Decimal::ZERO,
        };

        let mut shares = Decimal::ZERO;
        if account.reinvest {
            if price.is_zero() {
                warn!(
                    "Cannot reinvest {} dividend for account {} at zero price; paid as cash",
                    holder.symbol, account.id
                );
            } else {
                let (whole, fractional) = Self::reinvestment_split(amount, price)?;
                shares = whole;
                payout.fractional_shares = fractional;
            }
        }

        // Credit and reinvestment commit together; a rejected buy keeps the cash.
        let receipt = self
            .trading
            .credit_dividend(account.id, &holder.symbol, amount, shares, price)
            .await?;
        if receipt.side == TradeSide::Buy {
            payout.method = PayoutMethod::Reinvested;
            payout.shares_bought = receipt.quantity;
        }
        Ok(payout)
    }
}

#[async_trait]
impl DividendServiceTrait for DividendService {
    async fn distribute(&self, symbol: &str, per_share: Decimal) -> Result<DividendDistribution> {
        if symbol.trim().is_empty() {
            return Err(ValidationError::MissingField("symbol".to_string()).into());
        }
        if per_share < Decimal::ZERO {
            return Err(ValidationError::OutOfRange {
                field: "dividendPerShare".to_string(),
                value: per_share.to_string(),
            }
            .into());
        }
        if !self.instruments.instrument_exists(symbol)? {
            return Err(Error::unknown("instrument", symbol));
        }

        let price = self.instruments.get_by_symbol(symbol)?.current_price;
        let previous_carry = self.carry.get_carry(symbol)?;
        let holders = self.holdings.list_holders(symbol)?;
        debug!(
            "Distributing {} per share of {} to {} holder(s) at price {}",
            per_share,
            symbol,
            holders.len(),
            price
        );

        let mut payouts = Vec::with_capacity(holders.len());
        let mut fractional_total = Decimal::ZERO;
        for holder in holders.iter().filter(|h| h.is_open()) {
            match self.pay_holder(holder, per_share, price).await {
                Ok(payout) => {
                    fractional_total += payout.fractional_shares;
                    payouts.push(payout);
                }
                Err(e) => warn!(
                    "Dividend on {} for account {} not paid: {}",
                    symbol, holder.account_id, e
                ),
            }
        }

        let settlement = reconcile_carry(previous_carry, fractional_total);
        self.carry.set_carry(symbol, settlement.new_carry).await?;

        info!(
            "Dividend on {} paid to {} account(s); fractional {} against carry {}, new carry {}, {} whole share(s) to settle",
            symbol,
            payouts.len(),
            fractional_total,
            settlement.previous_carry,
            settlement.new_carry,
            settlement.whole_shares
        );

        Ok(DividendDistribution {
            symbol: symbol.to_string(),
            per_share,
            price,
            payouts,
            fractional_total,
            settlement,
        })
    }
}
