use std::sync::Arc;

use async_trait::async_trait;
use log::{error, info, warn};
use rust_decimal::Decimal;

use super::trade_calculator::{apply_buy, apply_sell, ensure_funds, trade_value};
use super::trading_model::{validate_order, TradeReceipt, TradeSide};
use super::trading_traits::{LedgerRepositoryTrait, LedgerTransaction, TradingServiceTrait};
use crate::accounts::AccountRepositoryTrait;
use crate::constants::is_cash_symbol;
use crate::errors::{Error, Result};
use crate::instruments::InstrumentRepositoryTrait;

/// Executes trades against the ledger.
///
/// Every trade runs as one ledger transaction: the cash check, the position
/// update and the cash movement commit together or not at all.
pub struct TradingService {
    ledger: Arc<dyn LedgerRepositoryTrait>,
    accounts: Arc<dyn AccountRepositoryTrait>,
    instruments: Arc<dyn InstrumentRepositoryTrait>,
}

impl TradingService {
    pub fn new(
        ledger: Arc<dyn LedgerRepositoryTrait>,
        accounts: Arc<dyn AccountRepositoryTrait>,
        instruments: Arc<dyn InstrumentRepositoryTrait>,
    ) -> Self {
        Self {
            ledger,
            accounts,
            instruments,
        }
    }

    fn ensure_account(&self, account_id: i32) -> Result<()> {
        if !self.accounts.account_exists(account_id)? {
            return Err(Error::unknown("account", account_id));
        }
        Ok(())
    }

    fn ensure_instrument(&self, symbol: &str) -> Result<()> {
        if is_cash_symbol(symbol) {
            return Err(Error::invalid(format!(
                "'{}' is the cash pseudo-symbol and cannot be traded as shares",
                symbol
            )));
        }
        if !self.instruments.instrument_exists(symbol)? {
            return Err(Error::unknown("instrument", symbol));
        }
        Ok(())
    }

    fn report(action: &str, account_id: i32, outcome: &Result<TradeReceipt>) {
        match outcome {
            Ok(receipt) => info!(
                "{} settled for account {}: {} {} @ {}, cash {} -> balance {}",
                action,
                account_id,
                receipt.quantity,
                receipt.symbol,
                receipt.price,
                receipt.cash_delta,
                receipt.cash_balance
            ),
            Err(e) if e.is_storage() => {
                error!("{} failed for account {}: {}", action, account_id, e)
            }
            Err(e) => warn!("{} rejected for account {}: {}", action, account_id, e),
        }
    }

    /// Buys inside an open ledger transaction. Every check runs before the
    /// first write, so an `Err` other than a storage failure leaves `tx`
    /// untouched.
    fn buy_within(
        tx: &mut dyn LedgerTransaction,
        account_id: i32,
        symbol: &str,
        shares: Decimal,
        price: Decimal,
    ) -> Result<TradeReceipt> {
        let cost = trade_value(shares, price)?;
        let available = tx.cash_balance(account_id)?;
        ensure_funds(account_id, available, cost)?;

        let current = tx.position(account_id, symbol)?;
        let position = apply_buy(current, account_id, symbol, shares, price)?;
        tx.save_position(&position)?;
        let balance = tx.adjust_cash(account_id, -cost)?;

        Ok(TradeReceipt::settled(
            TradeSide::Buy,
            position,
            price,
            shares,
            -cost,
            balance,
        ))
    }

    async fn settle_buy(
        &self,
        account_id: i32,
        symbol: &str,
        shares: Decimal,
        price: Decimal,
    ) -> Result<TradeReceipt> {
        validate_order(symbol, shares, price)?;
        self.ensure_account(account_id)?;
        self.ensure_instrument(symbol)?;

        let symbol = symbol.to_string();
        self.ledger
            .transact(Box::new(move |tx| {
                Self::buy_within(tx, account_id, &symbol, shares, price)
            }))
            .await
    }

    async fn settle_sell(
        &self,
        account_id: i32,
        symbol: &str,
        shares: Decimal,
        price: Decimal,
    ) -> Result<TradeReceipt> {
        validate_order(symbol, shares, price)?;
        self.ensure_account(account_id)?;
        self.ensure_instrument(symbol)?;

        let symbol = symbol.to_string();
        self.ledger
            .transact(Box::new(move |tx| {
                let proceeds = trade_value(shares, price)?;
                let current = tx.position(account_id, &symbol)?;
                let position = apply_sell(current, account_id, &symbol, shares)?;
                tx.save_position(&position)?;

                let balance = tx.adjust_cash(account_id, proceeds)?;

                Ok(TradeReceipt::settled(
                    TradeSide::Sell,
                    position,
                    price,
                    shares,
                    proceeds,
                    balance,
                ))
            }))
            .await
    }

    async fn settle_cash(&self, account_id: i32, symbol: &str, amount: Decimal) -> Result<TradeReceipt> {
        self.ensure_account(account_id)?;

        let symbol = symbol.to_string();
        self.ledger
            .transact(Box::new(move |tx| {
                let balance = tx.adjust_cash(account_id, amount)?;
                Ok(TradeReceipt::cash(account_id, &symbol, amount, balance))
            }))
            .await
    }

    async fn settle_reinvestment(
        &self,
        account_id: i32,
        symbol: &str,
        amount: Decimal,
        shares: Decimal,
        price: Decimal,
    ) -> Result<TradeReceipt> {
        self.ensure_account(account_id)?;
        let buys = shares > Decimal::ZERO;
        if buys {
            validate_order(symbol, shares, price)?;
            self.ensure_instrument(symbol)?;
        }

        let symbol = symbol.to_string();
        self.ledger
            .transact(Box::new(move |tx| {
                let balance = tx.adjust_cash(account_id, amount)?;
                let credited = TradeReceipt::cash(account_id, &symbol, amount, balance);
                if !buys {
                    return Ok(credited);
                }

                match Self::buy_within(tx, account_id, &symbol, shares, price) {
                    Ok(mut receipt) => {
                        receipt.cash_delta += amount;
                        Ok(receipt)
                    }
                    Err(e) if e.is_storage() => Err(e),
                    Err(e) => {
                        warn!(
                            "Reinvestment of {} {} for account {} skipped, kept as cash: {}",
                            shares, symbol, account_id, e
                        );
                        Ok(credited)
                    }
                }
            }))
            .await
    }
}

#[async_trait]
impl TradingServiceTrait for TradingService {
    async fn buy(
        &self,
        account_id: i32,
        symbol: &str,
        shares: Decimal,
        price: Decimal,
    ) -> Result<TradeReceipt> {
        let outcome = self.settle_buy(account_id, symbol, shares, price).await;
        Self::report("Buy", account_id, &outcome);
        outcome
    }

    async fn sell(
        &self,
        account_id: i32,
        symbol: &str,
        shares: Decimal,
        price: Decimal,
    ) -> Result<TradeReceipt> {
        let outcome = self.settle_sell(account_id, symbol, shares, price).await;
        Self::report("Sell", account_id, &outcome);
        outcome
    }

    async fn adjust_cash(&self, account_id: i32, amount: Decimal) -> Result<TradeReceipt> {
        let outcome = self
            .settle_cash(account_id, crate::constants::CASH_SYMBOL, amount)
            .await;
        Self::report("Cash adjustment", account_id, &outcome);
        outcome
    }

    async fn credit_dividend(
        &self,
        account_id: i32,
        symbol: &str,
        amount: Decimal,
        shares: Decimal,
        price: Decimal,
    ) -> Result<TradeReceipt> {
        let outcome = self
            .settle_reinvestment(account_id, symbol, amount, shares, price)
            .await;
        Self::report("Dividend", account_id, &outcome);
        outcome
    }

    async fn trade_shares(
        &self,
        account_id: i32,
        symbol: &str,
        signed_shares: Decimal,
    ) -> Result<TradeReceipt> {
        if is_cash_symbol(symbol) {
            return self.adjust_cash(account_id, signed_shares).await;
        }
        if signed_shares.is_zero() {
            let err = Error::invalid("trade quantity must be non-zero");
            warn!("Trade rejected for account {}: {}", account_id, err);
            return Err(err);
        }

        let price = match self.instruments.get_by_symbol(symbol) {
            Ok(instrument) => instrument.current_price,
            Err(e) => {
                warn!(
                    "Trade rejected for account {}: cannot price {}: {}",
                    account_id, symbol, e
                );
                return Err(e);
            }
        };

        if signed_shares > Decimal::ZERO {
            self.buy(account_id, symbol, signed_shares, price).await
        } else {
            self.sell(account_id, symbol, -signed_shares, price).await
        }
    }
}
