//! Market valuation of accounts, advisor books and client profit.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, warn};
use rust_decimal::Decimal;

use crate::accounts::{Account, AccountRepositoryTrait};
use crate::errors::{Error, Result};
use crate::holdings::{HoldingRepositoryTrait, Position};
use crate::instruments::InstrumentRepositoryTrait;

/// Trait for valuation service.
pub trait ValuationServiceTrait: Send + Sync {
    /// Cash plus the market value of every position.
    fn account_value(&self, account_id: i32) -> Result<Decimal>;

    /// Sum of the values of all accounts the advisor manages.
    fn advisor_portfolio_value(&self, advisor_id: i32) -> Result<Decimal>;

    /// Unrealized gain per account of the client.
    fn investor_profit(&self, client_id: i32) -> Result<HashMap<i32, Decimal>>;
}

pub struct ValuationService {
    accounts: Arc<dyn AccountRepositoryTrait>,
    holdings: Arc<dyn HoldingRepositoryTrait>,
    instruments: Arc<dyn InstrumentRepositoryTrait>,
}

impl ValuationService {
    pub fn new(
        accounts: Arc<dyn AccountRepositoryTrait>,
        holdings: Arc<dyn HoldingRepositoryTrait>,
        instruments: Arc<dyn InstrumentRepositoryTrait>,
    ) -> Self {
        Self {
            accounts,
            holdings,
            instruments,
        }
    }

    fn price_of(prices: &HashMap<String, Decimal>, position: &Position) -> Decimal {
        match prices.get(&position.symbol) {
            Some(price) => *price,
            None => {
                warn!(
                    "No price for {} held by account {}; valued at 0",
                    position.symbol, position.account_id
                );
                Decimal::ZERO
            }
        }
    }

    fn value_of(&self, account: &Account, prices: &HashMap<String, Decimal>) -> Result<Decimal> {
        let mut value = account.cash_balance;
        for position in self.holdings.list_by_account(account.id)? {
            let market = position.market_value(Self::price_of(prices, &position))?;
            value = checked_total(value, market, "accountValue")?;
        }
        Ok(value)
    }

    fn profit_of(&self, account: &Account, prices: &HashMap<String, Decimal>) -> Result<Decimal> {
        let mut profit = Decimal::ZERO;
        for position in self.holdings.list_by_account(account.id)? {
            let gain = position.unrealized_gain(Self::price_of(prices, &position))?;
            profit = checked_total(profit, gain, "investorProfit")?;
        }
        Ok(profit)
    }
}

fn checked_total(total: Decimal, amount: Decimal, field: &str) -> Result<Decimal> {
    total
        .checked_add(amount)
        .ok_or_else(|| Error::out_of_range(field, format!("{} + {}", total, amount)))
}

impl ValuationServiceTrait for ValuationService {
    fn account_value(&self, account_id: i32) -> Result<Decimal> {
        if !self.accounts.account_exists(account_id)? {
            return Err(Error::unknown("account", account_id));
        }
        let account = self.accounts.get_by_id(account_id)?;
        let prices = self.instruments.price_map()?;
        let value = self.value_of(&account, &prices)?;
        debug!("Account {} valued at {}", account_id, value);
        Ok(value)
    }

    fn advisor_portfolio_value(&self, advisor_id: i32) -> Result<Decimal> {
        if !self.accounts.advisor_exists(advisor_id)? {
            return Err(Error::unknown("advisor", advisor_id));
        }
        let prices = self.instruments.price_map()?;
        let mut total = Decimal::ZERO;
        for account in self.accounts.list_by_advisor(advisor_id)? {
            total = checked_total(total, self.value_of(&account, &prices)?, "portfolioValue")?;
        }
        debug!("Advisor {} book valued at {}", advisor_id, total);
        Ok(total)
    }

    fn investor_profit(&self, client_id: i32) -> Result<HashMap<i32, Decimal>> {
        if !self.accounts.client_exists(client_id)? {
            return Err(Error::unknown("client", client_id));
        }
        let prices = self.instruments.price_map()?;
        self.accounts
            .list_by_client(client_id)?
            .iter()
            .map(|account| Ok((account.id, self.profit_of(account, &prices)?)))
            .collect()
    }
}
