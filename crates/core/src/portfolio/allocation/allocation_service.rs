//! Service for sector allocation and divergence from target profiles.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use log::debug;
use rust_decimal::Decimal;

use super::allocation_calculator::{exceeds_tolerance, percent_weights, weight_deviations};
use crate::accounts::{Account, AccountRepositoryTrait};
use crate::constants::CASH_SECTOR;
use crate::errors::{Error, Result, ValidationError};
use crate::holdings::HoldingRepositoryTrait;
use crate::instruments::InstrumentRepositoryTrait;
use crate::profiles::ProfileRepositoryTrait;

/// Trait for allocation service.
pub trait AllocationServiceTrait: Send + Sync {
    /// Whole-percent weight per sector name, cash included. Every known
    /// sector is present.
    fn sector_weights(&self, account_id: i32) -> Result<HashMap<String, i32>>;

    /// Signed deviation of the account's weights from its profile targets.
    fn sector_deviations(&self, account_id: i32) -> Result<BTreeMap<String, i32>>;

    /// Accounts with any sector deviating by more than `tolerance` points.
    fn divergent_accounts(&self, tolerance: i32) -> Result<HashSet<i32>>;
}

pub struct AllocationService {
    accounts: Arc<dyn AccountRepositoryTrait>,
    holdings: Arc<dyn HoldingRepositoryTrait>,
    instruments: Arc<dyn InstrumentRepositoryTrait>,
    profiles: Arc<dyn ProfileRepositoryTrait>,
}

impl AllocationService {
    pub fn new(
        accounts: Arc<dyn AccountRepositoryTrait>,
        holdings: Arc<dyn HoldingRepositoryTrait>,
        instruments: Arc<dyn InstrumentRepositoryTrait>,
        profiles: Arc<dyn ProfileRepositoryTrait>,
    ) -> Self {
        Self {
            accounts,
            holdings,
            instruments,
            profiles,
        }
    }

    fn weights_for(&self, account: &Account) -> Result<HashMap<String, i32>> {
        let mut values: HashMap<String, Decimal> = self
            .instruments
            .list_sectors()?
            .into_iter()
            .map(|sector| (sector.name, Decimal::ZERO))
            .collect();
        values.insert(CASH_SECTOR.to_string(), account.cash_balance);

        let instruments: HashMap<String, (String, Decimal)> = self
            .instruments
            .list()?
            .into_iter()
            .map(|i| (i.symbol, (i.sector_name, i.current_price)))
            .collect();

        for position in self.holdings.list_by_account(account.id)? {
            if let Some((sector, price)) = instruments.get(&position.symbol) {
                let value = values.entry(sector.clone()).or_insert(Decimal::ZERO);
                *value = value
                    .checked_add(position.market_value(*price)?)
                    .ok_or_else(|| Error::out_of_range("sectorValue", sector))?;
            }
        }

        let weights = percent_weights(&values)?;
        debug!("Sector weights for account {}: {:?}", account.id, weights);
        Ok(weights)
    }

    fn deviations_for(&self, account: &Account) -> Result<BTreeMap<String, i32>> {
        let current = self.weights_for(account)?;
        let target = self.profiles.get_target_weights(&account.profile_name)?;
        Ok(weight_deviations(&current, &target))
    }

    fn load_account(&self, account_id: i32) -> Result<Account> {
        if !self.accounts.account_exists(account_id)? {
            return Err(Error::unknown("account", account_id));
        }
        self.accounts.get_by_id(account_id)
    }
}

impl AllocationServiceTrait for AllocationService {
    fn sector_weights(&self, account_id: i32) -> Result<HashMap<String, i32>> {
        let account = self.load_account(account_id)?;
        self.weights_for(&account)
    }

    fn sector_deviations(&self, account_id: i32) -> Result<BTreeMap<String, i32>> {
        let account = self.load_account(account_id)?;
        self.deviations_for(&account)
    }

    fn divergent_accounts(&self, tolerance: i32) -> Result<HashSet<i32>> {
        if tolerance < 0 {
            return Err(ValidationError::OutOfRange {
                field: "tolerance".to_string(),
                value: tolerance.to_string(),
            }
            .into());
        }

        let mut divergent = HashSet::new();
        for account in self.accounts.list()? {
            let deviations = self.deviations_for(&account)?;
            if exceeds_tolerance(&deviations, tolerance) {
                debug!(
                    "Account {} diverges from profile {}: {:?}",
                    account.id, account.profile_name, deviations
                );
                divergent.insert(account.id);
            }
        }
        Ok(divergent)
    }
}
