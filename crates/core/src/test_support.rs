//! In-memory repositories shared by the service tests.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::accounts::{Account, AccountRepositoryTrait};
use crate::constants::CASH_SECTOR;
use crate::dividends::FractionalCarryRepositoryTrait;
use crate::errors::{DatabaseError, Error, Result};
use crate::firm::FirmRepositories;
use crate::holdings::{HoldingRepositoryTrait, Position};
use crate::instruments::{Instrument, InstrumentRepositoryTrait, Sector};
use crate::profiles::ProfileRepositoryTrait;
use crate::trading::{LedgerJob, LedgerRepositoryTrait, LedgerTransaction, TradeReceipt};

#[derive(Debug, Default, Clone)]
struct State {
    clients: BTreeSet<i32>,
    advisors: BTreeSet<i32>,
    accounts: BTreeMap<i32, Account>,
    sectors: Vec<Sector>,
    instruments: BTreeMap<String, Instrument>,
    profiles: HashMap<String, HashMap<String, i32>>,
    positions: BTreeMap<(i32, String), Position>,
    carry: HashMap<String, Decimal>,
}

/// Implements every repository trait over a mutex-guarded snapshot.
///
/// Ledger jobs run against a copy of the state that replaces the original
/// only when the job succeeds.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
    fail_cash_adjustments: AtomicBool,
    fail_reads: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        let store = Self::default();
        store.add_sector(0, CASH_SECTOR);
        Arc::new(store)
    }

    pub fn repositories(self: &Arc<Self>) -> FirmRepositories {
        FirmRepositories {
            accounts: self.clone(),
            holdings: self.clone(),
            instruments: self.clone(),
            profiles: self.clone(),
            ledger: self.clone(),
            carry: self.clone(),
        }
    }

    pub fn add_client(&self, id: i32) {
        self.state.lock().unwrap().clients.insert(id);
    }

    pub fn add_advisor(&self, id: i32) {
        self.state.lock().unwrap().advisors.insert(id);
    }

    pub fn add_sector(&self, id: i32, name: &str) {
        self.state.lock().unwrap().sectors.push(Sector {
            id,
            name: name.to_string(),
        });
    }

    pub fn add_instrument(&self, symbol: &str, sector_id: i32, price: Decimal) {
        let mut state = self.state.lock().unwrap();
        let sector_name = state
            .sectors
            .iter()
            .find(|s| s.id == sector_id)
            .map(|s| s.name.clone())
            .unwrap();
        state.instruments.insert(
            symbol.to_string(),
            Instrument {
                symbol: symbol.to_string(),
                company_name: format!("{} Inc.", symbol),
                sector_id,
                sector_name,
                current_price: price,
            },
        );
    }

    pub fn set_price(&self, symbol: &str, price: Decimal) {
        let mut state = self.state.lock().unwrap();
        state.instruments.get_mut(symbol).unwrap().current_price = price;
    }

    pub fn add_profile(&self, name: &str, targets: &[(&str, i32)]) {
        self.state.lock().unwrap().profiles.insert(
            name.to_string(),
            targets.iter().map(|(s, p)| (s.to_string(), *p)).collect(),
        );
    }

    /// Adds an account, registering its client and advisor.
    pub fn add_account(
        &self,
        id: i32,
        client_id: i32,
        advisor_id: i32,
        profile_name: &str,
        reinvest: bool,
        cash: Decimal,
    ) {
        let mut state = self.state.lock().unwrap();
        state.clients.insert(client_id);
        state.advisors.insert(advisor_id);
        state.accounts.insert(
            id,
            Account {
                id,
                client_id,
                advisor_id,
                name: format!("account-{}", id),
                profile_name: profile_name.to_string(),
                reinvest,
                cash_balance: cash,
            },
        );
    }

    pub fn set_position(&self, account_id: i32, symbol: &str, quantity: Decimal, acb: Decimal) {
        self.state.lock().unwrap().positions.insert(
            (account_id, symbol.to_string()),
            Position {
                account_id,
                symbol: symbol.to_string(),
                quantity,
                average_cost: acb,
            },
        );
    }

    pub fn position(&self, account_id: i32, symbol: &str) -> Option<Position> {
        self.state
            .lock()
            .unwrap()
            .positions
            .get(&(account_id, symbol.to_string()))
            .cloned()
    }

    pub fn cash(&self, account_id: i32) -> Decimal {
        self.state.lock().unwrap().accounts[&account_id].cash_balance
    }

    pub fn carry(&self, symbol: &str) -> Decimal {
        self.state
            .lock()
            .unwrap()
            .carry
            .get(symbol)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn put_carry(&self, symbol: &str, value: Decimal) {
        self.state
            .lock()
            .unwrap()
            .carry
            .insert(symbol.to_string(), value);
    }

    /// Makes every cash adjustment inside a ledger job fail.
    pub fn fail_cash_adjustments(&self, fail: bool) {
        self.fail_cash_adjustments.store(fail, Ordering::SeqCst);
    }

    /// Makes every repository read fail with a storage error.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    fn read(&self) -> Result<std::sync::MutexGuard<'_, State>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(DatabaseError::QueryFailed("injected read failure".to_string()).into());
        }
        Ok(self.state.lock().unwrap())
    }
}

impl AccountRepositoryTrait for InMemoryStore {
    fn client_exists(&self, client_id: i32) -> Result<bool> {
        Ok(self.read()?.clients.contains(&client_id))
    }

    fn advisor_exists(&self, advisor_id: i32) -> Result<bool> {
        Ok(self.read()?.advisors.contains(&advisor_id))
    }

    fn account_exists(&self, account_id: i32) -> Result<bool> {
        Ok(self.read()?.accounts.contains_key(&account_id))
    }

    fn get_by_id(&self, account_id: i32) -> Result<Account> {
        self.read()?
            .accounts
            .get(&account_id)
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound(format!("account {}", account_id)).into())
    }

    fn list(&self) -> Result<Vec<Account>> {
        Ok(self.read()?.accounts.values().cloned().collect())
    }

    fn list_by_advisor(&self, advisor_id: i32) -> Result<Vec<Account>> {
        Ok(self
            .read()?
            .accounts
            .values()
            .filter(|a| a.advisor_id == advisor_id)
            .cloned()
            .collect())
    }

    fn list_by_client(&self, client_id: i32) -> Result<Vec<Account>> {
        Ok(self
            .read()?
            .accounts
            .values()
            .filter(|a| a.client_id == client_id)
            .cloned()
            .collect())
    }
}

impl HoldingRepositoryTrait for InMemoryStore {
    fn get_position(&self, account_id: i32, symbol: &str) -> Result<Option<Position>> {
        Ok(self
            .read()?
            .positions
            .get(&(account_id, symbol.to_string()))
            .cloned())
    }

    fn list_by_account(&self, account_id: i32) -> Result<Vec<Position>> {
        Ok(self
            .read()?
            .positions
            .values()
            .filter(|p| p.account_id == account_id)
            .cloned()
            .collect())
    }

    fn list_all(&self) -> Result<Vec<Position>> {
        Ok(self.read()?.positions.values().cloned().collect())
    }

    fn list_holders(&self, symbol: &str) -> Result<Vec<Position>> {
        Ok(self
            .read()?
            .positions
            .values()
            .filter(|p| p.symbol == symbol)
            .cloned()
            .collect())
    }
}

impl InstrumentRepositoryTrait for InMemoryStore {
    fn instrument_exists(&self, symbol: &str) -> Result<bool> {
        Ok(self.read()?.instruments.contains_key(symbol))
    }

    fn get_by_symbol(&self, symbol: &str) -> Result<Instrument> {
        self.read()?
            .instruments
            .get(symbol)
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound(format!("instrument {}", symbol)).into())
    }

    fn list(&self) -> Result<Vec<Instrument>> {
        Ok(self.read()?.instruments.values().cloned().collect())
    }

    fn list_sectors(&self) -> Result<Vec<Sector>> {
        Ok(self.read()?.sectors.clone())
    }
}

impl ProfileRepositoryTrait for InMemoryStore {
    fn get_target_weights(&self, profile_name: &str) -> Result<HashMap<String, i32>> {
        Ok(self
            .read()?
            .profiles
            .get(profile_name)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl FractionalCarryRepositoryTrait for InMemoryStore {
    fn get_carry(&self, symbol: &str) -> Result<Decimal> {
        Ok(self
            .read()?
            .carry
            .get(symbol)
            .copied()
            .unwrap_or(Decimal::ZERO))
    }

    async fn set_carry(&self, symbol: &str, value: Decimal) -> Result<()> {
        self.put_carry(symbol, value);
        Ok(())
    }
}

struct MemoryTransaction<'a> {
    state: &'a mut State,
    fail_cash: bool,
}

impl LedgerTransaction for MemoryTransaction<'_> {
    fn cash_balance(&mut self, account_id: i32) -> Result<Decimal> {
        self.state
            .accounts
            .get(&account_id)
            .map(|a| a.cash_balance)
            .ok_or_else(|| DatabaseError::NotFound(format!("account {}", account_id)).into())
    }

    fn position(&mut self, account_id: i32, symbol: &str) -> Result<Option<Position>> {
        Ok(self
            .state
            .positions
            .get(&(account_id, symbol.to_string()))
            .cloned())
    }

    fn save_position(&mut self, position: &Position) -> Result<()> {
        self.state.positions.insert(
            (position.account_id, position.symbol.clone()),
            position.clone(),
        );
        Ok(())
    }

    fn adjust_cash(&mut self, account_id: i32, delta: Decimal) -> Result<Decimal> {
        if self.fail_cash {
            return Err(Error::Database(DatabaseError::TransactionFailed(
                "injected cash failure".to_string(),
            )));
        }
        let account = self
            .state
            .accounts
            .get_mut(&account_id)
            .ok_or_else(|| Error::from(DatabaseError::NotFound(format!("account {}", account_id))))?;
        account.cash_balance = account
            .cash_balance
            .checked_add(delta)
            .ok_or_else(|| Error::out_of_range("cashBalance", delta))?;
        Ok(account.cash_balance)
    }
}

#[async_trait]
impl LedgerRepositoryTrait for InMemoryStore {
    async fn transact(&self, job: LedgerJob<TradeReceipt>) -> Result<TradeReceipt> {
        let fail_cash = self.fail_cash_adjustments.load(Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();
        let mut draft = state.clone();
        let result = job(&mut MemoryTransaction {
            state: &mut draft,
            fail_cash,
        });
        if result.is_ok() {
            *state = draft;
        }
        result
    }
}
