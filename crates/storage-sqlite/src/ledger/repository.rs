use std::str::FromStr;

use advisory_desk_core::errors::{Error, Result};
use advisory_desk_core::holdings::Position;
use advisory_desk_core::trading::{
    LedgerJob, LedgerRepositoryTrait, LedgerTransaction, TradeReceipt,
};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use rust_decimal::Decimal;

use crate::db::WriteHandle;
use crate::errors::IntoCore;
use crate::holdings::PositionDB;
use crate::schema::{accounts, positions};

/// Ledger reads and writes on the writer's connection, inside the
/// transaction the writer opened for the current job.
pub struct SqliteLedgerTransaction<'a> {
    conn: &'a mut SqliteConnection,
}

impl<'a> SqliteLedgerTransaction<'a> {
    pub fn new(conn: &'a mut SqliteConnection) -> Self {
        Self { conn }
    }
}

impl LedgerTransaction for SqliteLedgerTransaction<'_> {
    fn cash_balance(&mut self, account_id: i32) -> Result<Decimal> {
        let stored = accounts::table
            .find(account_id)
            .select(accounts::cash_balance)
            .first::<String>(&mut *self.conn)
            .into_core()?;
        Ok(Decimal::from_str(&stored)?)
    }

    fn position(&mut self, account_id: i32, symbol: &str) -> Result<Option<Position>> {
        positions::table
            .find((account_id, symbol))
            .select(PositionDB::as_select())
            .first::<PositionDB>(&mut *self.conn)
            .optional()
            .into_core()?
            .map(Position::try_from)
            .transpose()
    }

    fn save_position(&mut self, position: &Position) -> Result<()> {
        diesel::replace_into(positions::table)
            .values(PositionDB::from(position))
            .execute(&mut *self.conn)
            .into_core()?;
        Ok(())
    }

    fn adjust_cash(&mut self, account_id: i32, delta: Decimal) -> Result<Decimal> {
        let current = self.cash_balance(account_id)?;
        let balance = current.checked_add(delta).ok_or_else(|| {
            Error::out_of_range("cashBalance", format!("{} + {}", current, delta))
        })?;
        diesel::update(accounts::table.find(account_id))
            .set(accounts::cash_balance.eq(balance.to_string()))
            .execute(&mut *self.conn)
            .into_core()?;
        Ok(balance)
    }
}

/// Runs ledger jobs on the single writer, so trades never interleave and a
/// failed job leaves no partial writes.
pub struct LedgerRepository {
    writer: WriteHandle,
}

impl LedgerRepository {
    pub fn new(writer: WriteHandle) -> Self {
        Self { writer }
    }
}

#[async_trait]
impl LedgerRepositoryTrait for LedgerRepository {
    async fn transact(&self, job: LedgerJob<TradeReceipt>) -> Result<TradeReceipt> {
        self.writer
            .exec(move |conn| job(&mut SqliteLedgerTransaction::new(conn)))
            .await
    }
}
