use std::sync::Arc;

use advisory_desk_core::holdings::{HoldingRepositoryTrait, Position};
use advisory_desk_core::Result;
use diesel::prelude::*;

use super::model::PositionDB;
use crate::db::{get_connection, DbPool};
use crate::errors::IntoCore;
use crate::schema::positions;

/// Read side of the positions table. Writes go through the ledger.
pub struct HoldingRepository {
    pool: Arc<DbPool>,
}

impl HoldingRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    fn load(
        &self,
        query: positions::BoxedQuery<'_, diesel::sqlite::Sqlite>,
    ) -> Result<Vec<Position>> {
        let mut conn = get_connection(&self.pool)?;
        query
            .select(PositionDB::as_select())
            .order((positions::account_id.asc(), positions::symbol.asc()))
            .load::<PositionDB>(&mut conn)
            .into_core()?
            .into_iter()
            .map(Position::try_from)
            .collect()
    }
}

impl HoldingRepositoryTrait for HoldingRepository {
    fn get_position(&self, account_id: i32, symbol: &str) -> Result<Option<Position>> {
        let mut conn = get_connection(&self.pool)?;
        positions::table
            .find((account_id, symbol))
            .select(PositionDB::as_select())
            .first::<PositionDB>(&mut conn)
            .optional()
            .into_core()?
            .map(Position::try_from)
            .transpose()
    }

    fn list_by_account(&self, account_id: i32) -> Result<Vec<Position>> {
        self.load(
            positions::table
                .filter(positions::account_id.eq(account_id))
                .into_boxed(),
        )
    }

    fn list_all(&self) -> Result<Vec<Position>> {
        self.load(positions::table.into_boxed())
    }

    fn list_holders(&self, symbol: &str) -> Result<Vec<Position>> {
        self.load(
            positions::table
                .filter(positions::symbol.eq(symbol.to_string()))
                .into_boxed(),
        )
    }
}
