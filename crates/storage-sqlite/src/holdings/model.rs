//! Database model for positions.

use std::str::FromStr;

use advisory_desk_core::holdings::Position;
use advisory_desk_core::Error;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One position row. Quantity and ACB are stored as decimal text so no
/// precision is lost on the way through SQLite.
#[derive(
    Queryable, Insertable, AsChangeset, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::positions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PositionDB {
    pub account_id: i32,
    pub symbol: String,
    pub quantity: String,
    pub average_cost: String,
}

impl TryFrom<PositionDB> for Position {
    type Error = Error;

    fn try_from(db: PositionDB) -> Result<Self, Self::Error> {
        Ok(Self {
            account_id: db.account_id,
            symbol: db.symbol,
            quantity: Decimal::from_str(&db.quantity)?,
            average_cost: Decimal::from_str(&db.average_cost)?,
        })
    }
}

impl From<&Position> for PositionDB {
    fn from(domain: &Position) -> Self {
        Self {
            account_id: domain.account_id,
            symbol: domain.symbol.clone(),
            quantity: domain.quantity.to_string(),
            average_cost: domain.average_cost.to_string(),
        }
    }
}
