//! Database models for instruments and sectors.

use std::str::FromStr;

use advisory_desk_core::instruments::{Instrument, Sector};
use advisory_desk_core::Error;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Queryable, Identifiable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::sectors)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SectorDB {
    pub id: i32,
    pub name: String,
}

impl From<SectorDB> for Sector {
    fn from(db: SectorDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
        }
    }
}

/// Database model for instruments. The price is stored as decimal text.
#[derive(
    Queryable, Insertable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::instruments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct InstrumentDB {
    pub symbol: String,
    pub company_name: String,
    pub sector_id: i32,
    pub current_price: String,
}

impl InstrumentDB {
    /// Builds the domain instrument; the sector name comes from the join.
    pub fn into_domain(self, sector_name: String) -> Result<Instrument, Error> {
        Ok(Instrument {
            symbol: self.symbol,
            company_name: self.company_name,
            sector_id: self.sector_id,
            sector_name,
            current_price: Decimal::from_str(&self.current_price)?,
        })
    }
}
