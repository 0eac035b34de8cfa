use std::sync::Arc;

use advisory_desk_core::constants::{is_cash_symbol, CASH_SECTOR};
use advisory_desk_core::errors::{Error, Result, ValidationError};
use advisory_desk_core::instruments::{
    validate_price, Instrument, InstrumentRepositoryTrait, NewInstrument, Sector,
};
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use log::{debug, info};
use rust_decimal::Decimal;

use super::model::{InstrumentDB, SectorDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::{instruments, sectors};

/// Price a newly defined instrument starts at until one is set.
const INITIAL_PRICE: Decimal = Decimal::ONE;

/// Id of the cash pseudo-sector, created on first use.
pub(crate) fn ensure_cash_sector(conn: &mut SqliteConnection) -> Result<i32> {
    let existing = sectors::table
        .filter(sectors::name.eq(CASH_SECTOR))
        .select(sectors::id)
        .first::<i32>(conn)
        .optional()
        .into_core()?;
    if let Some(id) = existing {
        return Ok(id);
    }

    let id = diesel::insert_into(sectors::table)
        .values(sectors::name.eq(CASH_SECTOR))
        .returning(sectors::id)
        .get_result::<i32>(conn)
        .into_core()?;
    debug!("Created the {} sector with id {}", CASH_SECTOR, id);
    Ok(id)
}

/// Repository for instruments, their sectors and current prices.
pub struct InstrumentRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl InstrumentRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }

    /// Defines a sector, creating the cash sector alongside the first one.
    /// Defining an existing name returns the stored sector.
    pub async fn define_sector(&self, name: &str) -> Result<Sector> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "name".to_string(),
            )));
        }

        self.writer
            .exec(move |conn| {
                ensure_cash_sector(conn)?;

                let existing = sectors::table
                    .filter(sectors::name.eq(&name))
                    .select(SectorDB::as_select())
                    .first::<SectorDB>(conn)
                    .optional()
                    .into_core()?;
                if let Some(sector) = existing {
                    return Ok(sector.into());
                }

                let sector = diesel::insert_into(sectors::table)
                    .values(sectors::name.eq(&name))
                    .returning(SectorDB::as_returning())
                    .get_result::<SectorDB>(conn)
                    .into_core()?;
                info!("Defined sector {} '{}'", sector.id, sector.name);
                Ok(sector.into())
            })
            .await
    }

    /// Defines an instrument in an existing sector at the initial price of 1.
    pub async fn define_instrument(&self, new_instrument: NewInstrument) -> Result<Instrument> {
        new_instrument.validate()?;
        let symbol = new_instrument.symbol.trim().to_string();
        if is_cash_symbol(&symbol) {
            return Err(Error::invalid(format!(
                "'{}' is reserved for cash and cannot be defined as an instrument",
                symbol
            )));
        }
        let sector_name = new_instrument.sector_name.trim().to_string();
        let company_name = new_instrument.company_name.trim().to_string();

        self.writer
            .exec(move |conn| {
                let sector = sectors::table
                    .filter(sectors::name.eq(&sector_name))
                    .select(SectorDB::as_select())
                    .first::<SectorDB>(conn)
                    .optional()
                    .into_core()?
                    .ok_or_else(|| Error::unknown("sector", &sector_name))?;
                if Sector::from(sector.clone()).is_cash() {
                    return Err(Error::invalid(format!(
                        "instrument {} cannot be placed in the {} sector",
                        symbol, CASH_SECTOR
                    )));
                }

                let row = InstrumentDB {
                    symbol,
                    company_name,
                    sector_id: sector.id,
                    current_price: INITIAL_PRICE.to_string(),
                };
                diesel::insert_into(instruments::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                info!(
                    "Defined instrument {} ({}) in sector '{}'",
                    row.symbol, row.company_name, sector.name
                );
                row.into_domain(sector.name)
            })
            .await
    }

    /// Sets the current price of an instrument. Negative prices are rejected.
    pub async fn set_price(&self, symbol: &str, price: Decimal) -> Result<()> {
        validate_price(price)?;
        let symbol = symbol.trim().to_string();

        self.writer
            .exec(move |conn| {
                let updated = diesel::update(instruments::table.find(&symbol))
                    .set(instruments::current_price.eq(price.to_string()))
                    .execute(conn)
                    .into_core()?;
                if updated == 0 {
                    return Err(Error::unknown("instrument", &symbol));
                }
                debug!("Price of {} set to {}", symbol, price);
                Ok(())
            })
            .await
    }
}

impl InstrumentRepositoryTrait for InstrumentRepository {
    fn instrument_exists(&self, symbol: &str) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;
        diesel::select(exists(instruments::table.find(symbol)))
            .get_result::<bool>(&mut conn)
            .into_core()
    }

    fn get_by_symbol(&self, symbol: &str) -> Result<Instrument> {
        let mut conn = get_connection(&self.pool)?;
        let (row, sector_name) = instruments::table
            .inner_join(sectors::table)
            .filter(instruments::symbol.eq(symbol))
            .select((InstrumentDB::as_select(), sectors::name))
            .first::<(InstrumentDB, String)>(&mut conn)
            .into_core()?;
        row.into_domain(sector_name)
    }

    fn list(&self) -> Result<Vec<Instrument>> {
        let mut conn = get_connection(&self.pool)?;
        instruments::table
            .inner_join(sectors::table)
            .select((InstrumentDB::as_select(), sectors::name))
            .order(instruments::symbol.asc())
            .load::<(InstrumentDB, String)>(&mut conn)
            .into_core()?
            .into_iter()
            .map(|(row, sector_name)| row.into_domain(sector_name))
            .collect()
    }

    fn list_sectors(&self) -> Result<Vec<Sector>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(sectors::table
            .select(SectorDB::as_select())
            .order(sectors::id.asc())
            .load::<SectorDB>(&mut conn)
            .into_core()?
            .into_iter()
            .map(Sector::from)
            .collect())
    }
}
