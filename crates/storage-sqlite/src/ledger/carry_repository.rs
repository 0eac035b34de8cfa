use std::str::FromStr;
use std::sync::Arc;

use advisory_desk_core::dividends::FractionalCarryRepositoryTrait;
use advisory_desk_core::errors::Result;
use async_trait::async_trait;
use diesel::prelude::*;
use log::debug;
use rust_decimal::Decimal;

use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::fractional_carry;

/// Firm-wide fractional share balance per symbol, stored as decimal text.
pub struct FractionalCarryRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl FractionalCarryRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl FractionalCarryRepositoryTrait for FractionalCarryRepository {
    fn get_carry(&self, symbol: &str) -> Result<Decimal> {
        let mut conn = get_connection(&self.pool)?;
        let stored = fractional_carry::table
            .find(symbol)
            .select(fractional_carry::fractional_shares)
            .first::<String>(&mut conn)
            .optional()
            .into_core()?;
        match stored {
            Some(value) => Ok(Decimal::from_str(&value)?),
            None => Ok(Decimal::ZERO),
        }
    }

    async fn set_carry(&self, symbol: &str, value: Decimal) -> Result<()> {
        let symbol = symbol.to_string();
        self.writer
            .exec(move |conn| {
                diesel::replace_into(fractional_carry::table)
                    .values((
                        fractional_carry::symbol.eq(&symbol),
                        fractional_carry::fractional_shares.eq(value.to_string()),
                    ))
                    .execute(conn)
                    .into_core()?;
                debug!("Fractional carry for {} is now {}", symbol, value);
                Ok(())
            })
            .await
    }
}
