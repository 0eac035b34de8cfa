//! Database models for accounts, clients and advisors.

use std::str::FromStr;

use advisory_desk_core::accounts::{Account, NewAccount};
use advisory_desk_core::Error;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Database model for accounts. The cash balance is stored as decimal text.
#[derive(Queryable, Identifiable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::accounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AccountDB {
    pub id: i32,
    pub client_id: i32,
    pub advisor_id: i32,
    pub name: String,
    pub profile_name: String,
    pub reinvest: bool,
    pub cash_balance: String,
}

/// Insert model for accounts; the id is assigned by SQLite.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::accounts)]
pub struct NewAccountDB {
    pub client_id: i32,
    pub advisor_id: i32,
    pub name: String,
    pub profile_name: String,
    pub reinvest: bool,
    pub cash_balance: String,
}

impl TryFrom<AccountDB> for Account {
    type Error = Error;

    fn try_from(db: AccountDB) -> Result<Self, Self::Error> {
        Ok(Self {
            id: db.id,
            client_id: db.client_id,
            advisor_id: db.advisor_id,
            name: db.name,
            profile_name: db.profile_name,
            reinvest: db.reinvest,
            cash_balance: Decimal::from_str(&db.cash_balance)?,
        })
    }
}

impl From<NewAccount> for NewAccountDB {
    fn from(domain: NewAccount) -> Self {
        Self {
            client_id: domain.client_id,
            advisor_id: domain.advisor_id,
            name: domain.name.trim().to_string(),
            profile_name: domain.profile_name.trim().to_string(),
            reinvest: domain.reinvest,
            cash_balance: Decimal::ZERO.to_string(),
        }
    }
}
