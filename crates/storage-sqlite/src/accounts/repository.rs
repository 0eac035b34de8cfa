use std::sync::Arc;

use advisory_desk_core::accounts::{Account, AccountRepositoryTrait, NewAccount};
use advisory_desk_core::errors::{Error, Result, ValidationError};
use diesel::dsl::exists;
use diesel::prelude::*;
use log::info;

use super::model::{AccountDB, NewAccountDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::{accounts, advisors, clients};

/// Repository for accounts and the clients and advisors they belong to.
pub struct AccountRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl AccountRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }

    /// Adds a client, or returns the id of the client already using `name`.
    pub async fn create_client(&self, name: &str) -> Result<i32> {
        let name = required_name(name)?;
        self.writer
            .exec(move |conn| {
                let existing = clients::table
                    .filter(clients::name.eq(&name))
                    .select(clients::id)
                    .first::<i32>(conn)
                    .optional()
                    .into_core()?;
                if let Some(id) = existing {
                    return Ok(id);
                }

                let id = diesel::insert_into(clients::table)
                    .values(clients::name.eq(&name))
                    .returning(clients::id)
                    .get_result::<i32>(conn)
                    .into_core()?;
                info!("Added client {} '{}'", id, name);
                Ok(id)
            })
            .await
    }

    /// Adds an advisor, or returns the id of the advisor already using `name`.
    pub async fn create_advisor(&self, name: &str) -> Result<i32> {
        let name = required_name(name)?;
        self.writer
            .exec(move |conn| {
                let existing = advisors::table
                    .filter(advisors::name.eq(&name))
                    .select(advisors::id)
                    .first::<i32>(conn)
                    .optional()
                    .into_core()?;
                if let Some(id) = existing {
                    return Ok(id);
                }

                let id = diesel::insert_into(advisors::table)
                    .values(advisors::name.eq(&name))
                    .returning(advisors::id)
                    .get_result::<i32>(conn)
                    .into_core()?;
                info!("Added advisor {} '{}'", id, name);
                Ok(id)
            })
            .await
    }

    /// Opens an account with a zero cash balance.
    ///
    /// A client cannot hold two accounts with the same name: asking again
    /// returns the id of the existing account unchanged.
    pub async fn create_account(&self, new_account: NewAccount) -> Result<i32> {
        new_account.validate()?;
        let row: NewAccountDB = new_account.into();

        self.writer
            .exec(move |conn| {
                let client_known = diesel::select(exists(clients::table.find(row.client_id)))
                    .get_result::<bool>(conn)
                    .into_core()?;
                if !client_known {
                    return Err(Error::unknown("client", row.client_id));
                }
                let advisor_known = diesel::select(exists(advisors::table.find(row.advisor_id)))
                    .get_result::<bool>(conn)
                    .into_core()?;
                if !advisor_known {
                    return Err(Error::unknown("advisor", row.advisor_id));
                }

                let existing = accounts::table
                    .filter(accounts::client_id.eq(row.client_id))
                    .filter(accounts::name.eq(&row.name))
                    .select(accounts::id)
                    .first::<i32>(conn)
                    .optional()
                    .into_core()?;
                if let Some(id) = existing {
                    return Ok(id);
                }

                let id = diesel::insert_into(accounts::table)
                    .values(&row)
                    .returning(accounts::id)
                    .get_result::<i32>(conn)
                    .into_core()?;
                info!(
                    "Opened account {} '{}' for client {} with advisor {}",
                    id, row.name, row.client_id, row.advisor_id
                );
                Ok(id)
            })
            .await
    }

    /// Moves an account to another advisor.
    pub async fn reassign_advisor(&self, account_id: i32, advisor_id: i32) -> Result<()> {
        self.writer
            .exec(move |conn| {
                let advisor_known = diesel::select(exists(advisors::table.find(advisor_id)))
                    .get_result::<bool>(conn)
                    .into_core()?;
                if !advisor_known {
                    return Err(Error::unknown("advisor", advisor_id));
                }

                let updated = diesel::update(accounts::table.find(account_id))
                    .set(accounts::advisor_id.eq(advisor_id))
                    .execute(conn)
                    .into_core()?;
                if updated == 0 {
                    return Err(Error::unknown("account", account_id));
                }
                info!("Account {} reassigned to advisor {}", account_id, advisor_id);
                Ok(())
            })
            .await
    }

    fn load(&self, query: accounts::BoxedQuery<'_, diesel::sqlite::Sqlite>) -> Result<Vec<Account>> {
        let mut conn = get_connection(&self.pool)?;
        query
            .select(AccountDB::as_select())
            .order(accounts::id.asc())
            .load::<AccountDB>(&mut conn)
            .into_core()?
            .into_iter()
            .map(Account::try_from)
            .collect()
    }
}

fn required_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation(ValidationError::MissingField(
            "name".to_string(),
        )));
    }
    Ok(name.to_string())
}

impl AccountRepositoryTrait for AccountRepository {
    fn client_exists(&self, client_id: i32) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;
        diesel::select(exists(clients::table.find(client_id)))
            .get_result::<bool>(&mut conn)
            .into_core()
    }

    fn advisor_exists(&self, advisor_id: i32) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;
        diesel::select(exists(advisors::table.find(advisor_id)))
            .get_result::<bool>(&mut conn)
            .into_core()
    }

    fn account_exists(&self, account_id: i32) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;
        diesel::select(exists(accounts::table.find(account_id)))
            .get_result::<bool>(&mut conn)
            .into_core()
    }

    fn get_by_id(&self, account_id: i32) -> Result<Account> {
        let mut conn = get_connection(&self.pool)?;
        let row = accounts::table
            .find(account_id)
            .select(AccountDB::as_select())
            .first::<AccountDB>(&mut conn)
            .into_core()?;
        Account::try_from(row)
    }

    fn list(&self) -> Result<Vec<Account>> {
        self.load(accounts::table.into_boxed())
    }

    fn list_by_advisor(&self, advisor_id: i32) -> Result<Vec<Account>> {
        self.load(
            accounts::table
                .filter(accounts::advisor_id.eq(advisor_id))
                .into_boxed(),
        )
    }

    fn list_by_client(&self, client_id: i32) -> Result<Vec<Account>> {
        self.load(
            accounts::table
                .filter(accounts::client_id.eq(client_id))
                .into_boxed(),
        )
    }
}
