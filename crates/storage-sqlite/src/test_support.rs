//! Temporary databases for repository tests.

use std::str::FromStr;
use std::sync::Arc;

use advisory_desk_core::accounts::NewAccount;
use advisory_desk_core::instruments::NewInstrument;
use diesel::prelude::*;
use rust_decimal::Decimal;
use tempfile::TempDir;

use crate::accounts::AccountRepository;
use crate::db::{create_pool, get_connection, run_migrations, spawn_writer, DbPool, WriteHandle};
use crate::instruments::InstrumentRepository;
use crate::schema::{accounts, positions};

pub(crate) struct TestDb {
    pub pool: Arc<DbPool>,
    pub writer: WriteHandle,
    _dir: TempDir,
}

/// Fresh migrated database in a temp directory. Call from inside a runtime.
pub(crate) fn setup_db() -> TestDb {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("test.db").to_string_lossy().into_owned();
    let pool = create_pool(&path).expect("Failed to create pool");
    run_migrations(&pool).expect("Failed to run migrations");
    let writer = spawn_writer((*pool).clone());
    TestDb {
        pool,
        writer,
        _dir: dir,
    }
}

impl TestDb {
    pub fn insert_position(&self, account_id: i32, symbol: &str, quantity: &str, acb: &str) {
        let mut conn = get_connection(&self.pool).expect("connection");
        diesel::insert_into(positions::table)
            .values((
                positions::account_id.eq(account_id),
                positions::symbol.eq(symbol),
                positions::quantity.eq(quantity),
                positions::average_cost.eq(acb),
            ))
            .execute(&mut conn)
            .expect("Failed to insert position");
    }

    pub fn cash(&self, account_id: i32) -> Decimal {
        let mut conn = get_connection(&self.pool).expect("connection");
        let stored = accounts::table
            .find(account_id)
            .select(accounts::cash_balance)
            .first::<String>(&mut conn)
            .expect("account row");
        Decimal::from_str(&stored).expect("decimal cash balance")
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Book {
    pub account: i32,
    pub other_account: i32,
}

/// One client, one advisor, the Technology sector with ACME and BETA, and
/// two accounts.
pub(crate) async fn seed_book(db: &TestDb) -> Book {
    let accounts = AccountRepository::new(db.pool.clone(), db.writer.clone());
    let instruments = InstrumentRepository::new(db.pool.clone(), db.writer.clone());

    let client = accounts.create_client("Ada").await.expect("client");
    let advisor = accounts.create_advisor("Bob").await.expect("advisor");
    instruments.define_sector("Technology").await.expect("sector");
    for symbol in ["ACME", "BETA"] {
        instruments
            .define_instrument(NewInstrument {
                symbol: symbol.to_string(),
                company_name: format!("{} Inc", symbol),
                sector_name: "Technology".to_string(),
            })
            .await
            .expect("instrument");
    }

    let mut ids = Vec::new();
    for name in ["RRSP", "TFSA"] {
        let id = accounts
            .create_account(NewAccount {
                client_id: client,
                advisor_id: advisor,
                name: name.to_string(),
                profile_name: "Balanced".to_string(),
                reinvest: true,
            })
            .await
            .expect("account");
        ids.push(id);
    }

    Book {
        account: ids[0],
        other_account: ids[1],
    }
}
