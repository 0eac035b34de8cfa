//! Wiring of every SQLite repository over one pool and one writer.

use std::sync::Arc;

use advisory_desk_core::{FirmRepositories, Result};
use log::info;

use crate::accounts::AccountRepository;
use crate::db::{self, spawn_writer, DbPool, WriteHandle};
use crate::holdings::HoldingRepository;
use crate::instruments::InstrumentRepository;
use crate::ledger::{FractionalCarryRepository, LedgerRepository};
use crate::profiles::ProfileRepository;

/// Concrete repositories over one database.
///
/// The lifecycle operations (clients, advisors, accounts, sectors,
/// instruments, prices, profiles) live on the concrete types; the desk
/// services see them through [`SqliteStore::repositories`].
#[derive(Clone)]
pub struct SqliteStore {
    pub accounts: Arc<AccountRepository>,
    pub holdings: Arc<HoldingRepository>,
    pub instruments: Arc<InstrumentRepository>,
    pub profiles: Arc<ProfileRepository>,
    pub ledger: Arc<LedgerRepository>,
    pub carry: Arc<FractionalCarryRepository>,
}

impl SqliteStore {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self {
            accounts: Arc::new(AccountRepository::new(pool.clone(), writer.clone())),
            holdings: Arc::new(HoldingRepository::new(pool.clone())),
            instruments: Arc::new(InstrumentRepository::new(pool.clone(), writer.clone())),
            profiles: Arc::new(ProfileRepository::new(pool.clone(), writer.clone())),
            ledger: Arc::new(LedgerRepository::new(writer.clone())),
            carry: Arc::new(FractionalCarryRepository::new(pool, writer)),
        }
    }

    /// Initialises the database under `app_data_dir`, applies pending
    /// migrations and starts the writer. Must run inside a Tokio runtime.
    pub fn open(app_data_dir: &str) -> Result<Self> {
        let db_path = db::init(app_data_dir)?;
        info!("Database path in use: {}", db_path);
        let pool = db::create_pool(&db_path)?;
        db::run_migrations(&pool)?;
        let writer = spawn_writer((*pool).clone());
        Ok(Self::new(pool, writer))
    }

    /// The store as trait objects for `FirmService::from_repositories`.
    pub fn repositories(&self) -> FirmRepositories {
        FirmRepositories {
            accounts: self.accounts.clone(),
            holdings: self.holdings.clone(),
            instruments: self.instruments.clone(),
            profiles: self.profiles.clone(),
            ledger: self.ledger.clone(),
            carry: self.carry.clone(),
        }
    }
}
