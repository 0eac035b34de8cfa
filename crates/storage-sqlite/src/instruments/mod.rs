//! SQLite storage implementation for instruments, sectors and prices.

mod model;
mod repository;

pub use model::{InstrumentDB, SectorDB};
pub use repository::InstrumentRepository;

pub(crate) use repository::ensure_cash_sector;
