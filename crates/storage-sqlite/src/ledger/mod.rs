//! SQLite storage implementation for the cash and position ledger and the
//! firm's fractional share carry.

mod carry_repository;
mod repository;

pub use carry_repository::FractionalCarryRepository;
pub use repository::{LedgerRepository, SqliteLedgerTransaction};
