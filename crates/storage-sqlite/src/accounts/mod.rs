//! SQLite storage implementation for accounts, clients and advisors.

mod model;
mod repository;

pub use model::{AccountDB, NewAccountDB};
pub use repository::AccountRepository;
