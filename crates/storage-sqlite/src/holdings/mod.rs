//! SQLite storage implementation for account positions.

mod model;
mod repository;

pub use model::PositionDB;
pub use repository::HoldingRepository;
