//! SQLite storage implementation for target allocation profiles.

mod model;
mod repository;

pub use model::ProfileTargetDB;
pub use repository::ProfileRepository;
