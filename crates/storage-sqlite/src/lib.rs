//! SQLite storage implementation for the advisory desk.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `advisory-desk-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for all desk entities
//! - Entity lifecycle operations (clients, advisors, accounts, sectors, instruments, profiles)
//!
//! # Architecture
//!
//! This crate is the only place in the workspace where Diesel dependencies exist.
//! All ledger mutations go through a single writer actor.
//!
//! ```text
//!        core (domain + services)
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!                  │
//!                  ▼
//!              SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
pub mod store;

// Repository implementations
pub mod accounts;
pub mod holdings;
pub mod instruments;
pub mod ledger;
pub mod profiles;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, get_db_path, init, run_migrations, spawn_writer, DbConnection,
    DbPool, WriteHandle,
};

pub use store::SqliteStore;

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from advisory-desk-core for convenience
pub use advisory_desk_core::errors::{DatabaseError, Error, Result};
