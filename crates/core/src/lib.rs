//! Advisory Desk Core - Domain entities, services, and traits.
//!
//! This crate contains the trading, dividend and analytics logic of the desk.
//! It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate.

pub mod accounts;
pub mod clustering;
pub mod constants;
pub mod dividends;
pub mod errors;
pub mod firm;
pub mod holdings;
pub mod instruments;
pub mod portfolio;
pub mod profiles;
pub mod recommendations;
pub mod similarity;
pub mod trading;

#[cfg(test)]
pub(crate) mod test_support;

pub use firm::{FirmRepositories, FirmService, FirmServiceTrait};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
