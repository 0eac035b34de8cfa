//! Firm facade - one entry point over all desk services.

mod firm_service;

pub use firm_service::{FirmRepositories, FirmService, FirmServiceTrait};
