//! Dividends module - cash payouts, reinvestment and the firm fractional carry.

mod dividends_model;
mod dividends_service;
mod dividends_traits;

pub use dividends_model::{
    reconcile_carry, CarrySettlement, DividendDistribution, DividendPayout, PayoutMethod,
};
pub use dividends_service::DividendService;
pub use dividends_traits::{DividendServiceTrait, FractionalCarryRepositoryTrait};

#[cfg(test)]
mod dividends_service_tests;
