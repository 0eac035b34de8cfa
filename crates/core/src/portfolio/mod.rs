//! Portfolio analytics - valuation and sector allocation.

pub mod allocation;
pub mod valuation;

pub use allocation::{AllocationService, AllocationServiceTrait};
pub use valuation::{ValuationService, ValuationServiceTrait};
