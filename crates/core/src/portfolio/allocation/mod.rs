//! Portfolio allocation module for sector breakdowns and profile divergence.

mod allocation_calculator;
mod allocation_service;

pub use allocation_calculator::{exceeds_tolerance, percent_weights, weight_deviations};
pub use allocation_service::{AllocationService, AllocationServiceTrait};
