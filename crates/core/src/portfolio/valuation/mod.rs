mod valuation_service;

pub use valuation_service::{ValuationService, ValuationServiceTrait};
