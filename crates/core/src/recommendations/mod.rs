//! Recommendations module - peer-based buy and sell suggestions.

mod recommendations_service;
mod recommender;

pub use recommendations_service::{RecommendationService, RecommendationServiceTrait};
pub use recommender::{rank_peers, recommend};
