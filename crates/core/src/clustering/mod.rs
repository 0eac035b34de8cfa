//! Clustering module - groups accounts by sector preference.

mod clusterer;
mod clustering_service;

pub use clusterer::{
    assign_to_representatives, recompute_representatives, seed_representatives, AdvisorClusterer,
    ClusterOutcome,
};
pub use clustering_service::{ClusteringService, ClusteringServiceTrait};

#[cfg(test)]
mod clustering_tests;
