use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use log::{debug, info};
use num_traits::ToPrimitive;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rust_decimal::Decimal;

use super::clusterer::{AdvisorClusterer, ClusterOutcome};
use crate::errors::{Error, Result, ValidationError};
use crate::holdings::HoldingRepositoryTrait;
use crate::instruments::InstrumentRepositoryTrait;
use crate::similarity::WeightVector;

pub trait ClusteringServiceTrait: Send + Sync {
    /// Groups accounts with positions into at most `max_groups` sets.
    fn advisor_groups(&self, tolerance: f64, max_groups: usize) -> Result<BTreeSet<BTreeSet<i32>>>;

    /// Same as `advisor_groups` with iteration details.
    fn cluster(&self, tolerance: f64, max_groups: usize) -> Result<ClusterOutcome>;
}

/// Builds per-account sector value vectors and clusters them.
pub struct ClusteringService {
    holdings: Arc<dyn HoldingRepositoryTrait>,
    instruments: Arc<dyn InstrumentRepositoryTrait>,
    seed: Option<u64>,
}

impl ClusteringService {
    pub fn new(
        holdings: Arc<dyn HoldingRepositoryTrait>,
        instruments: Arc<dyn InstrumentRepositoryTrait>,
    ) -> Self {
        Self {
            holdings,
            instruments,
            seed: None,
        }
    }

    /// Seeds the representative generator for reproducible groupings.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Non-cash sector ids and, per account holding anything, the market value
    /// held in each of those sectors.
    fn sector_value_vectors(&self) -> Result<(Vec<String>, BTreeMap<i32, WeightVector>)> {
        let sector_keys: Vec<String> = self
            .instruments
            .list_sectors()?
            .into_iter()
            .filter(|s| !s.is_cash())
            .map(|s| s.id.to_string())
            .collect();

        let instruments: HashMap<String, (String, Decimal)> = self
            .instruments
            .list()?
            .into_iter()
            .map(|i| (i.symbol, (i.sector_id.to_string(), i.current_price)))
            .collect();

        let mut vectors: BTreeMap<i32, WeightVector> = BTreeMap::new();
        for position in self.holdings.list_all()? {
            let vector = vectors.entry(position.account_id).or_default();
            let Some((sector, price)) = instruments.get(&position.symbol) else {
                continue;
            };
            if !sector_keys.contains(sector) {
                continue;
            }
            let value = position.market_value(*price)?.to_f64().ok_or_else(|| {
                Error::Clustering(format!(
                    "value of {} in account {} is not representable",
                    position.symbol, position.account_id
                ))
            })?;
            *vector.entry(sector.clone()).or_insert(0.0) += value;
        }

        Ok((sector_keys, vectors))
    }
}

impl ClusteringServiceTrait for ClusteringService {
    fn advisor_groups(&self, tolerance: f64, max_groups: usize) -> Result<BTreeSet<BTreeSet<i32>>> {
        Ok(self.cluster(tolerance, max_groups)?.groups)
    }

    fn cluster(&self, tolerance: f64, max_groups: usize) -> Result<ClusterOutcome> {
        if !tolerance.is_finite() {
            return Err(ValidationError::OutOfRange {
                field: "tolerance".to_string(),
                value: tolerance.to_string(),
            }
            .into());
        }

        let (sector_keys, vectors) = self.sector_value_vectors()?;
        debug!(
            "Clustering {} account(s) over {} sector(s) into at most {} group(s)",
            vectors.len(),
            sector_keys.len(),
            max_groups
        );

        let outcome =
            AdvisorClusterer::new(tolerance, max_groups).run(&vectors, &sector_keys, &mut self.rng());
        info!(
            "Clustering produced {} group(s) after {} iteration(s); max similarity {:.6}, converged: {}",
            outcome.groups.len(),
            outcome.iterations,
            outcome.max_similarity,
            outcome.converged
        );
        Ok(outcome)
    }
}
