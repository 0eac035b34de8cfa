use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use log::{debug, info};
use num_traits::ToPrimitive;

use super::recommender::{rank_peers, recommend};
use crate::accounts::AccountRepositoryTrait;
use crate::errors::{Error, Result};
use crate::holdings::HoldingRepositoryTrait;
use crate::instruments::InstrumentRepositoryTrait;
use crate::similarity::WeightVector;

pub trait RecommendationServiceTrait: Send + Sync {
    /// Buy (`true`) or sell (`false`) suggestions for an account based on its
    /// `num_comparators` most similar peers.
    fn stock_recommendations(
        &self,
        account_id: i32,
        max_recommendations: usize,
        num_comparators: usize,
    ) -> Result<HashMap<String, bool>>;
}

pub struct RecommendationService {
    accounts: Arc<dyn AccountRepositoryTrait>,
    holdings: Arc<dyn HoldingRepositoryTrait>,
    instruments: Arc<dyn InstrumentRepositoryTrait>,
}

impl RecommendationService {
    pub fn new(
        accounts: Arc<dyn AccountRepositoryTrait>,
        holdings: Arc<dyn HoldingRepositoryTrait>,
        instruments: Arc<dyn InstrumentRepositoryTrait>,
    ) -> Self {
        Self {
            accounts,
            holdings,
            instruments,
        }
    }

    /// Shares per symbol over every known instrument, for the target and
    /// every account with a position.
    fn holdings_vectors(&self, target_id: i32) -> Result<BTreeMap<i32, WeightVector>> {
        let universe: WeightVector = self
            .instruments
            .list()?
            .into_iter()
            .map(|i| (i.symbol, 0.0))
            .collect();

        let mut vectors: BTreeMap<i32, WeightVector> = BTreeMap::new();
        vectors.insert(target_id, universe.clone());
        for position in self.holdings.list_all()? {
            let shares = position.quantity.to_f64().ok_or_else(|| {
                Error::Unexpected(format!(
                    "quantity {} of {} is not representable",
                    position.quantity, position.symbol
                ))
            })?;
            vectors
                .entry(position.account_id)
                .or_insert_with(|| universe.clone())
                .insert(position.symbol, shares);
        }
        Ok(vectors)
    }
}

impl RecommendationServiceTrait for RecommendationService {
    fn stock_recommendations(
        &self,
        account_id: i32,
        max_recommendations: usize,
        num_comparators: usize,
    ) -> Result<HashMap<String, bool>> {
        if !self.accounts.account_exists(account_id)? {
            return Err(Error::unknown("account", account_id));
        }
        if max_recommendations == 0 || num_comparators == 0 {
            return Ok(HashMap::new());
        }

        let vectors = self.holdings_vectors(account_id)?;
        let Some(target) = vectors.get(&account_id) else {
            return Ok(HashMap::new());
        };

        let ranked = rank_peers(account_id, target, &vectors);
        let peers: Vec<&WeightVector> = ranked
            .iter()
            .take(num_comparators)
            .filter_map(|(id, _)| vectors.get(id))
            .collect();
        debug!(
            "Account {} compared against peers {:?}",
            account_id,
            ranked.iter().take(num_comparators).collect::<Vec<_>>()
        );

        let recommendations = recommend(target, &peers, max_recommendations);
        info!(
            "{} recommendation(s) for account {}",
            recommendations.len(),
            account_id
        );
        Ok(recommendations)
    }
}
