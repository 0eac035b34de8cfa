use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use rand::Rng;
use serde::Serialize;

use crate::constants::CLUSTER_SEED_UPPER_BOUND;
use crate::similarity::{cosine_similarity, WeightVector};

/// Result of a clustering run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterOutcome {
    /// Account ids grouped by the representative they were assigned to.
    pub groups: BTreeSet<BTreeSet<i32>>,
    /// Representative index per account after the last iteration.
    pub assignments: BTreeMap<i32, usize>,
    pub iterations: usize,
    /// Highest account-to-representative similarity after the last iteration.
    pub max_similarity: f64,
    /// True when `max_similarity` fell within the tolerance.
    pub converged: bool,
}

impl ClusterOutcome {
    fn empty() -> Self {
        ClusterOutcome {
            groups: BTreeSet::new(),
            assignments: BTreeMap::new(),
            iterations: 0,
            max_similarity: 0.0,
            converged: false,
        }
    }
}

/// Centroid-style grouping of sector value vectors.
///
/// A fixed set of `max_groups` representatives is seeded randomly and then
/// refined up to `max_groups` times. Each account joins the representative
/// with the lowest cosine similarity; ties go to the lower index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdvisorClusterer {
    pub tolerance: f64,
    pub max_groups: usize,
}

impl AdvisorClusterer {
    pub fn new(tolerance: f64, max_groups: usize) -> Self {
        Self {
            tolerance,
            max_groups,
        }
    }

    pub fn run<R: Rng>(
        &self,
        vectors: &BTreeMap<i32, WeightVector>,
        sector_keys: &[String],
        rng: &mut R,
    ) -> ClusterOutcome {
        if self.max_groups == 0 || vectors.is_empty() {
            return ClusterOutcome::empty();
        }

        let mut representatives = seed_representatives(self.max_groups, sector_keys, rng);
        let mut assignments = BTreeMap::new();
        let mut max_similarity = f64::MIN;
        let mut converged = false;
        let mut iterations = 0;

        while !converged && iterations < self.max_groups {
            assignments = assign_to_representatives(vectors, &representatives);
            representatives =
                recompute_representatives(vectors, &assignments, representatives.len());
            max_similarity = max_assigned_similarity(vectors, &assignments, &representatives);
            converged = max_similarity <= self.tolerance;
            iterations += 1;
            debug!(
                "Clustering iteration {}: max similarity {:.6} (tolerance {})",
                iterations, max_similarity, self.tolerance
            );
        }

        ClusterOutcome {
            groups: group_by_representative(&assignments),
            assignments,
            iterations,
            max_similarity,
            converged,
        }
    }
}

/// `count` representatives with a uniform value in `[0, 100)` per sector key.
pub fn seed_representatives<R: Rng>(
    count: usize,
    sector_keys: &[String],
    rng: &mut R,
) -> Vec<WeightVector> {
    (0..count)
        .map(|_| {
            sector_keys
                .iter()
                .map(|key| (key.clone(), rng.gen_range(0.0..CLUSTER_SEED_UPPER_BOUND)))
                .collect()
        })
        .collect()
}

/// Index of the representative with the lowest similarity for each account.
pub fn assign_to_representatives(
    vectors: &BTreeMap<i32, WeightVector>,
    representatives: &[WeightVector],
) -> BTreeMap<i32, usize> {
    vectors
        .iter()
        .map(|(account_id, vector)| {
            let mut closest = 0;
            let mut lowest = f64::MAX;
            for (index, representative) in representatives.iter().enumerate() {
                let similarity = cosine_similarity(vector, representative);
                if similarity < lowest {
                    lowest = similarity;
                    closest = index;
                }
            }
            (*account_id, closest)
        })
        .collect()
}

/// Per-sector mean of each representative's members; empty groups get an
/// empty vector.
pub fn recompute_representatives(
    vectors: &BTreeMap<i32, WeightVector>,
    assignments: &BTreeMap<i32, usize>,
    count: usize,
) -> Vec<WeightVector> {
    let mut sums = vec![WeightVector::new(); count];
    let mut members = vec![0usize; count];

    for (account_id, index) in assignments {
        let Some(vector) = vectors.get(account_id) else {
            continue;
        };
        for (key, value) in vector {
            *sums[*index].entry(key.clone()).or_insert(0.0) += value;
        }
        members[*index] += 1;
    }

    sums.into_iter()
        .zip(members)
        .map(|(sum, n)| {
            let divisor = n.max(1) as f64;
            sum.into_iter().map(|(key, total)| (key, total / divisor)).collect()
        })
        .collect()
}

fn max_assigned_similarity(
    vectors: &BTreeMap<i32, WeightVector>,
    assignments: &BTreeMap<i32, usize>,
    representatives: &[WeightVector],
) -> f64 {
    assignments
        .iter()
        .filter_map(|(account_id, index)| {
            let vector = vectors.get(account_id)?;
            let representative = representatives.get(*index)?;
            Some(cosine_similarity(vector, representative))
        })
        .fold(f64::MIN, f64::max)
}

fn group_by_representative(assignments: &BTreeMap<i32, usize>) -> BTreeSet<BTreeSet<i32>> {
    let mut groups: BTreeMap<usize, BTreeSet<i32>> = BTreeMap::new();
    for (account_id, index) in assignments {
        groups.entry(*index).or_default().insert(*account_id);
    }
    groups.into_values().collect()
}
