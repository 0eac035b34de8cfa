use std::collections::{BTreeMap, HashMap};

use log::debug;

use crate::similarity::{cosine_similarity, WeightVector};

/// Other accounts ordered by similarity to `target`, most similar first.
/// Equal scores are ordered by ascending account id.
pub fn rank_peers(
    target_id: i32,
    target: &WeightVector,
    vectors: &BTreeMap<i32, WeightVector>,
) -> Vec<(i32, f64)> {
    let mut ranked: Vec<(i32, f64)> = vectors
        .iter()
        .filter(|(id, _)| **id != target_id)
        .map(|(id, vector)| (*id, cosine_similarity(target, vector)))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct PeerCounts {
    zero: usize,
    non_zero: usize,
}

fn peer_counts(symbol: &str, peers: &[&WeightVector]) -> PeerCounts {
    let mut counts = PeerCounts::default();
    for shares in peers.iter().filter_map(|p| p.get(symbol)) {
        if *shares == 0.0 {
            counts.zero += 1;
        } else {
            counts.non_zero += 1;
        }
    }
    counts
}

/// Buy (`true`) or sell (`false`) suggestions for `target` from its peers.
///
/// A symbol the target lacks but most peers hold is a buy candidate weighted
/// by the holders; a symbol the target holds but most peers lack is a sell
/// candidate weighted by the non-holders. Up to `max_recommendations`
/// candidates are taken by weight. A second pass over the target's unheld
/// symbols compares them pairwise and may add further buys while the shared
/// counter, which also counts every first-pass candidate, stays below the cap.
pub fn recommend(
    target: &WeightVector,
    peers: &[&WeightVector],
    max_recommendations: usize,
) -> HashMap<String, bool> {
    let mut recommendations: HashMap<String, bool> = HashMap::new();
    let mut counter = 0usize;
    let mut buys: BTreeMap<&str, usize> = BTreeMap::new();
    let mut sells: BTreeMap<&str, usize> = BTreeMap::new();

    for (symbol, held) in target {
        let counts = peer_counts(symbol, peers);
        if *held == 0.0 {
            if counts.non_zero > counts.zero {
                buys.insert(symbol, counts.non_zero);
                counter += 1;
            }
        } else if counts.zero > counts.non_zero {
            sells.insert(symbol, counts.zero);
            counter += 1;
        }
    }
    debug!(
        "First pass: {} buy and {} sell candidate(s)",
        buys.len(),
        sells.len()
    );

    for _ in 0..max_recommendations {
        let mut best: Option<(&str, bool)> = None;
        let mut best_weight = 0usize;
        for (candidates, is_buy) in [(&buys, true), (&sells, false)] {
            for (symbol, weight) in candidates.iter() {
                let unseen = !recommendations.contains_key(*symbol);
                if unseen && (best.is_none() || *weight > best_weight) {
                    best = Some((*symbol, is_buy));
                    best_weight = *weight;
                }
            }
        }
        if let Some((symbol, is_buy)) = best {
            recommendations.insert(symbol.to_string(), is_buy);
        }
    }

    let unheld: Vec<&str> = target
        .iter()
        .filter(|(_, held)| **held == 0.0)
        .map(|(symbol, _)| symbol.as_str())
        .collect();
    let holder_counts: Vec<usize> = unheld
        .iter()
        .map(|symbol| peer_counts(symbol, peers).non_zero)
        .collect();

    for (i, key) in unheld.iter().enumerate() {
        for (j, other) in unheld.iter().enumerate() {
            if i == j {
                continue;
            }
            let chosen = if holder_counts[j] > holder_counts[i] {
                other
            } else {
                key
            };
            if counter < max_recommendations {
                recommendations.insert(chosen.to_string(), true);
                counter += 1;
            }
        }
    }

    recommendations
}
