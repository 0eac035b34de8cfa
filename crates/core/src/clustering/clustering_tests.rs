use super::*;
use crate::errors::{Error, ValidationError};
use crate::similarity::WeightVector;
use crate::test_support::InMemoryStore;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rust_decimal_macros::dec;
use std::collections::{BTreeMap, BTreeSet};

fn vector(entries: &[(&str, f64)]) -> WeightVector {
    entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn keys() -> Vec<String> {
    vec!["1".to_string(), "2".to_string()]
}

fn service() -> ClusteringService {
    let store = InMemoryStore::new();
    store.add_sector(1, "Technology");
    store.add_sector(2, "Energy");
    store.add_instrument("ACME", 1, dec!(10));
    store.add_instrument("OILY", 2, dec!(20));
    store.add_account(1, 10, 20, "Growth", false, dec!(0));
    store.add_account(2, 10, 20, "Growth", false, dec!(0));
    store.add_account(3, 11, 21, "Growth", false, dec!(0));
    store.add_account(4, 11, 21, "Growth", false, dec!(500));
    store.set_position(1, "ACME", dec!(5), dec!(10));
    store.set_position(2, "OILY", dec!(3), dec!(20));
    store.set_position(3, "ACME", dec!(1), dec!(10));
    store.set_position(3, "OILY", dec!(1), dec!(20));
    ClusteringService::new(store.clone(), store.clone())
}

#[test]
fn test_assignment_prefers_lowest_similarity() {
    let representatives = vec![vector(&[("1", 1.0)]), vector(&[("2", 1.0)])];
    let vectors = BTreeMap::from([(7, vector(&[("1", 10.0)])), (8, vector(&[("2", 4.0)]))]);

    let assignments = assign_to_representatives(&vectors, &representatives);

    assert_eq!(assignments[&7], 1);
    assert_eq!(assignments[&8], 0);
}

#[test]
fn test_assignment_ties_go_to_first_representative() {
    let representatives = vec![vector(&[("1", 1.0)]), vector(&[("1", 3.0)])];
    let vectors = BTreeMap::from([(7, vector(&[("1", 2.0)])), (8, WeightVector::new())]);

    let assignments = assign_to_representatives(&vectors, &representatives);

    assert_eq!(assignments[&7], 0);
    assert_eq!(assignments[&8], 0);
}

#[test]
fn test_recompute_takes_member_means() {
    let vectors = BTreeMap::from([
        (1, vector(&[("1", 2.0), ("2", 4.0)])),
        (2, vector(&[("1", 6.0)])),
    ]);
    let assignments = BTreeMap::from([(1, 0), (2, 0)]);

    let representatives = recompute_representatives(&vectors, &assignments, 2);

    assert_eq!(representatives[0], vector(&[("1", 4.0), ("2", 2.0)]));
    assert!(representatives[1].is_empty());
}

#[test]
fn test_seeded_representatives_stay_in_range() {
    let mut rng = StdRng::seed_from_u64(3);
    let representatives = seed_representatives(4, &keys(), &mut rng);

    assert_eq!(representatives.len(), 4);
    for representative in &representatives {
        assert_eq!(representative.len(), 2);
        assert!(representative.values().all(|v| (0.0..100.0).contains(v)));
    }
}

#[test]
fn test_single_group_holds_everyone() {
    let vectors = BTreeMap::from([
        (1, vector(&[("1", 50.0)])),
        (2, vector(&[("2", 60.0)])),
    ]);
    let mut rng = StdRng::seed_from_u64(11);

    let outcome = AdvisorClusterer::new(1.0, 1).run(&vectors, &keys(), &mut rng);

    assert_eq!(outcome.groups, BTreeSet::from([BTreeSet::from([1, 2])]));
    assert_eq!(outcome.iterations, 1);
    assert!(outcome.converged);
}

#[test]
fn test_unreachable_tolerance_runs_max_groups_iterations() {
    let vectors = BTreeMap::from([
        (1, vector(&[("1", 50.0)])),
        (2, vector(&[("2", 60.0)])),
        (3, vector(&[("1", 10.0), ("2", 20.0)])),
    ]);
    let mut rng = StdRng::seed_from_u64(5);

    let outcome = AdvisorClusterer::new(-1.0, 3).run(&vectors, &keys(), &mut rng);

    assert_eq!(outcome.iterations, 3);
    assert!(!outcome.converged);
    assert!(outcome.groups.len() <= 3);
    let members: BTreeSet<i32> = outcome.groups.iter().flatten().copied().collect();
    assert_eq!(members, BTreeSet::from([1, 2, 3]));
}

#[test]
fn test_no_groups_or_no_accounts_is_empty() {
    let vectors = BTreeMap::from([(1, vector(&[("1", 50.0)]))]);
    let mut rng = StdRng::seed_from_u64(1);

    assert!(AdvisorClusterer::new(0.5, 0)
        .run(&vectors, &keys(), &mut rng)
        .groups
        .is_empty());
    assert!(AdvisorClusterer::new(0.5, 3)
        .run(&BTreeMap::new(), &keys(), &mut rng)
        .groups
        .is_empty());
}

#[test]
fn test_service_clusters_only_accounts_with_positions() {
    let service = service().with_seed(42);

    let groups = service.advisor_groups(1.0, 1).unwrap();

    assert_eq!(groups, BTreeSet::from([BTreeSet::from([1, 2, 3])]));
}

#[test]
fn test_seeded_service_is_reproducible() {
    let first = service().with_seed(9).cluster(-1.0, 3).unwrap();
    let second = service().with_seed(9).cluster(-1.0, 3).unwrap();

    assert_eq!(first.groups, second.groups);
    assert_eq!(first.assignments, second.assignments);
    assert_eq!(first.iterations, 3);
}

#[test]
fn test_service_rejects_non_finite_tolerance() {
    let service = service();

    assert!(matches!(
        service.advisor_groups(f64::NAN, 2),
        Err(Error::Validation(ValidationError::OutOfRange { .. }))
    ));
    assert!(service.advisor_groups(0.5, 0).unwrap().is_empty());
}
