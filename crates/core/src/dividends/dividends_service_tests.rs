use super::*;
use crate::errors::{Error, ValidationError};
use crate::test_support::InMemoryStore;
use crate::trading::{TradingService, TradingServiceTrait};
use rust_decimal_macros::dec;
use std::sync::Arc;

fn setup() -> (Arc<InMemoryStore>, DividendService) {
    let store = InMemoryStore::new();
    store.add_sector(1, "Technology");
    store.add_instrument("ACME", 1, dec!(10));
    store.add_account(1, 10, 20, "Growth", true, dec!(0));
    store.add_account(2, 11, 20, "Growth", false, dec!(0));
    store.set_position(1, "ACME", dec!(3), dec!(8));
    store.set_position(2, "ACME", dec!(5), dec!(9));

    let trading: Arc<dyn TradingServiceTrait> =
        Arc::new(TradingService::new(store.clone(), store.clone(), store.clone()));
    let service = DividendService::new(
        trading,
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
    );
    (store, service)
}

#[test]
fn test_carry_shortfall_rounds_up() {
    let settlement = reconcile_carry(dec!(0.3), dec!(0.5));
    assert_eq!(settlement.whole_shares, 1);
    assert_eq!(settlement.new_carry, dec!(0.8));
    assert_eq!(settlement.previous_carry, dec!(0.3));
}

#[test]
fn test_carry_covers_fractional() {
    let settlement = reconcile_carry(dec!(0.8), dec!(0.5));
    assert_eq!(settlement.whole_shares, 0);
    assert_eq!(settlement.new_carry, dec!(0.3));
}

#[test]
fn test_carry_multi_share_shortfall() {
    let settlement = reconcile_carry(dec!(0.2), dec!(2.7));
    assert_eq!(settlement.whole_shares, 3);
    assert_eq!(settlement.new_carry, dec!(0.5));
}

#[test]
fn test_carry_equal_amounts_settle_nothing() {
    let settlement = reconcile_carry(dec!(0.4), dec!(0.4));
    assert_eq!(settlement.whole_shares, 0);
    assert_eq!(settlement.new_carry, dec!(0));

    let settlement = reconcile_carry(dec!(0), dec!(0));
    assert_eq!(settlement.whole_shares, 0);
    assert_eq!(settlement.new_carry, dec!(0));
}

#[tokio::test]
async fn test_distribute_reinvests_and_pays_cash() {
    let (store, service) = setup();
    store.put_carry("ACME", dec!(0.3));

    let distribution = service.distribute("ACME", dec!(1.5)).await.unwrap();

    // Account 1: 4.5 reinvested at 10 buys 0.45 shares.
    let reinvested = store.position(1, "ACME").unwrap();
    assert_eq!(reinvested.quantity, dec!(3.45));
    assert_eq!(store.cash(1), dec!(0));

    // Account 2: 7.5 paid as cash, position untouched.
    assert_eq!(store.cash(2), dec!(7.5));
    assert_eq!(store.position(2, "ACME").unwrap().quantity, dec!(5));

    assert_eq!(distribution.payouts.len(), 2);
    assert_eq!(distribution.total_paid(), dec!(12));
    assert_eq!(distribution.fractional_total, dec!(0.45));
    assert_eq!(distribution.settlement.whole_shares, 1);
    assert_eq!(distribution.settlement.new_carry, dec!(0.85));
    assert_eq!(store.carry("ACME"), dec!(0.85));

    let payout = distribution
        .payouts
        .iter()
        .find(|p| p.account_id == 1)
        .unwrap();
    assert_eq!(payout.method, PayoutMethod::Reinvested);
    assert_eq!(payout.shares_bought, dec!(0.45));
}

#[tokio::test]
async fn test_carry_absorbs_small_fraction() {
    let (store, service) = setup();
    store.put_carry("ACME", dec!(0.9));

    let distribution = service.distribute("ACME", dec!(1.5)).await.unwrap();

    assert_eq!(distribution.settlement.whole_shares, 0);
    assert_eq!(store.carry("ACME"), dec!(0.45));
}

#[tokio::test]
async fn test_zero_price_pays_cash_to_reinvestors() {
    let (store, service) = setup();
    store.set_price("ACME", dec!(0));

    let distribution = service.distribute("ACME", dec!(1)).await.unwrap();

    assert_eq!(store.cash(1), dec!(3));
    assert_eq!(store.position(1, "ACME").unwrap().quantity, dec!(3));
    assert!(distribution
        .payouts
        .iter()
        .all(|p| p.method == PayoutMethod::Cash));
    assert_eq!(distribution.settlement.whole_shares, 0);
}

#[tokio::test]
async fn test_closed_positions_are_skipped() {
    let (store, service) = setup();
    store.set_position(2, "ACME", dec!(0), dec!(9));

    let distribution = service.distribute("ACME", dec!(2)).await.unwrap();

    assert_eq!(distribution.payouts.len(), 1);
    assert_eq!(store.cash(2), dec!(0));
}

#[tokio::test]
async fn test_whole_share_reinvestment_has_no_fraction() {
    let (store, service) = setup();

    let distribution = service.distribute("ACME", dec!(10)).await.unwrap();

    // 30 / 10 = 3 whole shares, nothing added to the carry.
    assert_eq!(store.position(1, "ACME").unwrap().quantity, dec!(6));
    assert_eq!(distribution.fractional_total, dec!(0));
    assert_eq!(distribution.settlement.whole_shares, 0);
}

#[tokio::test]
async fn test_failed_payouts_do_not_abort_the_run() {
    let (store, service) = setup();
    store.fail_cash_adjustments(true);

    let distribution = service.distribute("ACME", dec!(1)).await.unwrap();

    assert!(distribution.payouts.is_empty());
    assert_eq!(store.cash(1), dec!(0));
    assert_eq!(store.cash(2), dec!(0));
}

#[tokio::test]
async fn test_rejected_reinvestment_keeps_the_dividend_as_cash() {
    let (store, service) = setup();
    store.add_account(3, 12, 20, "Growth", true, dec!(-10));
    store.set_position(3, "ACME", dec!(2), dec!(10));

    let distribution = service.distribute("ACME", dec!(1.5)).await.unwrap();

    // 3 credited; buying 0.3 shares for 3 would need cash the account lacks.
    assert_eq!(store.cash(3), dec!(-7));
    assert_eq!(store.position(3, "ACME").unwrap().quantity, dec!(2));
    let payout = distribution
        .payouts
        .iter()
        .find(|p| p.account_id == 3)
        .unwrap();
    assert_eq!(payout.method, PayoutMethod::Cash);
    assert_eq!(payout.shares_bought, dec!(0));
}

#[tokio::test]
async fn test_overflowing_dividend_skips_only_that_holder() {
    let (store, service) = setup();
    let huge = rust_decimal::Decimal::from(1_000_000_000_000_000i64);
    store.set_position(2, "ACME", huge, dec!(9));

    let distribution = service.distribute("ACME", huge).await.unwrap();

    assert!(distribution.payouts.iter().all(|p| p.account_id != 2));
    assert_eq!(store.cash(2), dec!(0));
}

#[tokio::test]
async fn test_rejects_invalid_input() {
    let (_store, service) = setup();

    assert!(matches!(
        service.distribute("", dec!(1)).await,
        Err(Error::Validation(ValidationError::MissingField(_)))
    ));
    assert!(matches!(
        service.distribute("ACME", dec!(-1)).await,
        Err(Error::Validation(ValidationError::OutOfRange { .. }))
    ));
    assert!(matches!(
        service.distribute("NOPE", dec!(1)).await,
        Err(Error::Validation(ValidationError::UnknownEntity { .. }))
    ));
}
