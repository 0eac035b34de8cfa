use std::collections::{BTreeMap, HashMap};

use log::warn;
use num_traits::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::constants::CASH_SECTOR;
use crate::errors::{Error, Result};

/// Converts per-sector values to whole percentages of their total.
///
/// Halves round away from zero. When the total is not positive (an empty
/// book, or an overdraft larger than the holdings) every sector is reported
/// at 0%. Fails when the total does not fit in a `Decimal`.
pub fn percent_weights(values: &HashMap<String, Decimal>) -> Result<HashMap<String, i32>> {
    let total = values
        .values()
        .try_fold(Decimal::ZERO, |sum, value| sum.checked_add(*value))
        .ok_or_else(|| Error::out_of_range("totalValue", "sum of sector values"))?;
    if total < Decimal::ZERO {
        warn!("Total value {} is negative; reporting all sectors at 0%", total);
    }

    values
        .iter()
        .map(|(sector, value)| {
            let percent = if total <= Decimal::ZERO {
                0
            } else {
                value
                    .checked_mul(Decimal::ONE_HUNDRED)
                    .and_then(|scaled| scaled.checked_div(total))
                    .ok_or_else(|| Error::out_of_range("sectorWeight", sector))?
                    .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                    .to_i32()
                    .unwrap_or(0)
            };
            Ok((sector.clone(), percent))
        })
        .collect()
}

/// Signed deviation `current - target` for every sector the profile targets,
/// with cash always checked. Sectors the profile does not name are ignored;
/// a targeted sector the account does not hold counts as 0%.
pub fn weight_deviations(
    current: &HashMap<String, i32>,
    target: &HashMap<String, i32>,
) -> BTreeMap<String, i32> {
    target
        .keys()
        .map(String::as_str)
        .chain(std::iter::once(CASH_SECTOR))
        .map(|sector| {
            let now = current.get(sector).copied().unwrap_or(0);
            let wanted = target.get(sector).copied().unwrap_or(0);
            (sector.to_string(), now - wanted)
        })
        .collect()
}

/// True when any deviation exceeds `tolerance` in absolute value.
pub fn exceeds_tolerance(deviations: &BTreeMap<String, i32>, tolerance: i32) -> bool {
    deviations.values().any(|d| d.abs() > tolerance)
}
