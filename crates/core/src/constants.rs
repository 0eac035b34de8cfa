/// Pseudo-symbol that routes a trade to the cash balance instead of a position.
/// Matched case-insensitively.
pub const CASH_SYMBOL: &str = "cash";

/// Name of the implicit cash pseudo-sector used in allocations and profiles.
pub const CASH_SECTOR: &str = "Cash";

/// A profile's sector targets must add up to this many percent.
pub const PROFILE_TOTAL_PERCENT: i32 = 100;

/// Upper bound (exclusive) of the random per-sector values seeding cluster representatives.
pub const CLUSTER_SEED_UPPER_BOUND: f64 = 100.0;

/// Decimal places kept on share quantities bought with reinvested dividends
pub const DECIMAL_PRECISION: u32 = 6;

/// Returns true when `symbol` is the cash pseudo-symbol.
pub fn is_cash_symbol(symbol: &str) -> bool {
    symbol.trim().eq_ignore_ascii_case(CASH_SYMBOL)
}
