use async_trait::async_trait;
use rust_decimal::Decimal;

use super::dividends_model::DividendDistribution;
use crate::errors::Result;

/// Storage for the firm-wide fractional share balance per symbol.
#[async_trait]
pub trait FractionalCarryRepositoryTrait: Send + Sync {
    /// Carried balance for `symbol`; zero when nothing was carried yet.
    fn get_carry(&self, symbol: &str) -> Result<Decimal>;

    /// Replaces the carried balance for `symbol`.
    async fn set_carry(&self, symbol: &str, value: Decimal) -> Result<()>;
}

#[async_trait]
pub trait DividendServiceTrait: Send + Sync {
    /// Pays `per_share` on every open position in `symbol` and reconciles
    /// the firm carry.
    async fn distribute(&self, symbol: &str, per_share: Decimal) -> Result<DividendDistribution>;
}
