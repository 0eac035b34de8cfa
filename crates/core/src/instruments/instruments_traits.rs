use std::collections::HashMap;

use rust_decimal::Decimal;

use super::instruments_model::{Instrument, Sector};
use crate::errors::Result;

/// Read access to instruments, prices and sectors.
pub trait InstrumentRepositoryTrait: Send + Sync {
    /// Returns true if the symbol is defined.
    fn instrument_exists(&self, symbol: &str) -> Result<bool>;

    /// Retrieves an instrument with its sector and current price.
    fn get_by_symbol(&self, symbol: &str) -> Result<Instrument>;

    /// Lists every instrument, ordered by symbol.
    fn list(&self) -> Result<Vec<Instrument>>;

    /// Lists every sector, including the cash pseudo-sector when defined.
    fn list_sectors(&self) -> Result<Vec<Sector>>;

    /// Current price per symbol for all instruments.
    fn price_map(&self) -> Result<HashMap<String, Decimal>> {
        Ok(self
            .list()?
            .into_iter()
            .map(|instrument| (instrument.symbol, instrument.current_price))
            .collect())
    }
}
