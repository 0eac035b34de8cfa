//! Instrument and sector domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::CASH_SECTOR;
use crate::{errors::ValidationError, Error, Result};

/// A categorical grouping of instruments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sector {
    pub id: i32,
    pub name: String,
}

impl Sector {
    /// True for the implicit cash pseudo-sector.
    pub fn is_cash(&self) -> bool {
        self.name.eq_ignore_ascii_case(CASH_SECTOR)
    }
}

/// A tradable stock, read-only to the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    pub symbol: String,
    pub company_name: String,
    pub sector_id: i32,
    pub sector_name: String,
    pub current_price: Decimal,
}

/// Input model for defining a new instrument.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInstrument {
    pub symbol: String,
    pub company_name: String,
    pub sector_name: String,
}

impl NewInstrument {
    /// Validates the new instrument data.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("symbol", &self.symbol),
            ("companyName", &self.company_name),
            ("sectorName", &self.sector_name),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Validation(ValidationError::MissingField(
                    field.to_string(),
                )));
            }
        }
        Ok(())
    }
}

/// Rejects negative prices.
pub fn validate_price(price: Decimal) -> Result<()> {
    if price < Decimal::ZERO {
        return Err(Error::Validation(ValidationError::OutOfRange {
            field: "price".to_string(),
            value: price.to_string(),
        }));
    }
    Ok(())
}
