//! Account domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{errors::ValidationError, Error, Result};

/// Domain model representing an advisory account.
///
/// The cash balance is signed and only changes through the ledger (trades,
/// cash adjustments and dividend credits).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: i32,
    pub client_id: i32,
    pub advisor_id: i32,
    pub name: String,
    /// Name of the target allocation profile this account is benchmarked against.
    pub profile_name: String,
    /// Whether dividends are reinvested into the paying instrument.
    pub reinvest: bool,
    pub cash_balance: Decimal,
}

/// Input model for opening a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub client_id: i32,
    pub advisor_id: i32,
    pub name: String,
    pub profile_name: String,
    pub reinvest: bool,
}

impl NewAccount {
    /// Validates the new account data.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "name".to_string(),
            )));
        }
        if self.profile_name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "profileName".to_string(),
            )));
        }
        Ok(())
    }
}
