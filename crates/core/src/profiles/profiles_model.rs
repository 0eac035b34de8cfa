//! Target allocation profiles.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::constants::{CASH_SECTOR, PROFILE_TOTAL_PERCENT};
use crate::{errors::ValidationError, Error, Result};

/// A named target allocation: sector name → integer percent, cash included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub targets: HashMap<String, i32>,
}

impl Profile {
    /// Target percent for a sector; sectors the profile omits target 0.
    pub fn target_for(&self, sector: &str) -> i32 {
        self.targets.get(sector).copied().unwrap_or(0)
    }
}

/// Input model for defining a profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProfile {
    pub name: String,
    pub targets: HashMap<String, i32>,
}

impl NewProfile {
    /// Validates the profile: a name, at least one target, no negative
    /// percentages and a total of exactly 100.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "name".to_string(),
            )));
        }
        if self.targets.is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "targets".to_string(),
            )));
        }
        if let Some((sector, pct)) = self.targets.iter().find(|(_, pct)| **pct < 0) {
            return Err(Error::Validation(ValidationError::OutOfRange {
                field: format!("targets.{sector}"),
                value: pct.to_string(),
            }));
        }
        let total = self
            .targets
            .values()
            .try_fold(0i32, |sum, pct| sum.checked_add(*pct));
        if total != Some(PROFILE_TOTAL_PERCENT) {
            let shown = total.map_or_else(|| "more than i32::MAX".to_string(), |t| t.to_string());
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "profile '{}' targets sum to {}, expected {}",
                self.name, shown, PROFILE_TOTAL_PERCENT
            ))));
        }
        Ok(())
    }

    /// Validates and returns the profile with an explicit cash target
    /// (0 when the caller omitted it).
    pub fn into_profile(self) -> Result<Profile> {
        self.validate()?;
        let mut targets = self.targets;
        let has_cash = targets
            .keys()
            .any(|sector| sector.eq_ignore_ascii_case(CASH_SECTOR));
        if !has_cash {
            targets.insert(CASH_SECTOR.to_string(), 0);
        }
        Ok(Profile {
            name: self.name,
            targets,
        })
    }
}
