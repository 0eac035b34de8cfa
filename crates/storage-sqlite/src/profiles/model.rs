//! Database model for profile targets.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Target percentage of one sector within a profile.
#[derive(
    Queryable, Insertable, Selectable, PartialEq, Eq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::profile_targets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ProfileTargetDB {
    pub profile_name: String,
    pub sector_id: i32,
    pub percentage: i32,
}
