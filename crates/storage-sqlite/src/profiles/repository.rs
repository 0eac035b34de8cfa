use std::collections::HashMap;
use std::sync::Arc;

use advisory_desk_core::constants::CASH_SECTOR;
use advisory_desk_core::errors::{Error, Result};
use advisory_desk_core::profiles::{NewProfile, Profile, ProfileRepositoryTrait};
use diesel::dsl::exists;
use diesel::prelude::*;
use log::info;

use super::model::ProfileTargetDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::instruments::ensure_cash_sector;
use crate::schema::{profile_targets, profiles, sectors};

pub struct ProfileRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ProfileRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }

    /// Stores a new profile. Every named sector must already exist; a missing
    /// cash target is stored as 0%. Profiles cannot be redefined.
    pub async fn define_profile(&self, new_profile: NewProfile) -> Result<Profile> {
        let profile = new_profile.into_profile()?;

        self.writer
            .exec(move |conn| {
                let taken = diesel::select(exists(profiles::table.find(&profile.name)))
                    .get_result::<bool>(conn)
                    .into_core()?;
                if taken {
                    return Err(Error::invalid(format!(
                        "profile '{}' is already defined",
                        profile.name
                    )));
                }

                let cash_id = ensure_cash_sector(conn)?;
                let mut rows = Vec::with_capacity(profile.targets.len());
                for (sector_name, percentage) in &profile.targets {
                    let sector_id = if sector_name.eq_ignore_ascii_case(CASH_SECTOR) {
                        cash_id
                    } else {
                        sectors::table
                            .filter(sectors::name.eq(sector_name))
                            .select(sectors::id)
                            .first::<i32>(conn)
                            .optional()
                            .into_core()?
                            .ok_or_else(|| Error::unknown("sector", sector_name))?
                    };
                    rows.push(ProfileTargetDB {
                        profile_name: profile.name.clone(),
                        sector_id,
                        percentage: *percentage,
                    });
                }

                diesel::insert_into(profiles::table)
                    .values(profiles::name.eq(&profile.name))
                    .execute(conn)
                    .into_core()?;
                diesel::insert_into(profile_targets::table)
                    .values(&rows)
                    .execute(conn)
                    .into_core()?;
                info!(
                    "Defined profile '{}' over {} sector(s)",
                    profile.name,
                    rows.len()
                );
                Ok(profile)
            })
            .await
    }
}

impl ProfileRepositoryTrait for ProfileRepository {
    fn get_target_weights(&self, profile_name: &str) -> Result<HashMap<String, i32>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(profile_targets::table
            .inner_join(sectors::table)
            .filter(profile_targets::profile_name.eq(profile_name))
            .select((sectors::name, profile_targets::percentage))
            .load::<(String, i32)>(&mut conn)
            .into_core()?
            .into_iter()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruments::InstrumentRepository;
    use crate::test_support::setup_db;
    use advisory_desk_core::errors::ValidationError;

    fn new_profile(name: &str, targets: &[(&str, i32)]) -> NewProfile {
        NewProfile {
            name: name.to_string(),
            targets: targets
                .iter()
                .map(|(sector, pct)| (sector.to_string(), *pct))
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_profile_targets_are_stored_with_cash() {
        let db = setup_db();
        let sectors = InstrumentRepository::new(db.pool.clone(), db.writer.clone());
        sectors.define_sector("Technology").await.unwrap();
        sectors.define_sector("Energy").await.unwrap();
        let repo = ProfileRepository::new(db.pool.clone(), db.writer.clone());

        repo.define_profile(new_profile("Growth", &[("Technology", 70), ("Energy", 30)]))
            .await
            .unwrap();

        let weights = repo.get_target_weights("Growth").unwrap();
        assert_eq!(weights.len(), 3);
        assert_eq!(weights["Technology"], 70);
        assert_eq!(weights["Energy"], 30);
        assert_eq!(weights[CASH_SECTOR], 0);
        assert!(repo.get_target_weights("Unknown").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lowercase_cash_key_maps_to_cash_sector() {
        let db = setup_db();
        InstrumentRepository::new(db.pool.clone(), db.writer.clone())
            .define_sector("Technology")
            .await
            .unwrap();
        let repo = ProfileRepository::new(db.pool.clone(), db.writer.clone());

        repo.define_profile(new_profile("Careful", &[("Technology", 40), ("cash", 60)]))
            .await
            .unwrap();

        let weights = repo.get_target_weights("Careful").unwrap();
        assert_eq!(weights[CASH_SECTOR], 60);
    }

    #[tokio::test]
    async fn test_invalid_profiles_leave_nothing_behind() {
        let db = setup_db();
        InstrumentRepository::new(db.pool.clone(), db.writer.clone())
            .define_sector("Technology")
            .await
            .unwrap();
        let repo = ProfileRepository::new(db.pool.clone(), db.writer.clone());

        let err = repo
            .define_profile(new_profile("Odd", &[("Technology", 50), ("Mining", 50)]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::UnknownEntity { kind: "sector", .. })
        ));
        assert!(repo.get_target_weights("Odd").unwrap().is_empty());

        assert!(repo
            .define_profile(new_profile("Short", &[("Technology", 90)]))
            .await
            .is_err());

        repo.define_profile(new_profile("Tech", &[("Technology", 100)]))
            .await
            .unwrap();
        assert!(repo
            .define_profile(new_profile("Tech", &[("Technology", 50), ("Cash", 50)]))
            .await
            .is_err());
        assert_eq!(repo.get_target_weights("Tech").unwrap()["Technology"], 100);
    }
}
