//! Profiles module - named target allocations.

mod profiles_model;
mod profiles_traits;

pub use profiles_model::{NewProfile, Profile};
pub use profiles_traits::ProfileRepositoryTrait;
