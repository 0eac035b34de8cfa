use std::collections::HashMap;

use crate::errors::Result;

/// Read access to target allocation profiles.
pub trait ProfileRepositoryTrait: Send + Sync {
    /// Target percent per sector name (cash included) for a profile.
    /// An unknown profile yields an empty map.
    fn get_target_weights(&self, profile_name: &str) -> Result<HashMap<String, i32>>;
}
