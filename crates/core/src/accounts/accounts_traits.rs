//! Account repository trait.
//!
//! This trait defines the read contract the desk needs for accounts, clients
//! and advisors without any database-specific types, allowing for different
//! storage implementations.

use super::accounts_model::Account;
use crate::errors::Result;

/// Trait defining the contract for Account repository operations.
///
/// Account creation and advisor reassignment belong to the storage layer;
/// the core only reads.
pub trait AccountRepositoryTrait: Send + Sync {
    /// Returns true if a client with this ID exists.
    fn client_exists(&self, client_id: i32) -> Result<bool>;

    /// Returns true if an advisor with this ID exists.
    fn advisor_exists(&self, advisor_id: i32) -> Result<bool>;

    /// Returns true if an account with this ID exists.
    fn account_exists(&self, account_id: i32) -> Result<bool>;

    /// Retrieves an account by its ID.
    fn get_by_id(&self, account_id: i32) -> Result<Account>;

    /// Lists every account, ordered by ID.
    fn list(&self) -> Result<Vec<Account>>;

    /// Lists the accounts managed by an advisor.
    fn list_by_advisor(&self, advisor_id: i32) -> Result<Vec<Account>>;

    /// Lists the accounts owned by a client.
    fn list_by_client(&self, client_id: i32) -> Result<Vec<Account>>;
}
