use super::holdings_model::Position;
use crate::errors::Result;

/// Read access to account positions.
///
/// Writes go through the ledger (`trading::LedgerRepositoryTrait`) so they
/// always share a transaction with the matching cash movement.
pub trait HoldingRepositoryTrait: Send + Sync {
    /// Position for one account and symbol, if a row exists.
    fn get_position(&self, account_id: i32, symbol: &str) -> Result<Option<Position>>;

    /// All positions of an account.
    fn list_by_account(&self, account_id: i32) -> Result<Vec<Position>>;

    /// Every position of every account.
    fn list_all(&self) -> Result<Vec<Position>>;

    /// Positions in `symbol` across all accounts.
    fn list_holders(&self, symbol: &str) -> Result<Vec<Position>>;
}
