//! Ledger and trading contracts.

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::trading_model::TradeReceipt;
use crate::errors::Result;
use crate::holdings::Position;

/// Reads and writes available inside one atomic ledger transaction.
///
/// Implementations must make every write visible to later reads in the same
/// transaction, and discard all of them when the job returns an error.
pub trait LedgerTransaction {
    /// Current cash balance of the account.
    fn cash_balance(&mut self, account_id: i32) -> Result<Decimal>;

    /// Current position, if a row exists.
    fn position(&mut self, account_id: i32, symbol: &str) -> Result<Option<Position>>;

    /// Inserts or replaces the position row.
    fn save_position(&mut self, position: &Position) -> Result<()>;

    /// Adds `delta` to the cash balance and returns the new balance.
    fn adjust_cash(&mut self, account_id: i32, delta: Decimal) -> Result<Decimal>;
}

/// Unit of work executed inside a ledger transaction.
pub type LedgerJob<T> = Box<dyn FnOnce(&mut dyn LedgerTransaction) -> Result<T> + Send + 'static>;

/// Serialized, all-or-nothing access to cash balances and positions.
#[async_trait]
pub trait LedgerRepositoryTrait: Send + Sync {
    /// Runs `job` atomically. Any error rolls back every write the job made.
    async fn transact(&self, job: LedgerJob<TradeReceipt>) -> Result<TradeReceipt>;
}

/// Trade execution with average-cost-basis accounting.
#[async_trait]
pub trait TradingServiceTrait: Send + Sync {
    /// Buys `shares` of `symbol` at `price`, debiting `shares × price` from cash.
    async fn buy(
        &self,
        account_id: i32,
        symbol: &str,
        shares: Decimal,
        price: Decimal,
    ) -> Result<TradeReceipt>;

    /// Sells `shares` of `symbol` at `price`, crediting the proceeds to cash.
    async fn sell(
        &self,
        account_id: i32,
        symbol: &str,
        shares: Decimal,
        price: Decimal,
    ) -> Result<TradeReceipt>;

    /// Deposits (positive) or withdraws (negative) cash.
    async fn adjust_cash(&self, account_id: i32, amount: Decimal) -> Result<TradeReceipt>;

    /// Credits a dividend of `amount` and, when `shares` is positive, buys
    /// that many shares of `symbol` at `price` from it, in one ledger
    /// transaction.
    ///
    /// A buy that is rejected leaves the dividend credited as cash and the
    /// receipt has side `Cash`. A storage failure credits nothing.
    async fn credit_dividend(
        &self,
        account_id: i32,
        symbol: &str,
        amount: Decimal,
        shares: Decimal,
        price: Decimal,
    ) -> Result<TradeReceipt>;

    /// Signed trade at the instrument's current price.
    ///
    /// The cash pseudo-symbol adjusts the cash balance directly; otherwise a
    /// positive quantity buys and a negative quantity sells.
    async fn trade_shares(
        &self,
        account_id: i32,
        symbol: &str,
        signed_shares: Decimal,
    ) -> Result<TradeReceipt>;
}
