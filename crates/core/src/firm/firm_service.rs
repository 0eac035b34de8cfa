use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use log::{error, warn};
use rust_decimal::Decimal;

use crate::accounts::AccountRepositoryTrait;
use crate::clustering::{ClusteringService, ClusteringServiceTrait};
use crate::dividends::{DividendService, DividendServiceTrait, FractionalCarryRepositoryTrait};
use crate::errors::{Error, Result};
use crate::holdings::HoldingRepositoryTrait;
use crate::instruments::InstrumentRepositoryTrait;
use crate::portfolio::{
    AllocationService, AllocationServiceTrait, ValuationService, ValuationServiceTrait,
};
use crate::profiles::ProfileRepositoryTrait;
use crate::recommendations::{RecommendationService, RecommendationServiceTrait};
use crate::trading::{LedgerRepositoryTrait, TradeReceipt, TradingService, TradingServiceTrait};

/// Caller-facing operations of the desk.
///
/// Trades, dividends and the two valuation reads return errors. The analytic
/// reads log failures and answer with an empty collection instead.
#[async_trait]
pub trait FirmServiceTrait: Send + Sync {
    async fn buy(
        &self,
        account_id: i32,
        symbol: &str,
        shares: Decimal,
        price: Decimal,
    ) -> Result<TradeReceipt>;

    async fn sell(
        &self,
        account_id: i32,
        symbol: &str,
        shares: Decimal,
        price: Decimal,
    ) -> Result<TradeReceipt>;

    async fn trade_shares(
        &self,
        account_id: i32,
        symbol: &str,
        signed_shares: Decimal,
    ) -> Result<TradeReceipt>;

    /// Whole shares the firm must settle for the run's fractional shortfall.
    async fn disburse_dividend(&self, symbol: &str, per_share: Decimal) -> Result<u32>;

    fn account_value(&self, account_id: i32) -> Result<Decimal>;

    fn advisor_portfolio_value(&self, advisor_id: i32) -> Result<Decimal>;

    fn investor_profit(&self, client_id: i32) -> HashMap<i32, Decimal>;

    fn sector_weights(&self, account_id: i32) -> HashMap<String, i32>;

    fn divergent_accounts(&self, tolerance: i32) -> HashSet<i32>;

    fn stock_recommendations(
        &self,
        account_id: i32,
        max_recommendations: usize,
        num_comparators: usize,
    ) -> HashMap<String, bool>;

    fn advisor_groups(&self, tolerance: f64, max_groups: usize) -> BTreeSet<BTreeSet<i32>>;
}

/// Repository handles a `FirmService` is assembled from.
#[derive(Clone)]
pub struct FirmRepositories {
    pub accounts: Arc<dyn AccountRepositoryTrait>,
    pub holdings: Arc<dyn HoldingRepositoryTrait>,
    pub instruments: Arc<dyn InstrumentRepositoryTrait>,
    pub profiles: Arc<dyn ProfileRepositoryTrait>,
    pub ledger: Arc<dyn LedgerRepositoryTrait>,
    pub carry: Arc<dyn FractionalCarryRepositoryTrait>,
}

pub struct FirmService {
    trading: Arc<dyn TradingServiceTrait>,
    dividends: Arc<dyn DividendServiceTrait>,
    valuation: Arc<dyn ValuationServiceTrait>,
    allocation: Arc<dyn AllocationServiceTrait>,
    clustering: Arc<dyn ClusteringServiceTrait>,
    recommendations: Arc<dyn RecommendationServiceTrait>,
}

impl FirmService {
    pub fn new(
        trading: Arc<dyn TradingServiceTrait>,
        dividends: Arc<dyn DividendServiceTrait>,
        valuation: Arc<dyn ValuationServiceTrait>,
        allocation: Arc<dyn AllocationServiceTrait>,
        clustering: Arc<dyn ClusteringServiceTrait>,
        recommendations: Arc<dyn RecommendationServiceTrait>,
    ) -> Self {
        Self {
            trading,
            dividends,
            valuation,
            allocation,
            clustering,
            recommendations,
        }
    }

    /// Wires every service over one set of repositories. `cluster_seed` fixes
    /// the clustering generator.
    pub fn from_repositories(repos: FirmRepositories, cluster_seed: Option<u64>) -> Self {
        let trading: Arc<dyn TradingServiceTrait> = Arc::new(TradingService::new(
            repos.ledger.clone(),
            repos.accounts.clone(),
            repos.instruments.clone(),
        ));
        let dividends = Arc::new(DividendService::new(
            trading.clone(),
            repos.accounts.clone(),
            repos.holdings.clone(),
            repos.instruments.clone(),
            repos.carry.clone(),
        ));
        let valuation = Arc::new(ValuationService::new(
            repos.accounts.clone(),
            repos.holdings.clone(),
            repos.instruments.clone(),
        ));
        let allocation = Arc::new(AllocationService::new(
            repos.accounts.clone(),
            repos.holdings.clone(),
            repos.instruments.clone(),
            repos.profiles.clone(),
        ));
        let mut clustering =
            ClusteringService::new(repos.holdings.clone(), repos.instruments.clone());
        if let Some(seed) = cluster_seed {
            clustering = clustering.with_seed(seed);
        }
        let recommendations = Arc::new(RecommendationService::new(
            repos.accounts,
            repos.holdings,
            repos.instruments,
        ));

        Self::new(
            trading,
            dividends,
            valuation,
            allocation,
            Arc::new(clustering),
            recommendations,
        )
    }

    fn or_empty<T: Default>(operation: &str, result: Result<T>) -> T {
        match result {
            Ok(value) => value,
            Err(e) => {
                log_failure(operation, &e);
                T::default()
            }
        }
    }
}

fn log_failure(operation: &str, e: &Error) {
    if e.is_storage() {
        error!("{} failed: {}", operation, e);
    } else {
        warn!("{} failed: {}", operation, e);
    }
}

#[async_trait]
impl FirmServiceTrait for FirmService {
    async fn buy(
        &self,
        account_id: i32,
        symbol: &str,
        shares: Decimal,
        price: Decimal,
    ) -> Result<TradeReceipt> {
        self.trading.buy(account_id, symbol, shares, price).await
    }

    async fn sell(
        &self,
        account_id: i32,
        symbol: &str,
        shares: Decimal,
        price: Decimal,
    ) -> Result<TradeReceipt> {
        self.trading.sell(account_id, symbol, shares, price).await
    }

    async fn trade_shares(
        &self,
        account_id: i32,
        symbol: &str,
        signed_shares: Decimal,
    ) -> Result<TradeReceipt> {
        self.trading
            .trade_shares(account_id, symbol, signed_shares)
            .await
    }

    async fn disburse_dividend(&self, symbol: &str, per_share: Decimal) -> Result<u32> {
        match self.dividends.distribute(symbol, per_share).await {
            Ok(distribution) => Ok(distribution.settlement.whole_shares),
            Err(e) => {
                log_failure("Dividend disbursement", &e);
                Err(e)
            }
        }
    }

    fn account_value(&self, account_id: i32) -> Result<Decimal> {
        self.valuation.account_value(account_id)
    }

    fn advisor_portfolio_value(&self, advisor_id: i32) -> Result<Decimal> {
        self.valuation.advisor_portfolio_value(advisor_id)
    }

    fn investor_profit(&self, client_id: i32) -> HashMap<i32, Decimal> {
        Self::or_empty("Investor profit", self.valuation.investor_profit(client_id))
    }

    fn sector_weights(&self, account_id: i32) -> HashMap<String, i32> {
        Self::or_empty("Sector weights", self.allocation.sector_weights(account_id))
    }

    fn divergent_accounts(&self, tolerance: i32) -> HashSet<i32> {
        Self::or_empty(
            "Divergent accounts",
            self.allocation.divergent_accounts(tolerance),
        )
    }

    fn stock_recommendations(
        &self,
        account_id: i32,
        max_recommendations: usize,
        num_comparators: usize,
    ) -> HashMap<String, bool> {
        Self::or_empty(
            "Stock recommendations",
            self.recommendations.stock_recommendations(
                account_id,
                max_recommendations,
                num_comparators,
            ),
        )
    }

    fn advisor_groups(&self, tolerance: f64, max_groups: usize) -> BTreeSet<BTreeSet<i32>> {
        Self::or_empty(
            "Advisor groups",
            self.clustering.advisor_groups(tolerance, max_groups),
        )
    }
}
