//! Trading module - buys, sells and cash movements with ACB accounting.

mod trade_calculator;
mod trading_model;
mod trading_service;
mod trading_traits;

pub use trade_calculator::{apply_buy, apply_sell, ensure_funds, trade_value};
pub use trading_model::{validate_order, TradeReceipt, TradeSide};
pub use trading_service::TradingService;
pub use trading_traits::{
    LedgerJob, LedgerRepositoryTrait, LedgerTransaction, TradingServiceTrait,
};
