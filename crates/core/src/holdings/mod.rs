//! Holdings module - account positions with average cost basis.

mod holdings_model;
mod holdings_traits;

pub use holdings_model::Position;
pub use holdings_traits::HoldingRepositoryTrait;
