//! Instruments module - stocks, sectors and prices.

mod instruments_model;
mod instruments_traits;

pub use instruments_model::{validate_price, Instrument, NewInstrument, Sector};
pub use instruments_traits::InstrumentRepositoryTrait;
