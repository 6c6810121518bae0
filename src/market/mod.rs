//! The market: face-up cards players claim sets from.

#[allow(clippy::module_inception)]
pub mod market;

pub use market::{Market, SlotIndex, MARKET_INCREASE, MARKET_MINIMUM};
