pub mod backtest;
pub mod data;
pub mod kelly;
pub mod stats;

pub use crate::kelly::{kelly_fraction, InvalidInput, KellyEstimate, KellyResult, KellyWarning};
pub use crate::stats::TradeStats;
