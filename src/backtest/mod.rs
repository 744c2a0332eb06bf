use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub mod config;
pub mod core;
pub mod runner;
pub mod sma;

pub use self::config::BacktestConfig;
pub use self::core::{run_backtest_on_closes, BacktestResult, SimulatedTrade};
pub use self::sma::{CrossSignal, SmaParams};

/// Single end-of-day close observation for the backtested symbol.
///
/// Matches one row of the `date,close` history CSV.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyClose {
    pub date: NaiveDate,
    pub close: f64,
}
