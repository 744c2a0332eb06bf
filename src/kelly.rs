//! Kelly criterion sizing from aggregate win/loss statistics.
//!
//! For a strategy with win rate `W` and win/loss ratio `R` (average win over
//! average loss), the Kelly fraction is
//!
//! ```text
//! f* = W - (1 - W) / R
//! ```
//!
//! the share of capital to risk per trade that maximizes long-run geometric
//! growth. A negative fraction means the historical edge is negative and the
//! strategy should not be traded at this size.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::stats::TradeStats;

/// Reasons a statistics sample is rejected before any ratio is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidInput {
    #[error("must have at least one trade")]
    NoTrades,
    #[error("win count out of range")]
    WinCountOutOfRange,
    #[error("aggregates must be non-negative")]
    NegativeAggregate,
    #[error("aggregates must be finite")]
    NonFiniteAggregate,
    #[error("losing trades present but total loss is zero")]
    ZeroLossWithLosses,
    #[error("winning trades present but total gain is zero")]
    ZeroGainWithWins,
}

pub type KellyResult<T> = Result<T, InvalidInput>;

/// Advisory conditions attached to an estimate computed from a degenerate
/// (but accepted) sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KellyWarning {
    /// Every trade in the sample won, so no loss average exists.
    AllWins,
    /// Every trade in the sample lost, so no win average exists.
    AllLosses,
}

impl KellyWarning {
    pub fn message(&self) -> &'static str {
        match self {
            KellyWarning::AllWins => {
                "all trades are wins; loss ratio undefined, returning win rate as fraction"
            }
            KellyWarning::AllLosses => "all trades are losses; returning zero allocation",
        }
    }
}

impl fmt::Display for KellyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Kelly fraction for a sample, plus any warnings raised while computing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KellyEstimate {
    pub fraction: f64,
    pub warnings: Vec<KellyWarning>,
}

impl KellyEstimate {
    pub fn warning_messages(&self) -> Vec<&'static str> {
        self.warnings.iter().map(KellyWarning::message).collect()
    }
}

/// Compute the Kelly fraction for a set of aggregate trade statistics.
///
/// Returns [`InvalidInput`] for samples the formula cannot be applied to:
/// empty samples, win counts exceeding the trade count, negative or
/// non-finite aggregates, and zero-sum aggregates that would make an average
/// degenerate. One-sided samples are accepted with a warning: all wins
/// yields the win rate itself as the fraction, all losses yields `-1.0`.
///
/// The result is a pure function of the input; equal statistics always
/// produce equal estimates.
///
/// ```
/// use kelly_backtest::{kelly_fraction, TradeStats};
///
/// let est = kelly_fraction(TradeStats::new(60, 100, 12_000.0, 8_000.0)).unwrap();
/// assert!((est.fraction - 0.2).abs() < 1e-9);
/// assert!(est.warnings.is_empty());
/// ```
pub fn kelly_fraction(stats: TradeStats) -> KellyResult<KellyEstimate> {
    validate(&stats)?;

    let win_rate = stats.num_wins as f64 / stats.total_trades as f64;
    let num_losses = stats.total_trades - stats.num_wins;

    // One-sided samples leave one of the averages undefined; substitute a
    // policy value instead of dividing by zero.
    if num_losses == 0 {
        return Ok(KellyEstimate {
            fraction: win_rate,
            warnings: vec![KellyWarning::AllWins],
        });
    }
    if stats.num_wins == 0 {
        return Ok(KellyEstimate {
            fraction: -1.0,
            warnings: vec![KellyWarning::AllLosses],
        });
    }

    // Mixed sample: both averages exist, but a zero total gain would make the
    // win/loss ratio zero and the formula meaningless.
    if stats.total_gain_from_wins == 0.0 {
        return Err(InvalidInput::ZeroGainWithWins);
    }

    let avg_win = stats.total_gain_from_wins / stats.num_wins as f64;
    let avg_loss = stats.total_loss_from_losses / num_losses as f64;
    let win_loss_ratio = avg_win / avg_loss;

    let fraction = win_rate - (1.0 - win_rate) / win_loss_ratio;
    Ok(KellyEstimate {
        fraction,
        warnings: Vec::new(),
    })
}

fn validate(stats: &TradeStats) -> KellyResult<()> {
    if stats.total_trades == 0 {
        return Err(InvalidInput::NoTrades);
    }
    if stats.num_wins > stats.total_trades {
        return Err(InvalidInput::WinCountOutOfRange);
    }
    if stats.total_gain_from_wins < 0.0 || stats.total_loss_from_losses < 0.0 {
        return Err(InvalidInput::NegativeAggregate);
    }
    if !stats.total_gain_from_wins.is_finite() || !stats.total_loss_from_losses.is_finite() {
        return Err(InvalidInput::NonFiniteAggregate);
    }
    let num_losses = stats.total_trades - stats.num_wins;
    if num_losses > 0 && stats.total_loss_from_losses == 0.0 {
        return Err(InvalidInput::ZeroLossWithLosses);
    }
    Ok(())
}
