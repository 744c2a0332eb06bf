use serde::{Deserialize, Serialize};

/// Aggregate win/loss statistics for a set of completed trades.
///
/// These four numbers are everything the Kelly calculator consumes. They can
/// be supplied directly by the caller or folded up from a per-trade P/L
/// sequence via [`TradeStats::record`] / [`TradeStats::from_pnls`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeStats {
    /// Count of trades that closed with a positive P/L.
    pub num_wins: usize,
    /// Count of all completed trades.
    pub total_trades: usize,
    /// Sum of profit across winning trades.
    pub total_gain_from_wins: f64,
    /// Sum of absolute loss across losing trades.
    pub total_loss_from_losses: f64,
}

impl TradeStats {
    pub fn new(
        num_wins: usize,
        total_trades: usize,
        total_gain_from_wins: f64,
        total_loss_from_losses: f64,
    ) -> Self {
        Self {
            num_wins,
            total_trades,
            total_gain_from_wins,
            total_loss_from_losses,
        }
    }

    /// Fold one completed trade into the aggregates.
    ///
    /// A strictly positive P/L counts as a win; zero or negative counts as a
    /// loss and contributes its absolute value to the loss aggregate, so a
    /// break-even trade is a losing trade with zero loss.
    pub fn record(&mut self, pnl: f64) {
        self.total_trades += 1;
        if pnl > 0.0 {
            self.num_wins += 1;
            self.total_gain_from_wins += pnl;
        } else {
            self.total_loss_from_losses += pnl.abs();
        }
    }

    /// Aggregate a whole P/L sequence.
    pub fn from_pnls<I>(pnls: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut stats = Self::default();
        for pnl in pnls {
            stats.record(pnl);
        }
        stats
    }

    /// Losing-trade count. Meaningful only while `num_wins <= total_trades`.
    pub fn num_losses(&self) -> usize {
        self.total_trades.saturating_sub(self.num_wins)
    }

    /// Net result across all trades (gains minus losses).
    pub fn net_profit(&self) -> f64 {
        self.total_gain_from_wins - self.total_loss_from_losses
    }

    /// Share of trades that won; 0.0 for an empty sample.
    pub fn win_rate(&self) -> f64 {
        if self.total_trades == 0 {
            0.0
        } else {
            self.num_wins as f64 / self.total_trades as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_classifies_wins_and_losses() {
        let mut stats = TradeStats::default();
        stats.record(200.0);
        stats.record(-150.0);
        stats.record(50.0);

        assert_eq!(stats.total_trades, 3);
        assert_eq!(stats.num_wins, 2);
        assert_eq!(stats.num_losses(), 1);
        assert!((stats.total_gain_from_wins - 250.0).abs() < 1e-9);
        assert!((stats.total_loss_from_losses - 150.0).abs() < 1e-9);
        assert!((stats.net_profit() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn break_even_trade_counts_as_zero_loss() {
        let stats = TradeStats::from_pnls([0.0]);
        assert_eq!(stats.total_trades, 1);
        assert_eq!(stats.num_wins, 0);
        assert_eq!(stats.num_losses(), 1);
        assert_eq!(stats.total_loss_from_losses, 0.0);
    }

    #[test]
    fn from_pnls_matches_manual_aggregation() {
        let pnls = vec![200.0, -100.0, 300.0, -50.0, -50.0];
        let stats = TradeStats::from_pnls(pnls);

        assert_eq!(stats.num_wins, 2);
        assert_eq!(stats.total_trades, 5);
        assert!((stats.total_gain_from_wins - 500.0).abs() < 1e-9);
        assert!((stats.total_loss_from_losses - 200.0).abs() < 1e-9);
        assert!((stats.win_rate() - 0.4).abs() < 1e-9);
    }

    #[test]
    fn win_rate_is_zero_for_empty_sample() {
        let stats = TradeStats::default();
        assert_eq!(stats.win_rate(), 0.0);
        assert_eq!(stats.num_losses(), 0);
    }
}
