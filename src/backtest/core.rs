use chrono::NaiveDate;

use crate::{
    backtest::sma::{crossover_signals, CrossSignal, SmaParams},
    backtest::DailyClose,
    stats::TradeStats,
};

/// One completed round trip produced by the simulator.
#[derive(Clone, Debug)]
pub struct SimulatedTrade {
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub entry_price: f64,
    pub exit_price: f64,
    /// Exit minus entry for one traded unit.
    pub pnl: f64,
    /// True when the position was still open after the last close and was
    /// exited there rather than on a signal.
    pub forced_exit: bool,
}

#[derive(Clone, Debug)]
pub struct BacktestResult {
    pub trades: Vec<SimulatedTrade>,
    pub stats: TradeStats,
}

#[derive(Clone, Copy, Debug)]
struct OpenPosition {
    entry_date: NaiveDate,
    entry_price: f64,
}

/// Deterministically replay a close series through the SMA crossover strategy.
///
/// The caller is responsible for providing closes in date-ascending order. Given the
/// same series and params, the result is fully deterministic. One unit is traded per
/// round trip: a Buy signal enters at that day's close, a Sell signal exits at that
/// day's close, and a position still open after the last close is force-exited there.
pub fn run_backtest_on_closes(closes: &[DailyClose], params: &SmaParams) -> BacktestResult {
    let prices: Vec<f64> = closes.iter().map(|c| c.close).collect();
    let signals = crossover_signals(&prices, params);

    let mut trades = Vec::new();
    let mut open_position: Option<OpenPosition> = None;

    for (i, signal) in signals.iter().enumerate() {
        match signal {
            Some(CrossSignal::Buy) if open_position.is_none() => {
                open_position = Some(OpenPosition {
                    entry_date: closes[i].date,
                    entry_price: closes[i].close,
                });
            }
            Some(CrossSignal::Sell) => {
                if let Some(pos) = open_position.take() {
                    trades.push(SimulatedTrade {
                        entry_date: pos.entry_date,
                        exit_date: closes[i].date,
                        entry_price: pos.entry_price,
                        exit_price: closes[i].close,
                        pnl: closes[i].close - pos.entry_price,
                        forced_exit: false,
                    });
                }
            }
            _ => {}
        }
    }

    // Close out any position left open at the end of the data.
    if let (Some(pos), Some(last)) = (open_position, closes.last()) {
        trades.push(SimulatedTrade {
            entry_date: pos.entry_date,
            exit_date: last.date,
            entry_price: pos.entry_price,
            exit_price: last.close,
            pnl: last.close - pos.entry_price,
            forced_exit: true,
        });
    }

    let stats = TradeStats::from_pnls(trades.iter().map(|t| t.pnl));
    BacktestResult { trades, stats }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn closes(prices: &[f64]) -> Vec<DailyClose> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| DailyClose {
                date: start + Days::new(i as u64),
                close,
            })
            .collect()
    }

    fn params() -> SmaParams {
        SmaParams {
            short_window: 2,
            long_window: 3,
        }
    }

    #[test]
    fn deterministic_results_for_same_input() {
        let series = closes(&[10.0, 10.0, 10.0, 14.0, 18.0, 20.0, 8.0, 8.0, 20.0, 30.0]);

        let r1 = run_backtest_on_closes(&series, &params());
        let r2 = run_backtest_on_closes(&series, &params());

        assert_eq!(r1.trades.len(), r2.trades.len());
        assert_eq!(r1.stats, r2.stats);
    }

    #[test]
    fn records_round_trip_on_cross_down() {
        // Cross up at index 3 (close 13), back down at index 5 (close 10).
        let series = closes(&[10.0, 10.0, 10.0, 13.0, 16.0, 10.0, 4.0, 10.0]);
        let result = run_backtest_on_closes(&series, &params());

        assert_eq!(result.trades.len(), 1);
        let trade = &result.trades[0];
        assert!((trade.entry_price - 13.0).abs() < 1e-9);
        assert!((trade.exit_price - 10.0).abs() < 1e-9);
        assert!((trade.pnl + 3.0).abs() < 1e-9);
        assert!(!trade.forced_exit);

        assert_eq!(result.stats.total_trades, 1);
        assert_eq!(result.stats.num_wins, 0);
        assert!((result.stats.total_loss_from_losses - 3.0).abs() < 1e-9);
    }

    #[test]
    fn forces_exit_when_long_at_end_of_data() {
        // Two round trips: a losing one on a signal, then a winning one that
        // is still open at the last close and force-exited there.
        let series = closes(&[10.0, 10.0, 10.0, 14.0, 18.0, 20.0, 8.0, 8.0, 20.0, 30.0]);
        let result = run_backtest_on_closes(&series, &params());

        assert_eq!(result.trades.len(), 2);

        let first = &result.trades[0];
        assert!((first.pnl + 6.0).abs() < 1e-9);
        assert!(!first.forced_exit);

        let second = &result.trades[1];
        assert!((second.entry_price - 20.0).abs() < 1e-9);
        assert!((second.exit_price - 30.0).abs() < 1e-9);
        assert!((second.pnl - 10.0).abs() < 1e-9);
        assert!(second.forced_exit);
        assert_eq!(second.exit_date, series.last().unwrap().date);

        assert_eq!(result.stats.total_trades, 2);
        assert_eq!(result.stats.num_wins, 1);
        assert!((result.stats.total_gain_from_wins - 10.0).abs() < 1e-9);
        assert!((result.stats.total_loss_from_losses - 6.0).abs() < 1e-9);
    }

    #[test]
    fn no_trades_when_series_too_short() {
        let series = closes(&[10.0, 11.0]);
        let result = run_backtest_on_closes(&series, &params());
        assert!(result.trades.is_empty());
        assert_eq!(result.stats.total_trades, 0);
    }

    #[test]
    fn no_trades_when_never_long() {
        // A steady decline keeps the fast average below the slow one.
        let series = closes(&[10.0, 9.0, 8.0, 7.0, 6.0, 5.0]);
        let result = run_backtest_on_closes(&series, &params());
        assert!(result.trades.is_empty());
        assert_eq!(result.stats.total_trades, 0);
    }
}
