use anyhow::Context;
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    backtest::config::BacktestConfig,
    backtest::core::{run_backtest_on_closes, BacktestResult},
    data::load_daily_closes,
    kelly::{kelly_fraction, KellyEstimate},
};

/// Execute a backtest by loading the configured close series from CSV and replaying it
/// through the SMA crossover simulator, then size the result with the Kelly criterion.
///
/// Returns `None` when the strategy produced no trades over the period.
pub fn run_backtest(cfg: &BacktestConfig) -> anyhow::Result<Option<KellyEstimate>> {
    let closes = load_daily_closes(&cfg.csv_path)?;
    info!(
        target: "backtest",
        symbol = %cfg.symbol,
        rows = closes.len(),
        short_window = cfg.sma.short_window,
        long_window = cfg.sma.long_window,
        "close series loaded"
    );

    let result = run_backtest_on_closes(&closes, &cfg.sma);

    for trade in result.trades.iter().filter(|t| t.forced_exit) {
        warn!(
            target: "backtest",
            entry_date = %trade.entry_date,
            exit_date = %trade.exit_date,
            pnl = trade.pnl,
            "position open at end of data; exited at last close"
        );
    }

    if result.stats.total_trades == 0 {
        warn!(
            target: "backtest",
            symbol = %cfg.symbol,
            "no trades were executed for this strategy and period"
        );
        log_summary(&cfg.symbol, &result, None);
        return Ok(None);
    }

    let estimate = kelly_fraction(result.stats)
        .context("backtest produced statistics the Kelly calculator rejects")?;

    log_summary(&cfg.symbol, &result, Some(&estimate));

    Ok(Some(estimate))
}

#[derive(Serialize)]
struct BacktestSummary<'a> {
    event: &'a str,
    finished_at: String,
    symbol: &'a str,
    total_trades: usize,
    winning_trades: usize,
    losing_trades: usize,
    total_gain_from_wins: f64,
    total_loss_from_losses: f64,
    net_profit: f64,
    win_rate: f64,
    kelly_fraction: Option<f64>,
    kelly_pct: Option<f64>,
    warnings: Vec<&'a str>,
}

fn log_summary(symbol: &str, result: &BacktestResult, estimate: Option<&KellyEstimate>) {
    let summary = BacktestSummary {
        event: "backtest_summary",
        finished_at: Utc::now().to_rfc3339(),
        symbol,
        total_trades: result.stats.total_trades,
        winning_trades: result.stats.num_wins,
        losing_trades: result.stats.num_losses(),
        total_gain_from_wins: result.stats.total_gain_from_wins,
        total_loss_from_losses: result.stats.total_loss_from_losses,
        net_profit: result.stats.net_profit(),
        win_rate: result.stats.win_rate(),
        kelly_fraction: estimate.map(|e| e.fraction),
        kelly_pct: estimate.map(|e| e.fraction * 100.0),
        warnings: estimate.map(|e| e.warning_messages()).unwrap_or_default(),
    };

    let payload =
        serde_json::to_string(&summary).unwrap_or_else(|_| "{\"event\":\"backtest_summary_error\"}".to_string());
    info!(target: "backtest", "{payload}");
}
