use serde::{Deserialize, Serialize};

/// Parameters for the SMA crossover strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmaParams {
    /// Lookback of the fast average, in trading days.
    pub short_window: usize,
    /// Lookback of the slow average, in trading days. Must exceed the short one.
    pub long_window: usize,
}

impl Default for SmaParams {
    fn default() -> Self {
        Self {
            short_window: 50,
            long_window: 200,
        }
    }
}

impl SmaParams {
    /// True when the windows can produce a defined crossover series.
    pub fn windows_valid(&self) -> bool {
        self.short_window >= 1 && self.long_window > self.short_window
    }
}

/// Entry/exit signal emitted when the averages cross.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossSignal {
    /// Fast average moved above the slow one; go long.
    Buy,
    /// Fast average dropped back to or below the slow one; go flat.
    Sell,
}

/// Simple moving average of `closes` over `window` points.
///
/// The output has the same length as the input; positions before index
/// `window - 1` have no full lookback and are `None`.
pub fn sma_series(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut series = vec![None; closes.len()];
    if window == 0 || closes.len() < window {
        return series;
    }

    let mut rolling_sum: f64 = closes[..window].iter().sum();
    series[window - 1] = Some(rolling_sum / window as f64);
    for i in window..closes.len() {
        rolling_sum += closes[i] - closes[i - window];
        series[i] = Some(rolling_sum / window as f64);
    }
    series
}

/// Crossover signals for a close series under the given windows.
///
/// The series is long wherever the short average is strictly above the long
/// one and flat otherwise; a signal marks each transition. The first index
/// where both averages are defined sets the initial position and emits
/// nothing. Invalid windows or a series shorter than the long window yield
/// no signals at all.
pub fn crossover_signals(closes: &[f64], params: &SmaParams) -> Vec<Option<CrossSignal>> {
    let mut signals = vec![None; closes.len()];
    if !params.windows_valid() || closes.len() < params.long_window {
        return signals;
    }

    let short = sma_series(closes, params.short_window);
    let long = sma_series(closes, params.long_window);

    let mut prev_long_position: Option<bool> = None;
    for (i, (fast, slow)) in short.iter().zip(long.iter()).enumerate() {
        let (Some(fast), Some(slow)) = (*fast, *slow) else {
            continue;
        };
        let long_position = fast > slow;
        if let Some(prev) = prev_long_position {
            if long_position && !prev {
                signals[i] = Some(CrossSignal::Buy);
            } else if !long_position && prev {
                signals[i] = Some(CrossSignal::Sell);
            }
        }
        prev_long_position = Some(long_position);
    }
    signals
}
