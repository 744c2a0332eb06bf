use std::fs;

use anyhow::{bail, Context};
use serde::Deserialize;

use crate::backtest::sma::SmaParams;

/// Top-level backtest configuration loaded from TOML.
#[derive(Clone, Debug, Deserialize)]
pub struct BacktestConfig {
    /// Label used in logs and summaries; nothing is fetched by it.
    pub symbol: String,
    /// Path to the `date,close` CSV holding the historical series.
    pub csv_path: String,
    /// Crossover windows; defaults to the conventional 50/200 days.
    #[serde(default)]
    pub sma: SmaParams,
}

impl BacktestConfig {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read backtest config file at {path}"))?;
        let cfg: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to deserialize backtest TOML at {path}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if !self.sma.windows_valid() {
            bail!(
                "invalid SMA windows in backtest config: require 1 <= short_window < long_window, got {}/{}",
                self.sma.short_window,
                self.sma.long_window
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_backtest_config_toml() {
        let toml = r#"
            symbol = "SPY"
            csv_path = "data/spy_closes.csv"

            [sma]
            short_window = 50
            long_window = 200
        "#;

        let cfg: BacktestConfig = toml::from_str(toml).expect("failed to parse backtest config");
        assert_eq!(cfg.symbol, "SPY");
        assert_eq!(cfg.csv_path, "data/spy_closes.csv");
        assert_eq!(cfg.sma.short_window, 50);
        assert_eq!(cfg.sma.long_window, 200);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn missing_sma_section_falls_back_to_defaults() {
        let toml = r#"
            symbol = "SPY"
            csv_path = "data/spy_closes.csv"
        "#;

        let cfg: BacktestConfig = toml::from_str(toml).expect("failed to parse backtest config");
        assert_eq!(cfg.sma, SmaParams::default());
    }

    #[test]
    fn partial_sma_section_fills_missing_window() {
        let toml = r#"
            symbol = "SPY"
            csv_path = "data/spy_closes.csv"

            [sma]
            short_window = 20
        "#;

        let cfg: BacktestConfig = toml::from_str(toml).expect("failed to parse backtest config");
        assert_eq!(cfg.sma.short_window, 20);
        assert_eq!(cfg.sma.long_window, 200);
    }

    #[test]
    fn inverted_windows_are_rejected() {
        let toml = r#"
            symbol = "SPY"
            csv_path = "data/spy_closes.csv"

            [sma]
            short_window = 200
            long_window = 50
        "#;

        let cfg: BacktestConfig = toml::from_str(toml).expect("failed to parse backtest config");
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("invalid SMA windows"));
    }
}
