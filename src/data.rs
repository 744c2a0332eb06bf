use anyhow::{bail, Context};

use crate::backtest::DailyClose;

/// Load a `date,close` CSV (header required) into a date-ascending close series.
///
/// The file is the offline stand-in for a market-data download. Rows must
/// already be sorted by date; duplicates or backwards jumps are rejected
/// rather than silently reordered, as are non-positive or non-finite closes.
pub fn load_daily_closes(path: &str) -> anyhow::Result<Vec<DailyClose>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open close-price CSV at {path}"))?;

    let mut closes: Vec<DailyClose> = Vec::new();
    for (i, row) in reader.deserialize::<DailyClose>().enumerate() {
        let row = row.with_context(|| format!("failed to parse row {} of {path}", i + 1))?;
        if !row.close.is_finite() || row.close <= 0.0 {
            bail!(
                "row {} of {path}: close must be a positive number, got {}",
                i + 1,
                row.close
            );
        }
        if let Some(prev) = closes.last() {
            if row.date <= prev.date {
                bail!(
                    "row {} of {path}: dates must be strictly increasing ({} follows {})",
                    i + 1,
                    row.date,
                    prev.date
                );
            }
        }
        closes.push(row);
    }
    Ok(closes)
}
