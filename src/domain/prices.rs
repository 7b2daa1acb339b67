//! Wide daily price table.
//!
//! One row per date, one column per ticker, cells optional because
//! tickers list on different dates. This is the shape the momentum
//! backtest consumes.

use chrono::NaiveDate;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTable {
    pub dates: Vec<NaiveDate>,
    pub tickers: Vec<String>,
    /// `closes[row][col]` is the adjusted close for `dates[row]`,
    /// `tickers[col]`.
    pub closes: Vec<Vec<Option<f64>>>,
}

impl PriceTable {
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() || self.tickers.is_empty()
    }
}

/// Remove tickers whose entire column is missing. Tickers that returned no
/// prices at all (delisted, renamed, bad symbol) would otherwise pollute
/// the output with empty columns.
pub fn drop_empty_columns(table: PriceTable) -> PriceTable {
    let keep: Vec<usize> = (0..table.tickers.len())
        .filter(|&col| table.closes.iter().any(|row| row[col].is_some()))
        .collect();

    if keep.len() == table.tickers.len() {
        return table;
    }

    let tickers = keep.iter().map(|&c| table.tickers[c].clone()).collect();
    let closes = table
        .closes
        .iter()
        .map(|row| keep.iter().map(|&c| row[c]).collect())
        .collect();

    PriceTable {
        dates: table.dates,
        tickers,
        closes,
    }
}
