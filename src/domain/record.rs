//! Panel record representations.
//!
//! A panel observation is one security on one date. Records come in raw
//! (every key field an unparsed string, exactly as the upstream delivered
//! it) and cleaned (fully typed, with derived market cap). Passthrough
//! columns such as company name or exchange code travel alongside the key
//! fields untouched, aligned positionally with `extra_columns`.

use chrono::NaiveDate;

/// Column names every raw panel input must provide.
pub const REQUIRED_COLUMNS: [&str; 5] = ["date", "permno", "ret", "prc", "shrout"];

/// One raw observation. Any field may be malformed or empty.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub date: String,
    pub permno: String,
    pub ret: String,
    pub prc: String,
    pub shrout: String,
    /// Passthrough cells, in `RawPanel::extra_columns` order.
    pub extra: Vec<String>,
}

/// A raw panel: records plus the names of any passthrough columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPanel {
    pub extra_columns: Vec<String>,
    pub records: Vec<RawRecord>,
}

impl RawPanel {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// One cleaned observation. All invariants hold: `prc > 0`,
/// `shrout > 0`, `mkt_cap = prc * shrout`, `ret` numeric.
///
/// `permno` stays an opaque string: CRSP ids are numeric but other
/// sources use tickers, and the cleaner only needs a panel key.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanRecord {
    pub date: NaiveDate,
    pub permno: String,
    pub ret: f64,
    pub prc: f64,
    pub shrout: f64,
    pub mkt_cap: f64,
    pub extra: Vec<String>,
}

/// A cleaned panel: unique on (date, permno), sorted by (permno, date).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanPanel {
    pub extra_columns: Vec<String>,
    pub records: Vec<CleanRecord>,
}

impl CleanPanel {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First and last observation dates, if any records exist.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.records.iter().map(|r| r.date).min()?;
        let max = self.records.iter().map(|r| r.date).max()?;
        Some((min, max))
    }
}
