//! Panel cleaning pipeline.
//!
//! Takes a raw panel of (date, permno) observations and produces a cleaned
//! panel: typed fields, vendor sign convention on price removed, market cap
//! derived, invalid and duplicate rows dropped, canonical ordering. One
//! pass, no mutation of the input, no errors: a cell that will not parse is
//! missing data, and missing data means the row goes.

use crate::domain::record::{CleanPanel, CleanRecord, RawPanel};
use chrono::NaiveDate;
use std::collections::HashSet;

/// Default penny-stock cutoff, in dollars.
pub const DEFAULT_MIN_PRICE: f64 = 5.0;

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Numeric coercion. Anything that is not a finite number is missing,
/// including delisting codes like "C" or "B" and empty cells.
fn parse_f64(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Security ids are opaque; an empty id means the row has no panel key.
fn parse_permno(s: &str) -> Option<String> {
    let t = s.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}

/// Clean a raw panel.
///
/// Steps, in order:
/// 1. parse `date` (`%Y-%m-%d`) and trim `permno`; rows without a valid
///    panel key are dropped
/// 2. coerce `prc`, `shrout`, `ret` to numeric; failures become missing
/// 3. `prc` takes its absolute value (negative price marks a bid/ask
///    midpoint, the sign carries no economic meaning)
/// 4. derive `mkt_cap = prc * shrout`
/// 5. drop rows with `prc <= 0`, `shrout <= 0`, missing `mkt_cap`, or
///    missing `ret`
/// 6. deduplicate on (date, permno), first occurrence wins
/// 7. sort ascending by (permno, date)
pub fn clean_panel(raw: &RawPanel) -> CleanPanel {
    let mut records: Vec<CleanRecord> = Vec::with_capacity(raw.len());

    for r in &raw.records {
        let Some(date) = parse_date(&r.date) else {
            continue;
        };
        let Some(permno) = parse_permno(&r.permno) else {
            continue;
        };
        let (Some(prc), Some(shrout)) = (parse_f64(&r.prc), parse_f64(&r.shrout)) else {
            continue;
        };

        let prc = prc.abs();
        let mkt_cap = prc * shrout;
        if prc <= 0.0 || shrout <= 0.0 || !mkt_cap.is_finite() {
            continue;
        }

        let Some(ret) = parse_f64(&r.ret) else {
            continue;
        };

        records.push(CleanRecord {
            date,
            permno,
            ret,
            prc,
            shrout,
            mkt_cap,
            extra: r.extra.clone(),
        });
    }

    let mut seen: HashSet<(NaiveDate, String)> = HashSet::with_capacity(records.len());
    records.retain(|r| seen.insert((r.date, r.permno.clone())));

    records.sort_by(|a, b| (a.permno.as_str(), a.date).cmp(&(b.permno.as_str(), b.date)));

    CleanPanel {
        extra_columns: raw.extra_columns.clone(),
        records,
    }
}

/// Drop records at or below the penny-stock cutoff. Applied after cleaning,
/// so ordering and uniqueness are preserved.
pub fn filter_min_price(panel: CleanPanel, min_price: f64) -> CleanPanel {
    let CleanPanel {
        extra_columns,
        mut records,
    } = panel;
    records.retain(|r| r.prc > min_price);
    CleanPanel {
        extra_columns,
        records,
    }
}
