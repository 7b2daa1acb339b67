//! Monthly panel source port trait.

use crate::domain::error::PanelError;
use crate::domain::record::RawPanel;
use chrono::NaiveDate;

/// Source of raw monthly (date, permno) security records.
pub trait PanelSource {
    /// Fetch all records dated on or after `start_date`. Upstream failures
    /// propagate; there is no retry.
    fn fetch_monthly(&self, start_date: NaiveDate) -> Result<RawPanel, PanelError>;
}
