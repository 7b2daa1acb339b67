//! Daily price source port trait.

use crate::domain::error::PanelError;
use crate::domain::prices::PriceTable;
use chrono::NaiveDate;

/// Source of daily adjusted closing prices for a list of tickers.
pub trait PriceSource {
    fn fetch_adjusted_close(
        &self,
        tickers: &[String],
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceTable, PanelError>;
}
