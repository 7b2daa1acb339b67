#![allow(dead_code)]

use chrono::NaiveDate;
use panelfetch::domain::error::PanelError;
use panelfetch::domain::prices::PriceTable;
use panelfetch::domain::record::{RawPanel, RawRecord};
use panelfetch::ports::panel_port::PanelSource;
use panelfetch::ports::price_port::PriceSource;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn raw_record(date: &str, permno: &str, ret: &str, prc: &str, shrout: &str) -> RawRecord {
    RawRecord {
        date: date.into(),
        permno: permno.into(),
        ret: ret.into(),
        prc: prc.into(),
        shrout: shrout.into(),
        extra: vec![],
    }
}

/// Panel source backed by an in-memory table, or failing with a canned
/// error to exercise the fail-fast path.
pub struct MockPanelSource {
    pub panel: RawPanel,
    pub error: Option<String>,
}

impl MockPanelSource {
    pub fn with_records(records: Vec<RawRecord>) -> Self {
        Self {
            panel: RawPanel {
                extra_columns: vec![],
                records,
            },
            error: None,
        }
    }

    pub fn with_error(reason: &str) -> Self {
        Self {
            panel: RawPanel::default(),
            error: Some(reason.to_string()),
        }
    }
}

impl PanelSource for MockPanelSource {
    fn fetch_monthly(&self, start_date: NaiveDate) -> Result<RawPanel, PanelError> {
        if let Some(reason) = &self.error {
            return Err(PanelError::DatabaseQuery {
                reason: reason.clone(),
            });
        }
        // Date filtering is the upstream query's job; mimic it here so
        // pipeline tests see realistic behavior.
        let records = self
            .panel
            .records
            .iter()
            .filter(|r| {
                NaiveDate::parse_from_str(&r.date, "%Y-%m-%d")
                    .map(|d| d >= start_date)
                    .unwrap_or(true)
            })
            .cloned()
            .collect();
        Ok(RawPanel {
            extra_columns: self.panel.extra_columns.clone(),
            records,
        })
    }
}

/// Price source returning a fixed table.
pub struct MockPriceSource {
    pub table: PriceTable,
    pub error: Option<String>,
}

impl MockPriceSource {
    pub fn with_table(table: PriceTable) -> Self {
        Self { table, error: None }
    }

    pub fn with_error(reason: &str) -> Self {
        Self {
            table: PriceTable::default(),
            error: Some(reason.to_string()),
        }
    }
}

impl PriceSource for MockPriceSource {
    fn fetch_adjusted_close(
        &self,
        _tickers: &[String],
        _start_date: NaiveDate,
        _end_date: NaiveDate,
    ) -> Result<PriceTable, PanelError> {
        if let Some(reason) = &self.error {
            return Err(PanelError::Http {
                symbol: "*".into(),
                reason: reason.clone(),
            });
        }
        Ok(self.table.clone())
    }
}
