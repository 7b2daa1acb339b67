//! CRSP research database adapter (PostgreSQL).
//!
//! Queries the monthly stock file joined against the names file, filtered
//! to ordinary common shares (shrcd 10, 11) on NYSE, AMEX, and NASDAQ
//! (exchcd 1, 2, 3). Every selected column is cast to text so the raw
//! panel reaches the cleaner exactly as the vendor stored it; NULLs become
//! empty cells, which the cleaner treats as missing.

use crate::domain::error::PanelError;
use crate::domain::record::{RawPanel, RawRecord};
use crate::ports::config_port::ConfigPort;
use crate::ports::panel_port::PanelSource;
use chrono::NaiveDate;
use postgres::{Client, NoTls};
use std::cell::RefCell;

const MONTHLY_QUERY: &str = "SELECT \
        a.date::text, \
        a.permno::text, \
        COALESCE(a.ret::text, ''), \
        COALESCE(a.prc::text, ''), \
        COALESCE(a.shrout::text, ''), \
        COALESCE(b.comnam, ''), \
        COALESCE(b.shrcd::text, ''), \
        COALESCE(b.exchcd::text, '') \
     FROM crsp.msf AS a \
     LEFT JOIN crsp.msenames AS b \
       ON a.permno = b.permno \
      AND b.namedt <= a.date \
      AND a.date <= b.nameendt \
     WHERE a.date >= $1 \
       AND b.shrcd IN (10, 11) \
       AND b.exchcd IN (1, 2, 3)";

pub struct CrspAdapter {
    client: RefCell<Client>,
}

impl CrspAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, PanelError> {
        let conninfo = config.get_string("database", "conninfo").ok_or_else(|| {
            PanelError::ConfigMissing {
                section: "database".into(),
                key: "conninfo".into(),
            }
        })?;

        let client = Client::connect(&conninfo, NoTls).map_err(|e| PanelError::Database {
            reason: e.to_string(),
        })?;

        Ok(Self {
            client: RefCell::new(client),
        })
    }
}

impl PanelSource for CrspAdapter {
    fn fetch_monthly(&self, start_date: NaiveDate) -> Result<RawPanel, PanelError> {
        let rows = self
            .client
            .borrow_mut()
            .query(MONTHLY_QUERY, &[&start_date])
            .map_err(|e| PanelError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        let records: Vec<RawRecord> = rows
            .into_iter()
            .map(|row| RawRecord {
                date: row.get(0),
                permno: row.get(1),
                ret: row.get(2),
                prc: row.get(3),
                shrout: row.get(4),
                extra: vec![row.get(5), row.get(6), row.get(7)],
            })
            .collect();

        Ok(RawPanel {
            extra_columns: vec!["comnam".into(), "shrcd".into(), "exchcd".into()],
            records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EmptyConfig;

    impl ConfigPort for EmptyConfig {
        fn get_string(&self, _section: &str, _key: &str) -> Option<String> {
            None
        }
        fn get_double(&self, _section: &str, _key: &str, default: f64) -> f64 {
            default
        }
    }

    #[test]
    fn from_config_missing_conninfo() {
        let config = EmptyConfig;
        let result = CrspAdapter::from_config(&config);
        match result {
            Err(PanelError::ConfigMissing { section, key }) => {
                assert_eq!(section, "database");
                assert_eq!(key, "conninfo");
            }
            Err(other) => panic!("expected ConfigMissing, got: {other}"),
            Ok(_) => panic!("expected error, got Ok"),
        }
    }
}
