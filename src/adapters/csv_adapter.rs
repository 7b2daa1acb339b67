//! CSV file adapter: raw panel input, cleaned panel and price table output.
//!
//! The reader is schema-checked: a required column missing from the header
//! is a hard error, because silently continuing would produce an empty
//! panel instead of a diagnosis. Cell contents are not validated here; bad
//! cells are the cleaner's business.

use crate::domain::error::PanelError;
use crate::domain::prices::PriceTable;
use crate::domain::record::{CleanPanel, RawPanel, RawRecord, REQUIRED_COLUMNS};
use std::fs;
use std::path::Path;

fn csv_err(path: &Path, e: csv::Error) -> PanelError {
    PanelError::Csv {
        file: path.display().to_string(),
        reason: e.to_string(),
    }
}

/// Read a raw panel CSV with a header row.
///
/// Required columns are matched case-insensitively and may appear in any
/// order; all other columns are carried through as passthrough columns in
/// their original order.
pub fn read_raw_panel(path: &Path) -> Result<RawPanel, PanelError> {
    let mut rdr = csv::Reader::from_path(path).map_err(|e| csv_err(path, e))?;

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| csv_err(path, e))?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let mut required_idx = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, name) in required_idx.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers.iter().position(|h| h == name).ok_or_else(|| {
            PanelError::MissingColumn {
                column: name.to_string(),
                file: path.display().to_string(),
            }
        })?;
    }
    let [date_i, permno_i, ret_i, prc_i, shrout_i] = required_idx;

    let extra_idx: Vec<usize> = (0..headers.len())
        .filter(|i| !required_idx.contains(i))
        .collect();
    let extra_columns: Vec<String> = extra_idx.iter().map(|&i| headers[i].clone()).collect();

    let cell = |record: &csv::StringRecord, i: usize| -> String {
        record.get(i).unwrap_or_default().to_string()
    };

    let mut records = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| csv_err(path, e))?;
        records.push(RawRecord {
            date: cell(&record, date_i),
            permno: cell(&record, permno_i),
            ret: cell(&record, ret_i),
            prc: cell(&record, prc_i),
            shrout: cell(&record, shrout_i),
            extra: extra_idx.iter().map(|&i| cell(&record, i)).collect(),
        });
    }

    Ok(RawPanel {
        extra_columns,
        records,
    })
}

/// Write a cleaned panel as CSV: the key columns, any passthrough columns,
/// then the derived `mkt_cap` column last.
pub fn write_clean_panel(panel: &CleanPanel, path: &Path) -> Result<(), PanelError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut wtr = csv::Writer::from_path(path).map_err(|e| csv_err(path, e))?;

    let mut header: Vec<&str> = REQUIRED_COLUMNS.to_vec();
    header.extend(panel.extra_columns.iter().map(String::as_str));
    header.push("mkt_cap");
    wtr.write_record(&header).map_err(|e| csv_err(path, e))?;

    for r in &panel.records {
        let mut row = vec![
            r.date.format("%Y-%m-%d").to_string(),
            r.permno.to_string(),
            r.ret.to_string(),
            r.prc.to_string(),
            r.shrout.to_string(),
        ];
        row.extend(r.extra.iter().cloned());
        row.push(r.mkt_cap.to_string());
        wtr.write_record(&row).map_err(|e| csv_err(path, e))?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write a wide price table as CSV: `date` column first, one column per
/// ticker, missing prices as empty cells.
pub fn write_price_table(table: &PriceTable, path: &Path) -> Result<(), PanelError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut wtr = csv::Writer::from_path(path).map_err(|e| csv_err(path, e))?;

    let mut header = vec!["date".to_string()];
    header.extend(table.tickers.iter().cloned());
    wtr.write_record(&header).map_err(|e| csv_err(path, e))?;

    for (date, row) in table.dates.iter().zip(&table.closes) {
        let mut out = vec![date.format("%Y-%m-%d").to_string()];
        out.extend(
            row.iter()
                .map(|c| c.map(|v| v.to_string()).unwrap_or_default()),
        );
        wtr.write_record(&out).map_err(|e| csv_err(path, e))?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clean::clean_panel;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn read_raw_panel_maps_columns() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "raw.csv",
            "date,permno,ret,prc,shrout,comnam,exchcd\n\
             2020-01-31,10001,0.05,-10,100,ACME CORP,1\n\
             2020-01-31,10002,C,25,200,WIDGETS INC,3\n",
        );

        let panel = read_raw_panel(&path).unwrap();
        assert_eq!(panel.len(), 2);
        assert_eq!(panel.extra_columns, vec!["comnam", "exchcd"]);
        assert_eq!(panel.records[0].prc, "-10");
        assert_eq!(panel.records[0].extra, vec!["ACME CORP", "1"]);
        assert_eq!(panel.records[1].ret, "C");
    }

    #[test]
    fn read_raw_panel_reordered_header() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "raw.csv",
            "PRC,date,shrout,permno,ret\n-10,2020-01-31,100,10001,0.05\n",
        );

        let panel = read_raw_panel(&path).unwrap();
        assert_eq!(panel.records[0].prc, "-10");
        assert_eq!(panel.records[0].permno, "10001");
        assert!(panel.extra_columns.is_empty());
    }

    #[test]
    fn read_raw_panel_missing_column_fails_fast() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "raw.csv", "date,permno,ret,prc\n2020-01-31,1,0.1,5\n");

        match read_raw_panel(&path) {
            Err(PanelError::MissingColumn { column, .. }) => assert_eq!(column, "shrout"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn read_raw_panel_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        assert!(read_raw_panel(&dir.path().join("absent.csv")).is_err());
    }

    #[test]
    fn clean_panel_roundtrip_through_csv() {
        let dir = TempDir::new().unwrap();
        let raw_path = write_file(
            &dir,
            "raw.csv",
            "date,permno,ret,prc,shrout,comnam\n\
             2020-01-31,10001,0.05,-10,100,ACME CORP\n",
        );

        let clean = clean_panel(&read_raw_panel(&raw_path).unwrap());
        let out_path = dir.path().join("out/clean.csv");
        write_clean_panel(&clean, &out_path).unwrap();

        let content = fs::read_to_string(&out_path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "date,permno,ret,prc,shrout,comnam,mkt_cap"
        );
        assert_eq!(lines.next().unwrap(), "2020-01-31,10001,0.05,10,100,ACME CORP,1000");
    }

    #[test]
    fn write_price_table_formats_missing_as_empty() {
        let dir = TempDir::new().unwrap();
        let table = PriceTable {
            dates: vec![NaiveDate::from_ymd_opt(2020, 1, 2).unwrap()],
            tickers: vec!["AAPL".into(), "MSFT".into()],
            closes: vec![vec![Some(300.5), None]],
        };

        let path = dir.path().join("prices.csv");
        write_price_table(&table, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "date,AAPL,MSFT\n2020-01-02,300.5,\n");
    }
}
