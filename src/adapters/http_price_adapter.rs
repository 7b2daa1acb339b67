//! Market-data API adapter for daily adjusted closing prices.
//!
//! Talks to a Yahoo-style v8 chart endpoint, one request per ticker, and
//! assembles a wide [`PriceTable`] on the union of all returned dates.
//! A ticker that fails (bad symbol, delisted, upstream hiccup) is skipped
//! with a warning rather than failing the whole batch; its column simply
//! never appears. The endpoint has no official contract and can change
//! shape without notice, so parse failures are reported verbatim.

use crate::domain::error::PanelError;
use crate::domain::prices::PriceTable;
use crate::ports::price_port::PriceSource;
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    adjclose: Vec<Option<f64>>,
}

pub struct HttpPriceAdapter {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpPriceAdapter {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the adapter at a different chart endpoint (tests, mirrors).
    pub fn with_base_url(base_url: &str) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn chart_url(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let start_ts = start.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp();
        let end_ts = end.and_hms_opt(23, 59, 59).unwrap().and_utc().timestamp();
        format!(
            "{base}/{symbol}?period1={start_ts}&period2={end_ts}&interval=1d\
             &includeAdjustedClose=true",
            base = self.base_url
        )
    }

    /// Pull one ticker's adjusted closes, keyed by date.
    fn fetch_one(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BTreeMap<NaiveDate, f64>, PanelError> {
        let url = self.chart_url(symbol, start, end);
        let resp: ChartResponse = self
            .client
            .get(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.json())
            .map_err(|e| PanelError::Http {
                symbol: symbol.to_string(),
                reason: e.to_string(),
            })?;

        parse_chart(symbol, resp)
    }
}

impl Default for HttpPriceAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract (date, adjusted close) pairs from a chart response. Prefers the
/// adjclose series, falls back to the raw close when absent.
fn parse_chart(
    symbol: &str,
    resp: ChartResponse,
) -> Result<BTreeMap<NaiveDate, f64>, PanelError> {
    let http_err = |reason: String| PanelError::Http {
        symbol: symbol.to_string(),
        reason,
    };

    let result = match (resp.chart.result, resp.chart.error) {
        (Some(r), _) => r,
        (None, Some(err)) => return Err(http_err(format!("{}: {}", err.code, err.description))),
        (None, None) => return Err(http_err("empty result with no error".into())),
    };

    let data = result
        .into_iter()
        .next()
        .ok_or_else(|| http_err("result array is empty".into()))?;

    let timestamps = data
        .timestamp
        .ok_or_else(|| http_err("no timestamps".into()))?;

    let closes = match data.indicators.adjclose.and_then(|mut a| {
        if a.is_empty() {
            None
        } else {
            Some(a.swap_remove(0).adjclose)
        }
    }) {
        Some(adj) => adj,
        None => data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| http_err("no quote data".into()))?
            .close,
    };

    let mut out = BTreeMap::new();
    for (ts, close) in timestamps.into_iter().zip(closes) {
        let Some(close) = close else { continue };
        let Some(dt) = DateTime::from_timestamp(ts, 0) else {
            continue;
        };
        out.insert(dt.date_naive(), close);
    }

    Ok(out)
}

/// Join per-ticker date→close maps into a wide table on the union of dates.
fn assemble_table(columns: Vec<(String, BTreeMap<NaiveDate, f64>)>) -> PriceTable {
    let mut dates: Vec<NaiveDate> = columns
        .iter()
        .flat_map(|(_, m)| m.keys().copied())
        .collect();
    dates.sort();
    dates.dedup();

    let tickers: Vec<String> = columns.iter().map(|(t, _)| t.clone()).collect();
    let closes = dates
        .iter()
        .map(|d| columns.iter().map(|(_, m)| m.get(d).copied()).collect())
        .collect();

    PriceTable {
        dates,
        tickers,
        closes,
    }
}

impl PriceSource for HttpPriceAdapter {
    fn fetch_adjusted_close(
        &self,
        tickers: &[String],
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceTable, PanelError> {
        let mut columns = Vec::with_capacity(tickers.len());

        for ticker in tickers {
            match self.fetch_one(ticker, start_date, end_date) {
                Ok(closes) => columns.push((ticker.clone(), closes)),
                Err(e) => eprintln!("Warning: skipping {ticker} ({e})"),
            }
        }

        if columns.is_empty() {
            return Err(PanelError::NoData {
                what: format!("any of {} tickers", tickers.len()),
            });
        }

        Ok(assemble_table(columns))
    }
}
