//! Ticker universe handling for the price download.
//!
//! Parses ticker lists from configuration or the command line and
//! normalizes symbols to the market-data vendor's format.

use std::collections::HashSet;

#[derive(Debug, Clone, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in ticker list")]
    EmptyToken,

    #[error("duplicate ticker: {0}")]
    DuplicateTicker(String),
}

/// Share-class dots become dashes: `BRK.B` is `BRK-B` at the vendor.
pub fn normalize_ticker(ticker: &str) -> String {
    ticker.trim().to_uppercase().replace('.', "-")
}

/// Parse a comma-separated ticker list. Tickers are trimmed, uppercased,
/// and vendor-normalized; empty tokens and duplicates are rejected.
pub fn parse_tickers(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut tickers = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let ticker = normalize_ticker(trimmed);
        if seen.contains(&ticker) {
            return Err(UniverseError::DuplicateTicker(ticker));
        }
        seen.insert(ticker.clone());
        tickers.push(ticker);
    }

    Ok(tickers)
}
