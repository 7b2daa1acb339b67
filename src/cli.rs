//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::clean::{clean_panel, filter_min_price, DEFAULT_MIN_PRICE};
use crate::domain::error::PanelError;
use crate::domain::prices::drop_empty_columns;
use crate::domain::universe::parse_tickers;
use crate::ports::config_port::ConfigPort;
use crate::ports::panel_port::PanelSource;
use crate::ports::price_port::PriceSource;

pub const DEFAULT_START_DATE: &str = "2018-01-01";
pub const DEFAULT_OUTPUT_DIR: &str = "data/raw";
pub const MONTHLY_FILENAME: &str = "crsp_monthly.csv";
pub const PRICES_FILENAME: &str = "adjusted_prices.csv";

#[derive(Parser, Debug)]
#[command(name = "panelfetch", about = "Equity panel data retrieval and cleaning")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch the monthly panel from the research database, clean it, write CSV
    FetchMonthly {
        #[arg(short, long)]
        config: PathBuf,
        /// Earliest observation date (YYYY-MM-DD)
        #[arg(long)]
        start_date: Option<String>,
        /// Penny-stock cutoff; rows with prc at or below it are dropped
        #[arg(long)]
        min_price: Option<f64>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Download daily adjusted closing prices for a ticker list, write wide CSV
    FetchPrices {
        #[arg(short, long)]
        config: PathBuf,
        /// Comma-separated ticker list (overrides [panel] tickers)
        #[arg(long)]
        tickers: Option<String>,
        #[arg(long)]
        start_date: Option<String>,
        /// Defaults to today
        #[arg(long)]
        end_date: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Clean an existing raw panel CSV without touching any upstream
    Clean {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// Optional penny-stock cutoff applied after cleaning
        #[arg(long)]
        min_price: Option<f64>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::FetchMonthly {
            config,
            start_date,
            min_price,
            output,
        } => run_fetch_monthly(&config, start_date.as_deref(), min_price, output.as_deref()),
        Command::FetchPrices {
            config,
            tickers,
            start_date,
            end_date,
            output,
        } => run_fetch_prices(
            &config,
            tickers.as_deref(),
            start_date.as_deref(),
            end_date.as_deref(),
            output.as_deref(),
        ),
        Command::Clean {
            input,
            output,
            min_price,
        } => run_clean(&input, &output, min_price),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, PanelError> {
    FileConfigAdapter::from_file(path).map_err(|e| PanelError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn parse_date(value: &str, key: &str) -> Result<NaiveDate, PanelError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| PanelError::ConfigInvalid {
        section: "panel".into(),
        key: key.into(),
        reason: "invalid date format (expected YYYY-MM-DD)".into(),
    })
}

/// Flag wins over config; config wins over the fixed default.
pub fn resolve_start_date(
    flag: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<NaiveDate, PanelError> {
    let value = flag
        .map(str::to_string)
        .or_else(|| config.get_string("panel", "start_date"))
        .unwrap_or_else(|| DEFAULT_START_DATE.to_string());
    parse_date(&value, "start_date")
}

pub fn resolve_end_date(
    flag: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<NaiveDate, PanelError> {
    match flag
        .map(str::to_string)
        .or_else(|| config.get_string("panel", "end_date"))
    {
        Some(value) => parse_date(&value, "end_date"),
        None => Ok(chrono::Utc::now().date_naive()),
    }
}

pub fn resolve_min_price(flag: Option<f64>, config: &dyn ConfigPort) -> f64 {
    flag.unwrap_or_else(|| config.get_double("panel", "min_price", DEFAULT_MIN_PRICE))
}

pub fn resolve_output(
    flag: Option<&Path>,
    config: &dyn ConfigPort,
    filename: &str,
) -> PathBuf {
    match flag {
        Some(path) => path.to_path_buf(),
        None => {
            let dir = config
                .get_string("output", "dir")
                .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string());
            Path::new(&dir).join(filename)
        }
    }
}

pub fn resolve_tickers(
    flag: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<Vec<String>, PanelError> {
    let list = flag
        .map(str::to_string)
        .or_else(|| config.get_string("panel", "tickers"))
        .ok_or_else(|| PanelError::ConfigMissing {
            section: "panel".into(),
            key: "tickers".into(),
        })?;

    parse_tickers(&list).map_err(|e| PanelError::ConfigInvalid {
        section: "panel".into(),
        key: "tickers".into(),
        reason: e.to_string(),
    })
}

/// Fetch, clean, penny-filter, and persist the monthly panel.
pub fn run_monthly_pipeline(
    source: &dyn PanelSource,
    start_date: NaiveDate,
    min_price: f64,
    output: &Path,
) -> Result<(), PanelError> {
    eprintln!("Querying monthly panel from {start_date}...");
    let raw = source.fetch_monthly(start_date)?;
    if raw.is_empty() {
        return Err(PanelError::NoData {
            what: format!("monthly panel from {start_date}"),
        });
    }
    eprintln!("Downloaded {} rows", raw.len());

    let clean = clean_panel(&raw);
    eprintln!("Cleaned: {} -> {} rows", raw.len(), clean.len());

    let before = clean.len();
    let clean = filter_min_price(clean, min_price);
    eprintln!(
        "Filtered penny stocks (prc <= {min_price}): {before} -> {} rows",
        clean.len()
    );
    if clean.is_empty() {
        eprintln!("Warning: no rows survived cleaning");
    }

    csv_adapter::write_clean_panel(&clean, output)?;
    eprintln!("Saved clean panel to {}", output.display());
    Ok(())
}

/// Download prices, drop dead columns, persist the wide table.
pub fn run_prices_pipeline(
    source: &dyn PriceSource,
    tickers: &[String],
    start_date: NaiveDate,
    end_date: NaiveDate,
    output: &Path,
) -> Result<(), PanelError> {
    eprintln!(
        "Downloading adjusted closes for {} tickers ({start_date} ~ {end_date})...",
        tickers.len()
    );
    let table = source.fetch_adjusted_close(tickers, start_date, end_date)?;
    let table = drop_empty_columns(table);
    if table.is_empty() {
        return Err(PanelError::NoData {
            what: "adjusted close prices".into(),
        });
    }

    csv_adapter::write_price_table(&table, output)?;
    eprintln!(
        "Saved {} dates x {} tickers to {}",
        table.dates.len(),
        table.tickers.len(),
        output.display()
    );
    Ok(())
}

fn run_fetch_monthly(
    config_path: &Path,
    start_date: Option<&str>,
    min_price: Option<f64>,
    output: Option<&Path>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let start = match resolve_start_date(start_date, &adapter) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let min_price = resolve_min_price(min_price, &adapter);
    let output = resolve_output(output, &adapter, MONTHLY_FILENAME);

    #[cfg(feature = "postgres")]
    {
        use crate::adapters::crsp_adapter::CrspAdapter;

        eprintln!("Connecting to research database...");
        let source = match CrspAdapter::from_config(&adapter) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        match run_monthly_pipeline(&source, start, min_price, &output) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("error: {e}");
                (&e).into()
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    {
        let _ = (start, min_price, output);
        eprintln!("error: postgres feature is required for fetch-monthly");
        ExitCode::from(1)
    }
}

fn run_fetch_prices(
    config_path: &Path,
    tickers: Option<&str>,
    start_date: Option<&str>,
    end_date: Option<&str>,
    output: Option<&Path>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let resolved = resolve_tickers(tickers, &adapter).and_then(|tickers| {
        let start = resolve_start_date(start_date, &adapter)?;
        let end = resolve_end_date(end_date, &adapter)?;
        Ok((tickers, start, end))
    });
    let (tickers, start, end) = match resolved {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let output = resolve_output(output, &adapter, PRICES_FILENAME);

    #[cfg(feature = "http")]
    {
        use crate::adapters::http_price_adapter::HttpPriceAdapter;

        let source = HttpPriceAdapter::new();
        match run_prices_pipeline(&source, &tickers, start, end, &output) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("error: {e}");
                (&e).into()
            }
        }
    }

    #[cfg(not(feature = "http"))]
    {
        let _ = (tickers, start, end, output);
        eprintln!("error: http feature is required for fetch-prices");
        ExitCode::from(1)
    }
}

fn run_clean(input: &Path, output: &Path, min_price: Option<f64>) -> ExitCode {
    let result: Result<(), PanelError> = (|| {
        let raw = csv_adapter::read_raw_panel(input)?;
        eprintln!("Read {} rows from {}", raw.len(), input.display());

        let mut clean = clean_panel(&raw);
        eprintln!("Cleaned: {} -> {} rows", raw.len(), clean.len());

        if let Some(cutoff) = min_price {
            let before = clean.len();
            clean = filter_min_price(clean, cutoff);
            eprintln!(
                "Filtered penny stocks (prc <= {cutoff}): {before} -> {} rows",
                clean.len()
            );
        }

        csv_adapter::write_clean_panel(&clean, output)?;
        eprintln!("Saved clean panel to {}", output.display());
        Ok(())
    })();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
