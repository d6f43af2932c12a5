//! Sequential historical price download into per-ticker CSV files

use crate::core::provider::MarketDataProvider;
use crate::store::write_csv;
use chrono::NaiveDate;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

pub const PRICES_DIR: &str = "prices";

/// Strips the `^`, `=X` and `=F` markers Yahoo uses for indices, FX pairs
/// and futures so the ticker can be used in a file name.
pub fn sanitize_ticker(ticker: &str) -> String {
    ticker.replace('^', "").replace("=X", "").replace("=F", "")
}

pub fn price_file_name(ticker: &str) -> String {
    format!("{}_prices.csv", sanitize_ticker(ticker))
}

#[derive(Debug, Clone, PartialEq)]
pub enum DownloadOutcome {
    Saved { path: PathBuf, rows: usize },
    Empty,
    Failed(String),
}

impl DownloadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DownloadOutcome::Saved { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DownloadSummary {
    pub success: usize,
    pub failed: usize,
    /// Tickers that produced no file, with the reason.
    pub failures: Vec<(String, String)>,
}

impl DownloadSummary {
    pub fn record(&mut self, ticker: &str, outcome: &DownloadOutcome) {
        match outcome {
            DownloadOutcome::Saved { .. } => self.success += 1,
            DownloadOutcome::Empty => {
                self.failed += 1;
                self.failures
                    .push((ticker.to_string(), "No data returned".to_string()));
            }
            DownloadOutcome::Failed(reason) => {
                self.failed += 1;
                self.failures.push((ticker.to_string(), reason.clone()));
            }
        }
    }
}

impl Display for DownloadSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "success: {}, failed: {}", self.success, self.failed)
    }
}

/// Receives progress from the download loop.
pub trait DownloadObserver {
    fn started(&mut self, _total: usize) {}
    fn finished(&mut self, _ticker: &str, _outcome: &DownloadOutcome) {}
}

impl DownloadObserver for () {}

/// Downloads one ticker and writes it to `prices_dir`. Files are written only
/// for non-empty series.
pub async fn download_ticker(
    provider: &dyn MarketDataProvider,
    ticker: &str,
    start: NaiveDate,
    end: NaiveDate,
    prices_dir: &Path,
) -> DownloadOutcome {
    let bars = match provider.fetch_history(ticker, start, end).await {
        Ok(bars) => bars,
        Err(e) => return DownloadOutcome::Failed(e.to_string()),
    };
    if bars.is_empty() {
        return DownloadOutcome::Empty;
    }

    let path = prices_dir.join(price_file_name(ticker));
    match write_csv(&path, &bars) {
        Ok(()) => DownloadOutcome::Saved {
            path,
            rows: bars.len(),
        },
        Err(e) => DownloadOutcome::Failed(format!("{e:#}")),
    }
}

/// Downloads every ticker one after another. A failure on one ticker is
/// logged and counted; the loop always runs to the end.
pub async fn download_all(
    provider: &dyn MarketDataProvider,
    tickers: &[String],
    start: NaiveDate,
    end: NaiveDate,
    prices_dir: &Path,
    observer: &mut dyn DownloadObserver,
) -> DownloadSummary {
    info!("Starting download for {} assets...", tickers.len());
    observer.started(tickers.len());

    let mut summary = DownloadSummary::default();
    for ticker in tickers {
        let outcome = download_ticker(provider, ticker, start, end, prices_dir).await;
        match &outcome {
            DownloadOutcome::Saved { path, rows } => {
                info!("Saved {rows} rows for {ticker} to {}", path.display())
            }
            DownloadOutcome::Empty => warn!("Skipping {ticker} (No data returned)"),
            DownloadOutcome::Failed(reason) => error!("Failed to download {ticker}: {reason}"),
        }
        summary.record(ticker, &outcome);
        observer.finished(ticker, &outcome);
    }

    summary
}
