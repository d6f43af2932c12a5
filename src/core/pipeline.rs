//! End-to-end run: parse, analyze, write manifest, download.

use crate::core::analysis::{TickerAnalysis, analyze_tickers};
use crate::core::download::{DownloadObserver, DownloadSummary, PRICES_DIR, download_all};
use crate::core::error::PipelineError;
use crate::core::metadata::AssetRecord;
use crate::core::provider::MarketDataProvider;
use crate::core::ticker::parse_tickers;
use crate::store::DataStore;
use anyhow::Result;
use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Debug, Clone)]
pub struct RunRequest {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub target_currency: String,
    pub risk_free_ticker: Option<String>,
    pub input_file: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub tickers: Vec<String>,
    pub records: Vec<AssetRecord>,
    pub manifest: Option<PathBuf>,
    pub downloads: DownloadSummary,
}

impl RunReport {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn is_missing_file(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::TickerFileNotFound(_))
    )
}

/// Parses and analyzes the ticker file without downloading anything.
///
/// Returns `Ok(None)` when the ticker file does not exist.
pub async fn analyze_file(
    provider: &dyn MarketDataProvider,
    input_file: &std::path::Path,
    target_currency: &str,
    risk_free_ticker: Option<&str>,
) -> Result<Option<TickerAnalysis>> {
    let user_tickers = match parse_tickers(input_file) {
        Ok(tickers) => tickers,
        Err(e) if is_missing_file(&e) => {
            error!("{e}");
            return Ok(None);
        }
        Err(e) => return Err(e),
    };
    info!(
        "Loaded {} unique tickers from {}",
        user_tickers.len(),
        input_file.display()
    );

    Ok(Some(
        analyze_tickers(provider, &user_tickers, target_currency, risk_free_ticker).await,
    ))
}

/// Runs the full pipeline.
///
/// A missing ticker file is logged and produces an empty report. Failures on
/// individual tickers are reflected in the report, never returned as errors.
pub async fn run_pipeline(
    provider: &dyn MarketDataProvider,
    store: &DataStore,
    request: &RunRequest,
    observer: &mut dyn DownloadObserver,
) -> Result<RunReport> {
    if request.start > request.end {
        return Err(PipelineError::InvalidDateRange {
            start: request.start,
            end: request.end,
        }
        .into());
    }
    info!(
        "Starting pipeline. Period: {} to {}",
        request.start, request.end
    );

    let Some(analysis) = analyze_file(
        provider,
        &request.input_file,
        &request.target_currency,
        request.risk_free_ticker.as_deref(),
    )
    .await?
    else {
        return Ok(RunReport::default());
    };

    let manifest = store.write_manifest(&analysis.records)?;
    info!("Metadata manifest saved to {}", manifest.display());

    let prices_dir = store.raw_path(PRICES_DIR);
    let downloads = download_all(
        provider,
        &analysis.tickers,
        request.start,
        request.end,
        &prices_dir,
        observer,
    )
    .await;
    info!("Pipeline finished. {downloads}");

    Ok(RunReport {
        tickers: analysis.tickers,
        records: analysis.records,
        manifest: Some(manifest),
        downloads,
    })
}
