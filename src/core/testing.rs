use crate::core::metadata::AssetMetadata;
use crate::core::price::PriceBar;
use crate::core::provider::MarketDataProvider;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

/// Deterministic in-memory provider.
///
/// Tickers without metadata fail the metadata lookup; tickers without
/// history return an empty series.
#[derive(Default)]
pub struct StaticProvider {
    metadata: HashMap<String, AssetMetadata>,
    history: HashMap<String, Vec<PriceBar>>,
    history_errors: HashSet<String>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metadata(mut self, ticker: &str, metadata: AssetMetadata) -> Self {
        self.metadata.insert(ticker.to_string(), metadata);
        self
    }

    pub fn with_history(mut self, ticker: &str, bars: Vec<PriceBar>) -> Self {
        self.history.insert(ticker.to_string(), bars);
        self
    }

    pub fn with_history_error(mut self, ticker: &str) -> Self {
        self.history_errors.insert(ticker.to_string());
        self
    }
}

#[async_trait]
impl MarketDataProvider for StaticProvider {
    async fn fetch_metadata(&self, ticker: &str) -> Result<AssetMetadata> {
        self.metadata
            .get(ticker)
            .cloned()
            .ok_or_else(|| anyhow!("No metadata for {ticker}"))
    }

    async fn fetch_history(
        &self,
        ticker: &str,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<Vec<PriceBar>> {
        if self.history_errors.contains(ticker) {
            return Err(anyhow!("Connection reset while fetching {ticker}"));
        }
        Ok(self.history.get(ticker).cloned().unwrap_or_default())
    }
}

pub fn bar(date: &str, close: f64) -> PriceBar {
    PriceBar {
        date: date.parse().expect("valid date"),
        open: Some(close - 1.0),
        high: Some(close + 1.0),
        low: Some(close - 2.0),
        close: Some(close),
        volume: Some(1_000),
    }
}
