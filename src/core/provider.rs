//! Market data provider abstraction

use crate::core::metadata::AssetMetadata;
use crate::core::price::PriceBar;
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Looks up currency, instrument type and display names for a ticker.
    async fn fetch_metadata(&self, ticker: &str) -> Result<AssetMetadata>;

    /// Fetches adjusted daily bars for `[start, end)`. An empty vector means
    /// the provider had no data for the range.
    async fn fetch_history(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>>;
}
