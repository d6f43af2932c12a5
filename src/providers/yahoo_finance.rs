use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use tracing::{debug, instrument};
use urlencoding::encode;

use crate::core::metadata::AssetMetadata;
use crate::core::price::PriceBar;
use crate::core::provider::MarketDataProvider;

pub struct YahooFinanceProvider {
    base_url: String,
    client: reqwest::Client,
}

impl YahooFinanceProvider {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("tickerprep/0.1")
            .build()?;
        Ok(YahooFinanceProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn fetch_chart(&self, ticker: &str, query: &str) -> Result<ChartItem> {
        let url = format!(
            "{}/v8/finance/chart/{}?{}",
            self.base_url,
            encode(ticker),
            query
        );
        debug!("Requesting chart data from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for ticker: {} URL: {}", e, ticker, url))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for ticker: {}",
                response.status(),
                ticker
            ));
        }

        let text = response.text().await?;
        let data: YahooChartResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", ticker, e))?;

        if let Some(err) = data.chart.error {
            return Err(anyhow!("{}: {} ({})", err.code, err.description, ticker));
        }

        data.chart
            .result
            .and_then(|items| items.into_iter().next())
            .ok_or_else(|| anyhow!("No chart data found for ticker: {}", ticker))
    }
}

#[derive(Deserialize, Debug)]
struct YahooChartResponse {
    chart: ChartResult,
}

#[derive(Deserialize, Debug)]
struct ChartResult {
    result: Option<Vec<ChartItem>>,
    error: Option<ChartError>,
}

#[derive(Deserialize, Debug)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Deserialize, Debug)]
struct ChartItem {
    meta: ChartMeta,
    timestamp: Option<Vec<i64>>,
    indicators: Option<Indicators>,
}

#[derive(Deserialize, Debug)]
struct ChartMeta {
    currency: Option<String>,
    #[serde(alias = "instrumentType")]
    instrument_type: Option<String>,
    #[serde(alias = "shortName")]
    short_name: Option<String>,
    #[serde(alias = "longName")]
    long_name: Option<String>,
    gmtoffset: Option<i64>,
}

#[derive(Deserialize, Debug)]
struct Indicators {
    quote: Vec<Quote>,
    adjclose: Option<Vec<AdjClose>>,
}

#[derive(Deserialize, Debug, Default)]
struct Quote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<u64>>>,
}

#[derive(Deserialize, Debug)]
struct AdjClose {
    adjclose: Option<Vec<Option<f64>>>,
}

fn value_at<T: Copy>(series: &Option<Vec<Option<T>>>, index: usize) -> Option<T> {
    series.as_ref().and_then(|s| s.get(index).copied().flatten())
}

/// Converts a chart item into daily bars scaled by `adjclose / close`.
fn extract_bars(item: ChartItem) -> Vec<PriceBar> {
    let Some(timestamps) = item.timestamp else {
        return Vec::new();
    };
    let offset = item.meta.gmtoffset.unwrap_or(0);
    let (quote, adjclose) = match item.indicators {
        Some(indicators) => (
            indicators.quote.into_iter().next().unwrap_or_default(),
            indicators
                .adjclose
                .and_then(|a| a.into_iter().next())
                .and_then(|a| a.adjclose),
        ),
        None => (Quote::default(), None),
    };

    let mut bars: Vec<PriceBar> = Vec::with_capacity(timestamps.len());
    for (i, ts) in timestamps.iter().enumerate() {
        let Some(date) = DateTime::from_timestamp(ts + offset, 0).map(|dt| dt.date_naive()) else {
            continue;
        };
        let (open, high, low, close) = (
            value_at(&quote.open, i),
            value_at(&quote.high, i),
            value_at(&quote.low, i),
            value_at(&quote.close, i),
        );
        if open.is_none() && high.is_none() && low.is_none() && close.is_none() {
            continue;
        }

        let factor = match (value_at(&adjclose, i), close) {
            (Some(adj), Some(c)) if c != 0.0 => adj / c,
            _ => 1.0,
        };
        let bar = PriceBar {
            date,
            open: open.map(|v| v * factor),
            high: high.map(|v| v * factor),
            low: low.map(|v| v * factor),
            close: close.map(|v| v * factor),
            volume: value_at(&quote.volume, i),
        };

        // Yahoo repeats the live session as a trailing bar on the same date
        match bars.last_mut() {
            Some(last) if last.date == date => *last = bar,
            _ => bars.push(bar),
        }
    }
    bars
}

fn day_start(date: NaiveDate) -> i64 {
    date.and_time(chrono::NaiveTime::MIN).and_utc().timestamp()
}

#[async_trait]
impl MarketDataProvider for YahooFinanceProvider {
    #[instrument(name = "YahooMetadataFetch", skip(self), fields(ticker = %ticker))]
    async fn fetch_metadata(&self, ticker: &str) -> Result<AssetMetadata> {
        let item = self.fetch_chart(ticker, "range=1d&interval=1d").await?;
        let meta = item.meta;
        Ok(AssetMetadata {
            currency: meta.currency,
            quote_type: meta.instrument_type,
            short_name: meta.short_name,
            long_name: meta.long_name,
        })
    }

    #[instrument(name = "YahooHistoryFetch", skip(self), fields(ticker = %ticker))]
    async fn fetch_history(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>> {
        let query = format!(
            "period1={}&period2={}&interval=1d&events=div%2Csplits&includeAdjustedClose=true",
            day_start(start),
            day_start(end)
        );
        let item = self.fetch_chart(ticker, &query).await?;
        let bars = extract_bars(item);
        debug!("Received {} bars for {}", bars.len(), ticker);
        Ok(bars)
    }
}
