//! Ticker analysis and FX dependency expansion
//!
//! The functions here are pure: they take metadata lookups that have
//! already happened and decide what goes into the manifest. Fetching and
//! logging live in [`analyze_tickers`].

use crate::core::metadata::{
    AssetMetadata, AssetRecord, DEFAULT_CURRENCY, InstrumentType, RATE_CURRENCY, RecordSource,
    UNKNOWN,
};
use crate::core::provider::MarketDataProvider;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Outcome of a metadata query: the provider fields, or the reason it failed.
pub type MetadataLookup = Result<AssetMetadata, String>;

/// Expanded ticker list together with its manifest rows, index-aligned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickerAnalysis {
    pub tickers: Vec<String>,
    pub records: Vec<AssetRecord>,
}

/// Trims a configured risk-free ticker; blank values mean none.
pub fn normalize_risk_free(risk_free: Option<&str>) -> Option<&str> {
    risk_free.map(str::trim).filter(|t| !t.is_empty())
}

/// Appends the risk-free ticker when it is not already listed.
pub fn with_risk_free(tickers: &[String], risk_free: Option<&str>) -> Vec<String> {
    let mut working = tickers.to_vec();
    if let Some(rf) = normalize_risk_free(risk_free) {
        if !working.iter().any(|t| t == rf) {
            working.push(rf.to_string());
        }
    }
    working
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Builds the manifest row for a user (or risk-free) ticker.
pub fn build_record(ticker: &str, lookup: &MetadataLookup, risk_free: Option<&str>) -> AssetRecord {
    let (currency, instrument_type, name) = match lookup {
        Ok(meta) => (
            non_empty(&meta.currency)
                .unwrap_or(DEFAULT_CURRENCY)
                .to_uppercase(),
            InstrumentType::from(non_empty(&meta.quote_type).unwrap_or("EQUITY").to_string()),
            non_empty(&meta.short_name)
                .or_else(|| non_empty(&meta.long_name))
                .unwrap_or(ticker)
                .to_string(),
        ),
        Err(_) => (
            DEFAULT_CURRENCY.to_string(),
            InstrumentType::Unknown,
            UNKNOWN.to_string(),
        ),
    };

    let record = AssetRecord {
        ticker: ticker.to_string(),
        name,
        original_currency: currency,
        instrument_type,
        source: RecordSource::UserInput,
    };

    if risk_free == Some(ticker) {
        AssetRecord {
            name: format!("Risk-free Rate: {}", record.name),
            original_currency: RATE_CURRENCY.to_string(),
            instrument_type: InstrumentType::Rate,
            ..record
        }
    } else {
        record
    }
}

/// FX ticker quoting `currency` against `target`, e.g. `GBPEUR=X`.
pub fn fx_ticker(target: &str, currency: &str) -> String {
    format!("{target}{currency}=X")
}

fn needs_conversion(currency: &str, target: &str) -> bool {
    currency != target && currency != RATE_CURRENCY && currency != UNKNOWN
}

/// Synthesizes the FX rows required to convert every observed currency into
/// `target`, skipping pairs already present in `existing`.
///
/// Rows come out in ascending currency order.
pub fn fx_dependencies(
    records: &[AssetRecord],
    existing: &[String],
    target: &str,
) -> Vec<AssetRecord> {
    let currencies: BTreeSet<&str> = records
        .iter()
        .map(|r| r.original_currency.as_str())
        .collect();

    currencies
        .into_iter()
        .filter(|currency| needs_conversion(currency, target))
        .map(|currency| (currency, fx_ticker(target, currency)))
        .filter(|(_, ticker)| !existing.contains(ticker))
        .map(|(currency, ticker)| AssetRecord {
            ticker,
            name: format!("{target}/{currency} Exchange Rate"),
            original_currency: currency.to_string(),
            instrument_type: InstrumentType::Currency,
            source: RecordSource::FxDependency,
        })
        .collect()
}

/// Combines looked-up tickers with their FX dependencies.
///
/// `lookups` must be index-aligned with `working`.
pub fn expand(
    working: Vec<String>,
    lookups: &[MetadataLookup],
    target_currency: &str,
    risk_free: Option<&str>,
) -> TickerAnalysis {
    let target = target_currency.to_uppercase();
    let risk_free = normalize_risk_free(risk_free);
    let mut records: Vec<AssetRecord> = working
        .iter()
        .zip(lookups)
        .map(|(ticker, lookup)| build_record(ticker, lookup, risk_free))
        .collect();

    let fx = fx_dependencies(&records, &working, &target);
    let mut tickers = working;
    tickers.extend(fx.iter().map(|r| r.ticker.clone()));
    records.extend(fx);

    TickerAnalysis { tickers, records }
}

/// Queries metadata for every ticker in turn and expands the list with the
/// risk-free ticker and FX dependencies.
///
/// Lookup failures never abort the batch: the ticker is kept with fallback
/// metadata and a warning is logged.
pub async fn analyze_tickers(
    provider: &dyn MarketDataProvider,
    user_tickers: &[String],
    target_currency: &str,
    risk_free: Option<&str>,
) -> TickerAnalysis {
    info!("Analyzing assets and checking for FX dependencies");
    let risk_free = normalize_risk_free(risk_free);

    let working = with_risk_free(user_tickers, risk_free);
    if working.len() > user_tickers.len() {
        if let Some(rf) = risk_free {
            info!("Auto-adding risk-free rate ticker: {rf}");
        }
    }

    let mut lookups = Vec::with_capacity(working.len());
    for ticker in &working {
        let lookup = provider.fetch_metadata(ticker).await.map_err(|e| {
            warn!("Metadata fetch failed for {ticker}. Assuming {DEFAULT_CURRENCY}. Error: {e}");
            e.to_string()
        });
        debug!(?lookup, "Metadata for {ticker}");
        lookups.push(lookup);
    }

    let analysis = expand(working, &lookups, target_currency, risk_free);
    for record in analysis
        .records
        .iter()
        .filter(|r| r.source == RecordSource::FxDependency)
    {
        info!(
            "FX dependency: {} (for {} assets)",
            record.ticker, record.original_currency
        );
    }

    analysis
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::StaticProvider;

    fn tickers(list: &[&str]) -> Vec<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    fn meta(currency: &str, quote_type: &str, short_name: &str) -> AssetMetadata {
        AssetMetadata {
            currency: Some(currency.to_string()),
            quote_type: Some(quote_type.to_string()),
            short_name: Some(short_name.to_string()),
            long_name: None,
        }
    }

    #[test]
    fn test_build_record_applies_defaults() {
        let lookup: MetadataLookup = Ok(AssetMetadata {
            currency: None,
            quote_type: Some("etf".into()),
            short_name: None,
            long_name: Some("Vanguard FTSE All-World".into()),
        });
        let record = build_record("VWRL.L", &lookup, None);
        assert_eq!(record.original_currency, "USD");
        assert_eq!(record.instrument_type, InstrumentType::Other("ETF".into()));
        assert_eq!(record.name, "Vanguard FTSE All-World");
        assert_eq!(record.source, RecordSource::UserInput);

        let bare = build_record("XYZ", &Ok(AssetMetadata::default()), None);
        assert_eq!(bare.name, "XYZ");
        assert_eq!(bare.instrument_type, InstrumentType::Equity);
    }

    #[test]
    fn test_build_record_lowercase_currency_is_normalized() {
        let record = build_record("SAP.DE", &Ok(meta("eur", "equity", "SAP")), None);
        assert_eq!(record.original_currency, "EUR");
        assert_eq!(record.instrument_type, InstrumentType::Equity);
    }

    #[test]
    fn test_build_record_on_failure_falls_back() {
        let record = build_record("BAD", &Err("timeout".into()), None);
        assert_eq!(record.original_currency, "USD");
        assert_eq!(record.instrument_type, InstrumentType::Unknown);
        assert_eq!(record.name, "UNKNOWN");
    }

    #[test]
    fn test_risk_free_override_applies_even_when_lookup_fails() {
        let lookup = Ok(meta("USD", "INDEX", "13 WEEK TREASURY BILL"));
        let ok = build_record("^IRX", &lookup, Some("^IRX"));
        assert_eq!(ok.original_currency, "RATE");
        assert_eq!(ok.instrument_type, InstrumentType::Rate);
        assert_eq!(ok.name, "Risk-free Rate: 13 WEEK TREASURY BILL");

        let failed = build_record("^IRX", &Err("boom".into()), Some("^IRX"));
        assert_eq!(failed.original_currency, "RATE");
        assert_eq!(failed.instrument_type, InstrumentType::Rate);
        assert_eq!(failed.name, "Risk-free Rate: UNKNOWN");
    }

    #[test]
    fn test_fx_dependencies_skip_target_rate_and_unknown() {
        let records = vec![
            build_record("A", &Ok(meta("GBP", "EQUITY", "A")), None),
            build_record("B", &Ok(meta("UNKNOWN", "EQUITY", "B")), None),
            build_record("^IRX", &Ok(meta("USD", "INDEX", "T-Bill")), Some("^IRX")),
            build_record("C", &Ok(meta("JPY", "EQUITY", "C")), None),
        ];
        let fx = fx_dependencies(&records, &[], "GBP");
        assert_eq!(fx.len(), 1);
        assert_eq!(fx[0].ticker, "GBPJPY=X");
        assert_eq!(fx[0].name, "GBP/JPY Exchange Rate");
        assert_eq!(fx[0].original_currency, "JPY");
        assert_eq!(fx[0].instrument_type, InstrumentType::Currency);
        assert_eq!(fx[0].source, RecordSource::FxDependency);
    }

    #[tokio::test]
    async fn test_existing_fx_ticker_is_not_duplicated() {
        let provider = StaticProvider::new()
            .with_metadata("GBPUSD=X", meta("USD", "CURRENCY", "GBP/USD"))
            .with_metadata("SAP.DE", meta("EUR", "EQUITY", "SAP"));

        let analysis =
            analyze_tickers(&provider, &tickers(&["GBPUSD=X", "SAP.DE"]), "GBP", None).await;

        assert_eq!(analysis.tickers, tickers(&["GBPUSD=X", "SAP.DE", "GBPEUR=X"]));
        assert_eq!(analysis.records.len(), 3);
        assert_eq!(analysis.records[2].source, RecordSource::FxDependency);
        assert_eq!(
            analysis
                .tickers
                .iter()
                .filter(|t| t.as_str() == "GBPUSD=X")
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn test_fx_pairs_for_each_foreign_currency() {
        let provider = StaticProvider::new()
            .with_metadata("AAPL", meta("USD", "EQUITY", "Apple"))
            .with_metadata("SAP.DE", meta("EUR", "EQUITY", "SAP"))
            .with_metadata("VOD.L", meta("GBP", "EQUITY", "Vodafone"));

        let analysis = analyze_tickers(
            &provider,
            &tickers(&["AAPL", "SAP.DE", "VOD.L"]),
            "gbp",
            None,
        )
        .await;

        assert_eq!(
            analysis.tickers,
            tickers(&["AAPL", "SAP.DE", "VOD.L", "GBPEUR=X", "GBPUSD=X"])
        );
        assert!(analysis.tickers.iter().all(|t| t != "GBPGBP=X"));
    }

    #[tokio::test]
    async fn test_risk_free_ticker_is_appended_once() {
        let provider = StaticProvider::new()
            .with_metadata("AAPL", meta("USD", "EQUITY", "Apple"))
            .with_metadata("^IRX", meta("USD", "INDEX", "13 WEEK TREASURY BILL"));

        let analysis = analyze_tickers(&provider, &tickers(&["AAPL"]), "USD", Some("^IRX")).await;
        assert_eq!(analysis.tickers, tickers(&["AAPL", "^IRX"]));
        assert_eq!(analysis.records[1].original_currency, "RATE");
        assert_eq!(analysis.records[1].instrument_type, InstrumentType::Rate);

        let again =
            analyze_tickers(&provider, &tickers(&["AAPL", "^IRX"]), "USD", Some("^IRX")).await;
        assert_eq!(again.tickers, tickers(&["AAPL", "^IRX"]));
        assert!(again.records.iter().all(|r| r.source == RecordSource::UserInput));
    }

    #[tokio::test]
    async fn test_blank_risk_free_ticker_is_ignored() {
        let provider = StaticProvider::new().with_metadata("AAPL", meta("USD", "EQUITY", "Apple"));

        for blank in ["", "   "] {
            assert_eq!(with_risk_free(&tickers(&["AAPL"]), Some(blank)), tickers(&["AAPL"]));

            let analysis =
                analyze_tickers(&provider, &tickers(&["AAPL"]), "USD", Some(blank)).await;
            assert_eq!(analysis.tickers, tickers(&["AAPL"]));
            assert_eq!(analysis.records.len(), 1);
            assert_eq!(analysis.records[0].instrument_type, InstrumentType::Equity);
        }
    }

    #[test]
    fn test_risk_free_ticker_is_trimmed() {
        assert_eq!(normalize_risk_free(Some(" ^IRX ")), Some("^IRX"));
        assert_eq!(
            with_risk_free(&tickers(&["AAPL"]), Some(" ^IRX\t")),
            tickers(&["AAPL", "^IRX"])
        );
    }

    #[tokio::test]
    async fn test_metadata_failure_keeps_ticker_and_continues() {
        let provider = StaticProvider::new()
            .with_metadata("AAPL", meta("USD", "EQUITY", "Apple"))
            .with_metadata("SAP.DE", meta("EUR", "EQUITY", "SAP"));

        let analysis = analyze_tickers(
            &provider,
            &tickers(&["AAPL", "BROKEN", "SAP.DE"]),
            "USD",
            None,
        )
        .await;

        assert_eq!(analysis.tickers, tickers(&["AAPL", "BROKEN", "SAP.DE", "USDEUR=X"]));
        let broken = &analysis.records[1];
        assert_eq!(broken.ticker, "BROKEN");
        assert_eq!(broken.instrument_type, InstrumentType::Unknown);
        assert_eq!(broken.original_currency, "USD");
        assert_eq!(analysis.records[2].name, "SAP");
    }

    #[test]
    fn test_records_align_with_tickers() {
        let working = tickers(&["A", "B"]);
        let lookups = vec![Ok(meta("CHF", "EQUITY", "A")), Err("down".to_string())];
        let analysis = expand(working, &lookups, "USD", None);
        assert_eq!(analysis.tickers.len(), analysis.records.len());
        for (ticker, record) in analysis.tickers.iter().zip(&analysis.records) {
            assert_eq!(ticker, &record.ticker);
        }
        assert_eq!(analysis.tickers.last().map(String::as_str), Some("USDCHF=X"));
    }
}
