//! Asset metadata as returned by providers and as recorded in the manifest

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Currency marker for the designated risk-free rate instrument.
pub const RATE_CURRENCY: &str = "RATE";
/// Placeholder for a currency or name that could not be determined.
pub const UNKNOWN: &str = "UNKNOWN";
/// Currency assumed when a provider does not report one.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Raw metadata fields for a ticker, exactly as the provider reported them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetMetadata {
    pub currency: Option<String>,
    pub quote_type: Option<String>,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InstrumentType {
    Equity,
    Rate,
    Currency,
    Unknown,
    Other(String),
}

impl Display for InstrumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                InstrumentType::Equity => "EQUITY",
                InstrumentType::Rate => "RATE",
                InstrumentType::Currency => "CURRENCY",
                InstrumentType::Unknown => UNKNOWN,
                InstrumentType::Other(other) => other.as_str(),
            }
        )
    }
}

impl From<String> for InstrumentType {
    fn from(value: String) -> Self {
        match value.to_uppercase().as_str() {
            "EQUITY" => InstrumentType::Equity,
            "RATE" => InstrumentType::Rate,
            "CURRENCY" => InstrumentType::Currency,
            UNKNOWN => InstrumentType::Unknown,
            other => InstrumentType::Other(other.to_string()),
        }
    }
}

impl From<InstrumentType> for String {
    fn from(value: InstrumentType) -> Self {
        value.to_string()
    }
}

/// Why a ticker ended up in the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordSource {
    #[serde(rename = "user_input")]
    UserInput,
    #[serde(rename = "FX_dependency")]
    FxDependency,
}

impl Display for RecordSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordSource::UserInput => write!(f, "user_input"),
            RecordSource::FxDependency => write!(f, "FX_dependency"),
        }
    }
}

/// One manifest row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub ticker: String,
    pub name: String,
    pub original_currency: String,
    #[serde(rename = "type")]
    pub instrument_type: InstrumentType,
    pub source: RecordSource,
}
