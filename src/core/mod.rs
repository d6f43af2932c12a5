//! Core business logic and abstractions

pub mod analysis;
pub mod config;
pub mod download;
pub mod error;
pub mod log;
pub mod metadata;
pub mod pipeline;
pub mod price;
pub mod provider;
pub mod ticker;

#[cfg(test)]
pub(crate) mod testing;

// Re-export main types for cleaner imports
pub use error::PipelineError;
pub use metadata::{AssetMetadata, AssetRecord, InstrumentType, RecordSource};
pub use price::PriceBar;
pub use provider::MarketDataProvider;
