pub mod download;
pub mod setup;
pub mod tickers;
pub mod ui;
