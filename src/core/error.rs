use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// Conditions that stop a run before any ticker is processed.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("ticker file not found at {}", .0.display())]
    TickerFileNotFound(PathBuf),

    #[error("invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
}
