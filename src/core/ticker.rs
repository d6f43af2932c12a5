//! Ticker list file parsing

use crate::core::error::PipelineError;
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::Path;

/// Reads a newline-delimited ticker file.
///
/// Anything after `#` on a line is a comment. Lines are trimmed, blanks are
/// dropped, and the result is de-duplicated and sorted (case-sensitive).
/// A missing file yields [`PipelineError::TickerFileNotFound`].
pub fn parse_tickers(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(PipelineError::TickerFileNotFound(path.to_path_buf()).into());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read ticker file: {}", path.display()))?;

    Ok(parse_ticker_lines(&content))
}

pub fn parse_ticker_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| {
            let ticker = line.split('#').next().unwrap_or_default().trim();
            (!ticker.is_empty()).then(|| ticker.to_string())
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
