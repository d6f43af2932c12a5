//! CSV read/write helpers rooted at the raw and processed data directories.

pub mod manifest;

use crate::core::config::ProjectPaths;
use anyhow::{Context, Result};
use serde::{Serialize, de::DeserializeOwned};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct DataStore {
    raw_dir: PathBuf,
    processed_dir: PathBuf,
}

impl DataStore {
    pub fn new(raw_dir: impl Into<PathBuf>, processed_dir: impl Into<PathBuf>) -> Self {
        Self {
            raw_dir: raw_dir.into(),
            processed_dir: processed_dir.into(),
        }
    }

    pub fn from_paths(paths: &ProjectPaths) -> Self {
        Self::new(&paths.raw, &paths.processed)
    }

    pub fn raw_dir(&self) -> &Path {
        &self.raw_dir
    }

    pub fn raw_path(&self, file: impl AsRef<Path>) -> PathBuf {
        self.raw_dir.join(file)
    }

    pub fn processed_path(&self, file: impl AsRef<Path>) -> PathBuf {
        self.processed_dir.join(file)
    }

    pub fn read_csv_raw<T: DeserializeOwned>(&self, file: impl AsRef<Path>) -> Result<Vec<T>> {
        read_csv(&self.raw_path(file))
    }

    pub fn read_csv_processed<T: DeserializeOwned>(
        &self,
        file: impl AsRef<Path>,
    ) -> Result<Vec<T>> {
        read_csv(&self.processed_path(file))
    }

    pub fn write_csv_raw<T: Serialize>(
        &self,
        file: impl AsRef<Path>,
        rows: &[T],
    ) -> Result<PathBuf> {
        let path = self.raw_path(file);
        write_csv(&path, rows)?;
        Ok(path)
    }

    pub fn write_csv_processed<T: Serialize>(
        &self,
        file: impl AsRef<Path>,
        rows: &[T],
    ) -> Result<PathBuf> {
        let path = self.processed_path(file);
        write_csv(&path, rows)?;
        Ok(path)
    }
}

pub fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

    reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .with_context(|| format!("Failed to parse CSV file: {}", path.display()))
}

/// Writes `rows` with a header line, creating parent directories as needed.
/// An existing file is overwritten.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("Failed to write row to {}", path.display()))?;
    }
    writer.flush()?;
    debug!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}
