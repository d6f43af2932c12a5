use super::DataStore;
use crate::core::metadata::AssetRecord;
use anyhow::{Context, Result};
use std::path::PathBuf;

pub const MANIFEST_FILE: &str = "data_manifest.csv";
const MANIFEST_HEADER: [&str; 5] = ["ticker", "name", "original_currency", "type", "source"];

impl DataStore {
    /// Overwrites the manifest in the raw data root.
    pub fn write_manifest(&self, records: &[AssetRecord]) -> Result<PathBuf> {
        if !records.is_empty() {
            return self.write_csv_raw(MANIFEST_FILE, records);
        }

        // serde only emits a header alongside the first row
        let path = self.raw_path(MANIFEST_FILE);
        std::fs::create_dir_all(self.raw_dir())
            .with_context(|| format!("Failed to create directory: {}", self.raw_dir().display()))?;
        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
        writer.write_record(MANIFEST_HEADER)?;
        writer.flush()?;
        Ok(path)
    }

    pub fn read_manifest(&self) -> Result<Vec<AssetRecord>> {
        self.read_csv_raw(MANIFEST_FILE)
    }
}
