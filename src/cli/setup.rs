use crate::core::config::AppConfig;
use anyhow::{Context, Result, bail};
use std::path::Path;
use tracing::info;

const EXAMPLE_CONFIG: &str = include_str!("../../docs/example_config.yaml");

/// Writes the example config to the platform config directory.
pub fn setup() -> Result<()> {
    write_example_config(&AppConfig::default_config_path()?)
}

/// Writes the example config to `path`, refusing to replace an existing file.
pub fn write_example_config(path: &Path) -> Result<()> {
    if path.exists() {
        bail!(
            "Configuration file already exists at {}; remove it first to regenerate",
            path.display()
        );
    }

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create config directory {}", dir.display()))?;
    }
    std::fs::write(path, EXAMPLE_CONFIG)
        .with_context(|| format!("Cannot write config to {}", path.display()))?;

    info!("Wrote example configuration to {}", path.display());
    Ok(())
}
