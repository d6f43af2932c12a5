use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

pub const DEFAULT_YAHOO_URL: &str = "https://query1.finance.yahoo.com";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct YahooProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub yahoo: Option<YahooProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            yahoo: Some(YahooProviderConfig {
                base_url: DEFAULT_YAHOO_URL.to_string(),
            }),
        }
    }
}

fn default_currency() -> String {
    "GBP".to_string()
}

fn default_input_file() -> String {
    "tickers.txt".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Target currency every asset is converted into.
    #[serde(default = "default_currency")]
    pub currency: String,
    pub risk_free_ticker: Option<String>,
    #[serde(default = "default_input_file")]
    pub input_file: String,
    pub project_root: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            providers: ProvidersConfig::default(),
            currency: default_currency(),
            risk_free_ticker: None,
            input_file: default_input_file(),
            project_root: None,
        }
    }
}

impl AppConfig {
    /// Loads the default config file, falling back to defaults when it does
    /// not exist yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "tickerprep", "tickerprep")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn yahoo_base_url(&self) -> &str {
        self.providers
            .yahoo
            .as_ref()
            .map_or(DEFAULT_YAHOO_URL, |p| &p.base_url)
    }

    pub fn project_root(&self) -> Result<PathBuf> {
        match &self.project_root {
            Some(root) => Ok(PathBuf::from(root)),
            None => std::env::current_dir().context("Could not determine current directory"),
        }
    }
}

/// Filesystem locations of the project's logical directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    pub root: PathBuf,
    pub raw: PathBuf,
    pub processed: PathBuf,
    pub notebooks: PathBuf,
    pub reports: PathBuf,
    pub figures: PathBuf,
    pub misc: PathBuf,
}

impl ProjectPaths {
    /// Resolves paths from the process environment after loading `<root>/.env`.
    pub fn from_env(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        match dotenvy::from_path(root.join(".env")) {
            Ok(()) => debug!("Loaded environment from {}", root.join(".env").display()),
            Err(e) => debug!("No .env loaded: {e}"),
        }
        Self::resolve_with(root, |key| std::env::var(key).ok())
    }

    /// Resolves paths using `lookup` for the override variables. Relative
    /// values are joined onto `root`; absolute values replace it. A variable
    /// that is set but empty resolves to `root` itself.
    pub fn resolve_with(
        root: impl Into<PathBuf>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let root = root.into();
        let dir = |key: &str, default: &str| match lookup(key) {
            Some(value) => root.join(value),
            None => root.join(default),
        };

        ProjectPaths {
            raw: dir("RAW_PATH", "data/raw"),
            processed: dir("PROCESSED_PATH", "data/processed"),
            notebooks: dir("NOTEBOOKS_PATH", "notebooks"),
            reports: dir("REPORTS_PATH", "reports"),
            figures: dir("FIGURES_PATH", "reports/figures"),
            misc: dir("MISC", "misc"),
            root,
        }
    }

    /// Resolves a user-supplied file name against the project root.
    pub fn in_root(&self, file: impl AsRef<Path>) -> PathBuf {
        self.root.join(file)
    }
}
