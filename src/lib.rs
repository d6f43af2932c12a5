pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::analysis::normalize_risk_free;
use crate::core::config::{AppConfig, ProjectPaths};
use crate::core::pipeline::RunRequest;
use crate::providers::YahooFinanceProvider;
use crate::store::DataStore;
use anyhow::Result;
use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::{debug, info};

/// Ticker selection shared by every command. `None` falls back to config.
#[derive(Debug, Clone, Default)]
pub struct TickerArgs {
    pub currency: Option<String>,
    pub risk_free: Option<String>,
    pub input: Option<String>,
}

#[derive(Debug, Clone)]
pub enum AppCommand {
    Tickers(TickerArgs),
    Download {
        start: NaiveDate,
        end: NaiveDate,
        tickers: TickerArgs,
    },
}

impl TickerArgs {
    fn target_currency(&self, config: &AppConfig) -> String {
        self.currency
            .as_deref()
            .unwrap_or(&config.currency)
            .to_uppercase()
    }

    fn risk_free_ticker(&self, config: &AppConfig) -> Option<String> {
        let ticker = self
            .risk_free
            .as_deref()
            .or(config.risk_free_ticker.as_deref());
        normalize_risk_free(ticker).map(str::to_string)
    }

    fn input_file(&self, config: &AppConfig, paths: &ProjectPaths) -> PathBuf {
        paths.in_root(self.input.as_deref().unwrap_or(&config.input_file))
    }
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("tickerprep starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let paths = ProjectPaths::from_env(config.project_root()?);
    debug!("Resolved paths: {paths:#?}");

    let provider = YahooFinanceProvider::new(config.yahoo_base_url())?;

    match command {
        AppCommand::Tickers(args) => {
            cli::tickers::run(
                &provider,
                &args.input_file(&config, &paths),
                &args.target_currency(&config),
                args.risk_free_ticker(&config).as_deref(),
            )
            .await
        }
        AppCommand::Download {
            start,
            end,
            tickers,
        } => {
            let request = RunRequest {
                start,
                end,
                target_currency: tickers.target_currency(&config),
                risk_free_ticker: tickers.risk_free_ticker(&config),
                input_file: tickers.input_file(&config, &paths),
            };
            let store = DataStore::from_paths(&paths);
            cli::download::run(&provider, &store, &request).await?;
            Ok(())
        }
    }
}
