use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, CommandFactory, Parser, Subcommand};
use tickerprep::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Clone)]
struct TickerOpts {
    /// Target currency for the portfolio (e.g. GBP)
    #[arg(long)]
    currency: Option<String>,

    /// Ticker treated as the risk-free rate (e.g. ^IRX)
    #[arg(long)]
    risk_free: Option<String>,

    /// Ticker list file, relative to the project root
    #[arg(short, long)]
    input: Option<String>,
}

impl From<TickerOpts> for tickerprep::TickerArgs {
    fn from(opts: TickerOpts) -> Self {
        tickerprep::TickerArgs {
            currency: opts.currency,
            risk_free: opts.risk_free,
            input: opts.input,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Show the ticker list expanded with FX dependencies
    Tickers {
        #[command(flatten)]
        opts: TickerOpts,
    },
    /// Download price history for every ticker and write the manifest
    Download {
        /// First day of the range (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,

        /// Day after the last one to include (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,

        #[command(flatten)]
        opts: TickerOpts,
    },
}

impl From<Commands> for tickerprep::AppCommand {
    fn from(cmd: Commands) -> tickerprep::AppCommand {
        match cmd {
            Commands::Tickers { opts } => tickerprep::AppCommand::Tickers(opts.into()),
            Commands::Download { start, end, opts } => tickerprep::AppCommand::Download {
                start,
                end,
                tickers: opts.into(),
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => tickerprep::cli::setup::setup(),
        Some(cmd) => tickerprep::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
