use super::ui;
use crate::core::download::{DownloadObserver, DownloadOutcome};
use crate::core::pipeline::{RunReport, RunRequest, run_pipeline};
use crate::core::provider::MarketDataProvider;
use crate::store::DataStore;
use anyhow::Result;
use comfy_table::Cell;
use indicatif::ProgressBar;

struct ProgressObserver {
    pb: Option<ProgressBar>,
}

impl DownloadObserver for ProgressObserver {
    fn started(&mut self, total: usize) {
        let pb = ui::new_progress_bar(total as u64, true);
        pb.set_message("Downloading prices...");
        self.pb = Some(pb);
    }

    fn finished(&mut self, ticker: &str, _outcome: &DownloadOutcome) {
        if let Some(pb) = &self.pb {
            pb.set_message(ticker.to_string());
            pb.inc(1);
        }
    }
}

impl RunReport {
    pub fn display_as_table(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Ticker"),
            ui::header_cell("Name"),
            ui::header_cell("Currency"),
            ui::header_cell("Type"),
            ui::header_cell("Source"),
            ui::header_cell("Prices"),
        ]);

        for record in &self.records {
            let failure = self
                .downloads
                .failures
                .iter()
                .find(|(ticker, _)| ticker == &record.ticker)
                .map(|(_, reason)| reason.as_str());
            table.add_row(vec![
                Cell::new(&record.ticker),
                Cell::new(&record.name),
                Cell::new(&record.original_currency),
                Cell::new(&record.instrument_type),
                ui::source_cell(record.source),
                ui::status_cell(failure),
            ]);
        }

        let mut output = format!(
            "{}\n\n{}",
            ui::style_text("Download summary", ui::StyleType::Title),
            table
        );
        output.push_str(&format!(
            "\n\n{}: {}   {}: {}",
            ui::style_text("Downloaded", ui::StyleType::TotalLabel),
            ui::style_text(&self.downloads.success.to_string(), ui::StyleType::TotalValue),
            ui::style_text("Failed", ui::StyleType::TotalLabel),
            ui::style_text(&self.downloads.failed.to_string(), ui::StyleType::Error),
        ));
        if let Some(manifest) = &self.manifest {
            output.push_str(&format!(
                "\n{}",
                ui::style_text(
                    &format!("Manifest: {}", manifest.display()),
                    ui::StyleType::Subtle
                )
            ));
        }
        output
    }
}

pub async fn run(
    provider: &dyn MarketDataProvider,
    store: &DataStore,
    request: &RunRequest,
) -> Result<RunReport> {
    let mut observer = ProgressObserver { pb: None };
    let report = run_pipeline(provider, store, request, &mut observer).await?;
    if let Some(pb) = observer.pb.take() {
        pb.finish_and_clear();
    }

    if report.is_empty() {
        println!(
            "{}",
            ui::style_text(
                &format!("No tickers processed from {}", request.input_file.display()),
                ui::StyleType::Error
            )
        );
    } else {
        println!("{}", report.display_as_table());
    }
    Ok(report)
}
