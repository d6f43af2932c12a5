use super::ui;
use crate::core::analysis::TickerAnalysis;
use crate::core::pipeline::analyze_file;
use crate::core::provider::MarketDataProvider;
use anyhow::Result;
use comfy_table::Cell;
use std::path::Path;

impl TickerAnalysis {
    pub fn display_as_table(&self, target_currency: &str) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Ticker"),
            ui::header_cell("Name"),
            ui::header_cell("Currency"),
            ui::header_cell("Type"),
            ui::header_cell("Source"),
        ]);

        for record in &self.records {
            table.add_row(vec![
                Cell::new(&record.ticker),
                Cell::new(&record.name),
                Cell::new(&record.original_currency),
                Cell::new(&record.instrument_type),
                ui::source_cell(record.source),
            ]);
        }

        format!(
            "Assets ({} → {}):\n\n{}",
            ui::style_text(&self.tickers.len().to_string(), ui::StyleType::TotalLabel),
            ui::style_text(&target_currency.to_uppercase(), ui::StyleType::Title),
            table
        )
    }
}

/// Shows the expanded ticker list without downloading anything.
pub async fn run(
    provider: &dyn MarketDataProvider,
    input_file: &Path,
    target_currency: &str,
    risk_free_ticker: Option<&str>,
) -> Result<()> {
    let pb = ui::new_spinner("Looking up tickers...");
    let analysis = analyze_file(provider, input_file, target_currency, risk_free_ticker).await?;
    pb.finish_and_clear();

    match analysis {
        Some(analysis) => println!("{}", analysis.display_as_table(target_currency)),
        None => println!(
            "{}",
            ui::style_text(
                &format!("No ticker file found at {}", input_file.display()),
                ui::StyleType::Error
            )
        ),
    }
    Ok(())
}
