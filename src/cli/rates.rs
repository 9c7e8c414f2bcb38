use super::ui;
use crate::core::{Fetched, Rate, RateError, RateProvider};
use anyhow::{Context, Result};
use comfy_table::Cell;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Span {
    Last,
    History,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

pub fn display_as_table(title: &str, rates: &[Rate]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("#"),
        ui::header_cell("Date"),
        ui::header_cell("Currency"),
        ui::header_cell("Value"),
    ]);

    for (index, rate) in rates.iter().enumerate() {
        table.add_row(vec![
            ui::value_cell(&(index + 1).to_string()),
            Cell::new(rate.date()),
            Cell::new(rate.currency()),
            ui::value_cell(&rate.value().to_string()),
        ]);
    }

    format!(
        "{}\n\n{}",
        ui::style_text(title, ui::StyleType::Title),
        table
    )
}

pub fn display_errors(errors: &[RateError]) -> String {
    errors
        .iter()
        .map(|e| ui::style_text(&format!("error: {e}"), ui::StyleType::Error))
        .collect::<Vec<_>>()
        .join("\n")
}

pub async fn run(provider: &dyn RateProvider, span: Span, format: OutputFormat) -> Result<()> {
    let name = provider.name();
    let pb = ui::new_spinner(&format!("Fetching rates from {name}..."));
    let Fetched { rates, errors } = match span {
        Span::Last => provider.fetch_last().await,
        Span::History => provider.fetch_history().await,
    };
    pb.finish_and_clear();
    info!(rates = rates.len(), errors = errors.len(), "Fetched rates");

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&rates).context("serializing rates")?;
            println!("{json}");
        }
        OutputFormat::Table => {
            let title = match span {
                Span::Last => format!("{name} exchange rates for today"),
                Span::History => format!("{name} historical exchange rates"),
            };
            if rates.is_empty() {
                println!("{}", ui::style_text("No rates fetched", ui::StyleType::Subtle));
            } else {
                println!("{}", display_as_table(&title, &rates));
            }
        }
    }

    if !errors.is_empty() {
        for e in &errors {
            warn!(provider = e.provider(), error = %e, "Provider reported an error");
        }
        eprintln!("{}", display_errors(&errors));
        if rates.is_empty() {
            anyhow::bail!("No rates fetched; {} provider error(s)", errors.len());
        }
    }

    Ok(())
}
