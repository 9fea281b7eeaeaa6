use super::ui;
use crate::rate_provider::{CurrencyRatesProvider, RateMapping};
use anyhow::Result;
use comfy_table::Cell;

fn display_as_table(code: &str, rates: &RateMapping, targets: &[String]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Currency"), ui::header_cell("Rate")]);

    let mut entries: Vec<(&String, &f64)> = if targets.is_empty() {
        rates.iter().collect()
    } else {
        targets
            .iter()
            .filter_map(|t| rates.get_key_value(t))
            .collect()
    };
    entries.sort_by(|a, b| a.0.cmp(b.0));

    for (currency, rate) in &entries {
        table.add_row(vec![Cell::new(currency), ui::rate_cell(**rate)]);
    }

    let mut output = format!(
        "Rates for 1 {} ({} currencies)\n\n",
        ui::style_text(code, ui::StyleType::Title),
        entries.len()
    );
    output.push_str(&table.to_string());
    output
}

pub async fn run(
    provider: &(dyn CurrencyRatesProvider + Send + Sync),
    code: &str,
    targets: &[String],
) -> Result<()> {
    let pb = ui::new_spinner(&format!("Fetching rates for {code}..."));
    let rates = provider.fetch_rates(code).await;
    pb.finish_and_clear();

    match rates? {
        Some(rates) => {
            let targets: Vec<String> = targets.iter().map(|t| t.to_lowercase()).collect();
            println!("{}", display_as_table(code, &rates, &targets));
        }
        None => {
            println!(
                "{}",
                ui::style_text(
                    &format!("No rates published for '{code}'"),
                    ui::StyleType::Error
                )
            );
        }
    }
    Ok(())
}
