use super::ui;
use crate::rate_provider::CurrencyRatesProvider;
use anyhow::{Result, bail};

pub async fn run(
    provider: &(dyn CurrencyRatesProvider + Send + Sync),
    amount: f64,
    from: &str,
    to: &str,
) -> Result<()> {
    // Codes are lowercased here at the UI edge; the provider forwards them
    // verbatim.
    let from = from.to_lowercase();
    let to = to.to_lowercase();

    let pb = ui::new_spinner(&format!("Fetching rates for {from}..."));
    let rates = provider.fetch_rates(&from).await;
    pb.finish_and_clear();

    let Some(rates) = rates? else {
        bail!("No rates published for currency '{from}'");
    };

    let Some(rate) = rates.get(&to) else {
        bail!("No rate from '{from}' to '{to}'");
    };

    let converted = amount * rate;
    println!(
        "{amount} {from} = {} {to}",
        ui::style_text(&format!("{converted:.2}"), ui::StyleType::Value)
    );
    println!(
        "{}",
        ui::style_text(
            &format!("1 {from} = {} {to}", ui::format_rate(*rate)),
            ui::StyleType::Subtle
        )
    );
    Ok(())
}
