use super::ui;
use crate::fetcher::RateFetcher;
use crate::rate_provider::{CurrencyRatesProvider, RateMapping};
use anyhow::Result;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

fn timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

fn summarize(code: &str, rates: &Option<RateMapping>, targets: &[String]) -> String {
    match rates {
        Some(rates) => {
            let shown: Vec<String> = targets
                .iter()
                .filter_map(|t| rates.get(t).map(|r| format!("{t} {}", ui::format_rate(*r))))
                .collect();
            let mut line = format!("[{}] {code}:", timestamp());
            if !shown.is_empty() {
                line.push(' ');
                line.push_str(&shown.join(", "));
            }
            line.push_str(&format!(" ({} rates)", rates.len()));
            line
        }
        None => format!("[{}] {code}: no rates published", timestamp()),
    }
}

/// Interactive loop: every currency code typed on stdin re-targets the
/// fetcher; each published update and each fetch failure is printed as it
/// arrives.
pub async fn run(
    provider: Arc<dyn CurrencyRatesProvider>,
    code: &str,
    targets: &[String],
) -> Result<()> {
    let targets: Vec<String> = targets.iter().map(|t| t.to_lowercase()).collect();
    let fetcher = RateFetcher::new(provider);
    let mut rates_rx = fetcher.subscribe();
    let mut error_rx = fetcher.errors();

    println!(
        "{}",
        ui::style_text(
            "Type a currency code to switch, 'q' to quit.",
            ui::StyleType::Subtle
        )
    );

    let mut current = code.to_lowercase();
    fetcher.set(&current).await;

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        tokio::select! {
            changed = rates_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let rates = rates_rx.borrow_and_update().clone();
                println!("{}", summarize(&current, &rates, &targets));
            }
            changed = error_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let error = error_rx.borrow_and_update().clone();
                if let Some(error) = error {
                    println!(
                        "{}",
                        ui::style_text(&format!("[{}] {error}", timestamp()), ui::StyleType::Error)
                    );
                }
            }
            line = lines.next_line() => {
                match line? {
                    Some(line) => {
                        let input = line.trim().to_lowercase();
                        if input.is_empty() {
                            continue;
                        }
                        if input == "q" || input == "quit" {
                            break;
                        }
                        current = input;
                        fetcher.set(&current).await;
                    }
                    None => break,
                }
            }
        }
    }

    Ok(())
}
