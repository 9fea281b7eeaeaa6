pub mod cli;
pub mod config;
pub mod fetcher;
pub mod log;
pub mod providers;
pub mod rate_provider;

use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Rates {
        code: Option<String>,
        targets: Vec<String>,
    },
    Convert {
        amount: f64,
        from: String,
        to: String,
    },
    Live {
        code: Option<String>,
        targets: Vec<String>,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Rate watcher starting...");

    let config = match config_path {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let base_url = config
        .providers
        .currency_api
        .as_ref()
        .map_or(providers::currency_api::DEFAULT_BASE_URL, |p| &p.base_url);
    let provider = providers::currency_api::CurrencyApiProvider::new(base_url);

    match command {
        AppCommand::Rates { code, targets } => {
            let code = code.unwrap_or_else(|| config.currency.clone());
            cli::rates::run(&provider, &code, &targets).await
        }
        AppCommand::Convert { amount, from, to } => {
            cli::convert::run(&provider, amount, &from, &to).await
        }
        AppCommand::Live { code, targets } => {
            let code = code.unwrap_or_else(|| config.currency.clone());
            cli::live::run(Arc::new(provider), &code, &targets).await
        }
    }
}
