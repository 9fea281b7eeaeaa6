use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fxr::log::init_logging;

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

impl From<Commands> for fxr::AppCommand {
    fn from(cmd: Commands) -> fxr::AppCommand {
        match cmd {
            Commands::Rates { code, targets } => fxr::AppCommand::Rates { code, targets },
            Commands::Convert { amount, from, to } => fxr::AppCommand::Convert { amount, from, to },
            Commands::Live { code, targets } => fxr::AppCommand::Live { code, targets },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display the day's rates for a currency
    Rates {
        /// Base currency code (defaults to the configured currency)
        code: Option<String>,
        /// Show only these target currencies
        targets: Vec<String>,
    },
    /// Convert an amount between two currencies
    Convert {
        amount: f64,
        from: String,
        to: String,
    },
    /// Watch rates interactively; type currency codes on stdin to switch
    Live {
        /// Initial base currency code (defaults to the configured currency)
        code: Option<String>,
        /// Show these target currencies with every update
        targets: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => fxr::run_command(cmd.into(), cli.config_path.as_deref()).await,
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

fn setup() -> anyhow::Result<()> {
    use anyhow::Context;

    let path = fxr::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
providers:
  currency_api:
    base_url: "https://cdn.jsdelivr.net/npm/@fawazahmed0/currency-api@latest/v1"

currency: "usd"
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
