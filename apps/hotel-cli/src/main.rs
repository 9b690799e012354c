//! # Hotel POS command line
//!
//! Front-desk operations over the configured store.
//!
//! ```text
//! hotel restock Burger 20
//! hotel order Burger 3 --user desk
//! hotel report --json
//! hotel rollover --confirm
//! ```

mod cli;
mod commands;
mod config;
mod output;

use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::commands::CliError;
use crate::config::AppConfig;

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    match run(&cli).await {
        Ok(rendered) if cli.json => match serde_json::to_string_pretty(&rendered.json) {
            Ok(text) => println!("{}", text),
            Err(e) => fail(&CliError::from(e)),
        },
        Ok(rendered) => print!("{}", rendered.text),
        Err(e) => fail(&e),
    }
}

async fn run(cli: &Cli) -> Result<commands::Rendered, CliError> {
    // An explicit --config must load; the platform default may fall back.
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(Some(path.clone()))?,
        None => AppConfig::load_or_default(None),
    };
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }

    let store = commands::open_store(&config).await?;
    commands::execute(cli, &config, store, Utc::now()).await
}

fn fail(error: &CliError) -> ! {
    eprintln!("Error: {}", error);
    std::process::exit(1);
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=hotel_db=trace` - Show trace for the persistence crate only
/// - Default: `info,hotel=debug,sqlx=warn`
///
/// Logs go to stderr so `--json` output stays machine-readable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hotel=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
