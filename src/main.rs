//! # tg_exchange_rates
//!
//! Scrapes the latest Venezuelan dollar exchange rates from two public
//! Telegram channels and prints them as a JSON response envelope.
//!
//! ## Sources
//!
//! - **bcv**: the official central-bank closing rate, announced by `Alertas24`
//! - **paralelo**: the parallel-market rate, posted by `enparalelovzlatelegram`
//!
//! ## Usage
//!
//! ```sh
//! tg_exchange_rates --pretty
//! tg_exchange_rates --fixture-dir ./testdata -j ./out/rates.json
//! ```
//!
//! ## Architecture
//!
//! 1. **Retrieval**: fetch each channel's web preview (or a captured fixture)
//! 2. **Parsing**: turn the preview markup into messages, most recent first
//! 3. **Selection**: walk the most recent messages until one yields a rate
//! 4. **Output**: shape both results into a `200` response, `null` for misses

use clap::Parser;
use std::error::Error;
use tracing::{debug, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod errors;
mod extract;
mod handler;
mod models;
mod outputs;
mod scrapers;
mod selector;
mod utils;

use cli::Cli;
use config::ScraperConfig;
use handler::Handler;
use outputs::json;
use scrapers::{FixtureSource, TelegramSource};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    // Logs go to stderr; stdout carries only the response.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("tg_exchange_rates starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // ---- Configuration ----
    let mut config = ScraperConfig::load(args.config.as_deref()).await?;
    args.apply_overrides(&mut config);
    config.validate()?;

    let event = args.event();
    let context = args.context();

    // ---- Invocation ----
    let response = match &args.fixture_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "Serving channel pages from fixtures");
            let feed = FixtureSource::from_dir(dir, &config.markup)?;
            Handler::new(feed, config).handle(&event, &context).await
        }
        None => {
            let feed = TelegramSource::new(config.clone())?;
            Handler::new(feed, config).handle(&event, &context).await
        }
    };

    // ---- Output ----
    match &args.json_output {
        Some(path) => json::write_response(&response, path, args.pretty).await?,
        None => println!("{}", json::to_json(&response, args.pretty)?),
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        millis = elapsed.as_millis() as u64,
        "Execution complete"
    );

    Ok(())
}
