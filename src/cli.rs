//! Command-line interface definitions.
//!
//! Every run performs a single handler invocation. Flags map onto the
//! invocation event (literal texts), the context (request id) and overrides
//! of the YAML configuration.

use crate::config::ScraperConfig;
use crate::models::{Context, Event, Source};
use clap::Parser;
use std::path::PathBuf;

/// Scrape the latest BCV and parallel-market dollar rates.
///
/// # Examples
///
/// ```sh
/// # Live scrape, response JSON on stdout
/// tg_exchange_rates
///
/// # Offline, against captured pages
/// tg_exchange_rates --fixture-dir ./testdata --pretty
///
/// # Extract from a message you already have
/// tg_exchange_rates --paralelo-text "💵 Bs. 38,09 🔺 0,35%"
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long, env = "TG_RATES_CONFIG")]
    pub config: Option<PathBuf>,

    /// Read `bcv.html` and `paralelo.html` from this directory instead of fetching
    #[arg(short, long)]
    pub fixture_dir: Option<PathBuf>,

    /// Extract the BCV rate from this text instead of scraping
    #[arg(long)]
    pub bcv_text: Option<String>,

    /// Extract the parallel-market rate from this text instead of scraping
    #[arg(long)]
    pub paralelo_text: Option<String>,

    /// Number of recent messages examined per source
    #[arg(short, long)]
    pub lookback: Option<usize>,

    /// Page fetch timeout in seconds
    #[arg(short, long)]
    pub timeout_secs: Option<u64>,

    /// Write the response JSON to this file instead of stdout
    #[arg(short, long)]
    pub json_output: Option<PathBuf>,

    /// Pretty-print the response JSON
    #[arg(short, long)]
    pub pretty: bool,

    /// Request id attached to log spans
    #[arg(long, env = "REQUEST_ID")]
    pub request_id: Option<String>,
}

impl Cli {
    /// Invocation event built from the literal text flags.
    pub fn event(&self) -> Event {
        let mut event = Event::default();
        for (source, text) in [
            (Source::Bcv, &self.bcv_text),
            (Source::Paralelo, &self.paralelo_text),
        ] {
            if let Some(text) = text {
                event.texts.insert(source, text.clone());
            }
        }
        event
    }

    pub fn context(&self) -> Context {
        Context {
            request_id: self.request_id.clone(),
        }
    }

    /// Apply command-line overrides on top of the file configuration.
    pub fn apply_overrides(&self, config: &mut ScraperConfig) {
        if let Some(lookback) = self.lookback {
            config.lookback = lookback;
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.timeout_secs = timeout_secs;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["tg_exchange_rates"]);
        assert!(cli.fixture_dir.is_none());
        assert!(cli.json_output.is_none());
        assert!(!cli.pretty);
        assert!(cli.event().texts.is_empty());
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "tg_exchange_rates",
            "-f",
            "./testdata",
            "-l",
            "4",
            "-t",
            "10",
            "-j",
            "/tmp/rates.json",
        ]);

        assert_eq!(cli.fixture_dir, Some(PathBuf::from("./testdata")));
        assert_eq!(cli.json_output, Some(PathBuf::from("/tmp/rates.json")));

        let mut config = ScraperConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.lookback, 4);
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_cli_text_flags_become_event() {
        let cli = Cli::parse_from([
            "tg_exchange_rates",
            "--paralelo-text",
            "💵 Bs. 38,09",
            "--request-id",
            "abc-123",
        ]);

        let event = cli.event();
        assert_eq!(
            event.texts.get(&Source::Paralelo).map(String::as_str),
            Some("💵 Bs. 38,09")
        );
        assert!(!event.texts.contains_key(&Source::Bcv));
        assert_eq!(cli.context().request_id.as_deref(), Some("abc-123"));
    }
}
