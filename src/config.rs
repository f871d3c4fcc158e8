//! Scraper configuration.
//!
//! Channel names, search queries, markup class names and limits live here
//! instead of being hardcoded in the scraper, so tests and offline runs can
//! point the scraper at a mock server or captured pages.
//!
//! Configuration is read from an optional YAML file. Every top-level key is
//! optional; missing keys fall back to [`ScraperConfig::default`].
//!
//! ```yaml
//! base_url: "https://t.me/s/"
//! lookback: 5
//! timeout_secs: 30
//! paralelo:
//!   channel: enparalelovzlatelegram
//!   query: "% Bs "
//!   anchor: "bs. "
//! ```

use crate::errors::ScrapeError;
use crate::models::Source;
use crate::selector::DEFAULT_LOOKBACK;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

/// Where a source's messages live and how to find the rate in them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SourceConfig {
    /// Public channel username, e.g. `Alertas24`.
    pub channel: String,
    /// Search query narrowing the channel preview to rate announcements.
    pub query: String,
    /// Substring marking where the rate starts inside a message.
    #[serde(default = "default_anchor")]
    pub anchor: String,
}

fn default_anchor() -> String {
    "bs. ".to_string()
}

/// CSS class names of the channel preview markup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MarkupConfig {
    /// Wrapper of a single message.
    pub bubble_class: String,
    /// Message body inside a bubble.
    pub text_class: String,
    /// Photo link inside a bubble; its `href` is the preferred origin.
    pub photo_class: String,
    /// Post date link, used as origin for messages without a photo.
    pub date_class: String,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            bubble_class: "tgme_widget_message_bubble".to_string(),
            text_class: "tgme_widget_message_text".to_string(),
            photo_class: "tgme_widget_message_photo_wrap".to_string(),
            date_class: "tgme_widget_message_date".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Prefix of channel preview pages; the channel name is appended.
    pub base_url: String,
    /// Number of recent messages examined per source.
    pub lookback: usize,
    /// Page fetch timeout in seconds.
    pub timeout_secs: u64,
    pub markup: MarkupConfig,
    pub bcv: SourceConfig,
    pub paralelo: SourceConfig,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: "https://t.me/s/".to_string(),
            lookback: DEFAULT_LOOKBACK,
            timeout_secs: 30,
            markup: MarkupConfig::default(),
            bcv: SourceConfig {
                channel: "Alertas24".to_string(),
                query: "dólar oficial cierra la jornada".to_string(),
                anchor: default_anchor(),
            },
            paralelo: SourceConfig {
                channel: "enparalelovzlatelegram".to_string(),
                query: "% Bs ".to_string(),
                anchor: default_anchor(),
            },
        }
    }
}

impl ScraperConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ScrapeError> {
        let config: ScraperConfig =
            serde_yaml::from_str(yaml).map_err(|e| ScrapeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path`, or use defaults when no path is given.
    #[instrument(level = "info")]
    pub async fn load(path: Option<&Path>) -> Result<Self, ScrapeError> {
        let Some(path) = path else {
            info!("No config file given; using defaults");
            return Ok(Self::default());
        };
        let yaml = fs::read_to_string(path)
            .await
            .map_err(|e| ScrapeError::Config(format!("{}: {e}", path.display())))?;
        let config = Self::from_yaml_str(&yaml)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn source(&self, source: Source) -> &SourceConfig {
        match source {
            Source::Bcv => &self.bcv,
            Source::Paralelo => &self.paralelo,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Build the preview page URL for `source`: `{base_url}{channel}?q={query}`.
    ///
    /// The query is form-encoded, so `% Bs ` becomes `%25+Bs+`.
    pub fn page_url(&self, source: Source) -> Result<Url, ScrapeError> {
        let mut base = self.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base = Url::parse(&base).map_err(|e| ScrapeError::Config(format!("base_url: {e}")))?;

        let source_config = self.source(source);
        let mut url = base
            .join(&source_config.channel)
            .map_err(|e| ScrapeError::Config(format!("{source} channel: {e}")))?;
        url.query_pairs_mut().append_pair("q", &source_config.query);
        Ok(url)
    }

    pub fn validate(&self) -> Result<(), ScrapeError> {
        if self.lookback == 0 {
            return Err(ScrapeError::Config("lookback must be at least 1".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(ScrapeError::Config("timeout_secs must be at least 1".to_string()));
        }
        for source in Source::ALL {
            if self.source(source).channel.trim().is_empty() {
                return Err(ScrapeError::Config(format!("{source} channel is empty")));
            }
            self.page_url(source)?;
        }
        Ok(())
    }
}
