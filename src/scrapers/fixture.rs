//! Offline message source.
//!
//! Serves captured preview pages or ready-made messages instead of hitting
//! Telegram. Used by tests and by the `--fixture-dir` CLI flag, where the
//! directory holds `bcv.html` and `paralelo.html`.

use crate::config::MarkupConfig;
use crate::errors::ScrapeError;
use crate::models::{RawMessage, Source};
use crate::scrapers::MessageSource;
use crate::scrapers::telegram::{MarkupSelectors, parse_channel};
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, instrument};

#[derive(Debug, Clone)]
enum Fixture {
    Markup(String),
    File(PathBuf),
    Messages(Vec<RawMessage>),
}

#[derive(Debug, Clone)]
pub struct FixtureSource {
    fixtures: BTreeMap<Source, Fixture>,
    selectors: MarkupSelectors,
}

impl FixtureSource {
    /// An empty source; every lookup fails until fixtures are registered.
    pub fn new(markup: &MarkupConfig) -> Result<Self, ScrapeError> {
        Ok(Self {
            fixtures: BTreeMap::new(),
            selectors: MarkupSelectors::new(markup)?,
        })
    }

    /// Serve `<dir>/<source>.html` for every source. Files are read on fetch.
    pub fn from_dir(dir: &Path, markup: &MarkupConfig) -> Result<Self, ScrapeError> {
        let mut fixture = Self::new(markup)?;
        for source in Source::ALL {
            let path = dir.join(format!("{source}.html"));
            fixture.fixtures.insert(source, Fixture::File(path));
        }
        Ok(fixture)
    }

    /// Serve raw preview markup for `source`.
    pub fn with_markup(mut self, source: Source, html: impl Into<String>) -> Self {
        self.fixtures.insert(source, Fixture::Markup(html.into()));
        self
    }

    /// Serve already-parsed messages (most recent first) for `source`.
    pub fn with_messages(mut self, source: Source, messages: Vec<RawMessage>) -> Self {
        self.fixtures.insert(source, Fixture::Messages(messages));
        self
    }
}

impl MessageSource for FixtureSource {
    #[instrument(level = "debug", skip(self))]
    async fn fetch_messages(&self, source: Source) -> Result<Vec<RawMessage>, ScrapeError> {
        match self.fixtures.get(&source) {
            Some(Fixture::Markup(html)) => Ok(parse_channel(html, &self.selectors)),
            Some(Fixture::Messages(messages)) => Ok(messages.clone()),
            Some(Fixture::File(path)) => {
                let html = fs::read_to_string(path)
                    .await
                    .map_err(|e| ScrapeError::Fixture {
                        path: path.clone(),
                        source: e,
                    })?;
                debug!(path = %path.display(), bytes = html.len(), "Read fixture page");
                Ok(parse_channel(&html, &self.selectors))
            }
            None => Err(ScrapeError::Fixture {
                path: PathBuf::from(format!("{source}.html")),
                source: io::Error::new(io::ErrorKind::NotFound, "no fixture registered"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARALELO_PAGE: &str = include_str!("../../testdata/paralelo.html");

    #[tokio::test]
    async fn test_markup_fixture_is_parsed() {
        let source = FixtureSource::new(&MarkupConfig::default())
            .unwrap()
            .with_markup(Source::Paralelo, PARALELO_PAGE);
        let messages = source.fetch_messages(Source::Paralelo).await.unwrap();
        assert_eq!(messages.len(), 4);
    }

    #[tokio::test]
    async fn test_message_fixture_is_served_as_is() {
        let messages = vec![RawMessage::new("bs. 38,01", None)];
        let source = FixtureSource::new(&MarkupConfig::default())
            .unwrap()
            .with_messages(Source::Bcv, messages.clone());
        assert_eq!(source.fetch_messages(Source::Bcv).await.unwrap(), messages);
    }

    #[tokio::test]
    async fn test_unregistered_source_fails() {
        let source = FixtureSource::new(&MarkupConfig::default()).unwrap();
        assert!(matches!(
            source.fetch_messages(Source::Bcv).await,
            Err(ScrapeError::Fixture { .. })
        ));
    }

    #[tokio::test]
    async fn test_from_dir_reads_source_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("paralelo.html"), PARALELO_PAGE).unwrap();

        let source = FixtureSource::from_dir(dir.path(), &MarkupConfig::default()).unwrap();
        let messages = source.fetch_messages(Source::Paralelo).await.unwrap();
        assert_eq!(messages.len(), 4);

        match source.fetch_messages(Source::Bcv).await {
            Err(ScrapeError::Fixture { path, .. }) => {
                assert_eq!(path, dir.path().join("bcv.html"))
            }
            other => panic!("expected missing fixture, got {other:?}"),
        }
    }
}
