//! Request handler: one invocation looks up both rates and builds the
//! response envelope.
//!
//! The two sources are looked up concurrently and independently. A failure
//! for one source (unreachable page, no rate in the recent messages) only
//! turns that source's entry into `null`; the response is still `200`.

use crate::config::ScraperConfig;
use crate::errors::ScrapeError;
use crate::models::{Context, Event, ExchangeRate, Rates, Response, Source};
use crate::scrapers::MessageSource;
use crate::selector::{rate_from_text, select_rate};
use tracing::{error, info, instrument};

#[derive(Debug)]
pub struct Handler<S> {
    feed: S,
    config: ScraperConfig,
}

impl<S: MessageSource> Handler<S> {
    pub fn new(feed: S, config: ScraperConfig) -> Self {
        Self { feed, config }
    }

    /// Handle one invocation.
    ///
    /// Literal texts in `event` are extracted directly (no fetch, no
    /// lookback); the other sources are scraped.
    #[instrument(level = "info", skip_all, fields(request_id = ?context.request_id))]
    pub async fn handle(&self, event: &Event, context: &Context) -> Response {
        let text_for = |source: Source| event.texts.get(&source).map(String::as_str);

        let (bcv, paralelo) = futures::join!(
            self.lookup(Source::Bcv, text_for(Source::Bcv)),
            self.lookup(Source::Paralelo, text_for(Source::Paralelo)),
        );

        info!(
            bcv_found = bcv.is_some(),
            paralelo_found = paralelo.is_some(),
            "Invocation complete"
        );
        Response::ok(Rates { bcv, paralelo })
    }

    async fn lookup(&self, source: Source, text: Option<&str>) -> Option<ExchangeRate> {
        match self.rate_for(source, text).await {
            Ok(rate) => {
                info!(%source, rate = %rate.rate, origin = ?rate.origin, "Found rate");
                Some(rate)
            }
            Err(e) => {
                error!(%source, kind = e.kind(), error = %e, "No rate for source");
                None
            }
        }
    }

    /// Resolve the rate of one source.
    ///
    /// An empty `text` counts as absent and falls back to scraping.
    pub async fn rate_for(
        &self,
        source: Source,
        text: Option<&str>,
    ) -> Result<ExchangeRate, ScrapeError> {
        let anchor = &self.config.source(source).anchor;
        match text {
            Some(text) if !text.is_empty() => rate_from_text(text, anchor),
            _ => {
                let messages = self.feed.fetch_messages(source).await?;
                select_rate(&messages, anchor, self.config.lookback)
            }
        }
    }
}
