//! Telegram channel preview scraper.
//!
//! Public channels expose a read-only web preview at
//! `https://t.me/s/<channel>?q=<query>`, listing matching posts oldest first.
//! Each post is a `div.tgme_widget_message_bubble` holding the message body
//! (`div.tgme_widget_message_text`) and links to the post. The class names
//! come from [`MarkupConfig`] so a layout change only needs a config update.

use crate::config::{MarkupConfig, ScraperConfig};
use crate::errors::ScrapeError;
use crate::models::{RawMessage, Source};
use crate::scrapers::MessageSource;
use reqwest::{Client, StatusCode};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument};
use url::Url;

/// Compiled selectors for the preview markup.
#[derive(Debug, Clone)]
pub struct MarkupSelectors {
    bubble: Selector,
    text: Selector,
    photo: Selector,
    date: Selector,
}

impl MarkupSelectors {
    pub fn new(markup: &MarkupConfig) -> Result<Self, ScrapeError> {
        Ok(Self {
            bubble: class_selector("div", &markup.bubble_class)?,
            text: class_selector("div", &markup.text_class)?,
            photo: class_selector("a", &markup.photo_class)?,
            date: class_selector("a", &markup.date_class)?,
        })
    }
}

fn class_selector(tag: &str, class: &str) -> Result<Selector, ScrapeError> {
    let css = format!("{tag}.{class}");
    Selector::parse(&css).map_err(|e| ScrapeError::Markup(format!("{css}: {e}")))
}

/// Parse a channel preview page into messages, most recent first.
///
/// Bubbles without a text body (stickers, service posts) are skipped. The
/// origin is the photo link when present, otherwise the post date link.
pub fn parse_channel(html: &str, selectors: &MarkupSelectors) -> Vec<RawMessage> {
    let document = Html::parse_document(html);

    let mut messages: Vec<RawMessage> = document
        .select(&selectors.bubble)
        .filter_map(|bubble| {
            let text = bubble
                .select(&selectors.text)
                .next()?
                .text()
                .collect::<String>();
            Some(RawMessage::new(text, origin_link(&bubble, selectors)))
        })
        .collect();

    // The page lists posts oldest first.
    messages.reverse();
    messages
}

fn origin_link(bubble: &ElementRef<'_>, selectors: &MarkupSelectors) -> Option<String> {
    bubble
        .select(&selectors.photo)
        .chain(bubble.select(&selectors.date))
        .find_map(|link| link.value().attr("href"))
        .map(str::to_string)
}

/// Fetch a page, failing on anything but `200 OK`.
#[instrument(level = "info", skip_all, fields(%url))]
pub async fn fetch_page(client: &Client, url: &Url) -> Result<String, ScrapeError> {
    let res = client.get(url.clone()).send().await?;
    let status = res.status();
    if status != StatusCode::OK {
        return Err(ScrapeError::Retrieval {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        });
    }
    let body = res.text().await?;
    debug!(bytes = body.len(), "Fetched channel page");
    Ok(body)
}

/// Live source backed by Telegram's public channel previews.
#[derive(Debug, Clone)]
pub struct TelegramSource {
    client: Client,
    config: ScraperConfig,
    selectors: MarkupSelectors,
}

impl TelegramSource {
    /// Build a source with an HTTP client using the configured timeout.
    pub fn new(config: ScraperConfig) -> Result<Self, ScrapeError> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        let selectors = MarkupSelectors::new(&config.markup)?;
        Ok(Self {
            client,
            config,
            selectors,
        })
    }
}

impl MessageSource for TelegramSource {
    #[instrument(level = "info", skip(self))]
    async fn fetch_messages(&self, source: Source) -> Result<Vec<RawMessage>, ScrapeError> {
        let url = self.config.page_url(source)?;
        let html = fetch_page(&self.client, &url).await?;
        let messages = parse_channel(&html, &self.selectors);
        info!(%source, count = messages.len(), "Parsed channel messages");
        Ok(messages)
    }
}
