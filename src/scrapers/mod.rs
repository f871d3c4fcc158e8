//! Message sources for the rate feeds.
//!
//! A source turns a [`Source`] into the list of its recent messages, most
//! recent first. Rate selection never depends on where messages came from.
//!
//! | Implementation | Module | Backing |
//! |----------------|--------|---------|
//! | [`TelegramSource`] | [`telegram`] | Live `t.me/s/<channel>` preview pages |
//! | [`FixtureSource`] | [`fixture`] | Captured pages or pre-parsed messages |
//!
//! Both share [`telegram::parse_channel`] for turning preview markup into
//! [`RawMessage`]s.

use crate::errors::ScrapeError;
use crate::models::{RawMessage, Source};

pub mod fixture;
pub mod telegram;

pub use fixture::FixtureSource;
pub use telegram::TelegramSource;

/// Something that can list the recent messages of a rate feed.
pub trait MessageSource {
    /// Fetch the messages of `source`, ordered most recent first.
    ///
    /// # Errors
    ///
    /// Any retrieval or parsing failure. Callers treat it as "no rate" for
    /// that source.
    async fn fetch_messages(&self, source: Source) -> Result<Vec<RawMessage>, ScrapeError>;
}
