//! Error types for scraping and rate extraction.
//!
//! Every failure path in the crate is a [`ScrapeError`] variant. The handler
//! turns any of them into an absent rate for the affected source, so none of
//! these ever fail a whole invocation. Only [`ScrapeError::Config`] is fatal,
//! and only at startup.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Neither number pattern matched inside the search window.
    #[error("No match found in: {text}")]
    NoMatch {
        /// The text that was searched, kept for diagnostics.
        text: String,
    },

    /// Every message inside the lookback window failed extraction.
    #[error("No rate found in the {checked} most recent messages")]
    NoneFound {
        /// How many messages were actually examined.
        checked: usize,
    },

    /// The page was reachable but answered with a non-success status.
    #[error("Code: {status}. Reason: {reason}")]
    Retrieval { status: u16, reason: String },

    /// Connection, TLS or timeout failure before a status was received.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A configured markup selector could not be parsed.
    #[error("Invalid markup selector: {0}")]
    Markup(String),

    /// A fixture page could not be read from disk.
    #[error("Failed to read fixture {}: {source}", path.display())]
    Fixture {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ScrapeError {
    /// Short machine-friendly tag used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            ScrapeError::NoMatch { .. } => "no_match",
            ScrapeError::NoneFound { .. } => "none_found",
            ScrapeError::Retrieval { .. } => "retrieval",
            ScrapeError::Transport(_) => "transport",
            ScrapeError::Markup(_) => "markup",
            ScrapeError::Fixture { .. } => "fixture",
            ScrapeError::Config(_) => "config",
        }
    }
}
