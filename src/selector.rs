//! Picks the most recent message that actually carries a rate.
//!
//! Channels sometimes post an ad or an off-topic note as their latest
//! message. Instead of trusting only the newest post, the selector walks a
//! small window of recent messages and returns the first one the extractor
//! accepts.

use crate::errors::ScrapeError;
use crate::extract::extract_rate;
use crate::models::{ExchangeRate, RawMessage};
use crate::utils::{squash_whitespace, truncate_for_log};
use tracing::{debug, warn};

/// Default number of recent messages examined per source.
pub const DEFAULT_LOOKBACK: usize = 5;

/// Return the rate from the most recent extractable message.
///
/// `messages` must be ordered most recent first. At most `lookback_limit`
/// messages are examined; each one is lower-cased before extraction. The
/// returned rate carries the origin of the message it came from.
///
/// # Errors
///
/// [`ScrapeError::NoneFound`] when no message within the window yields a rate.
pub fn select_rate(
    messages: &[RawMessage],
    anchor: &str,
    lookback_limit: usize,
) -> Result<ExchangeRate, ScrapeError> {
    let window = &messages[..messages.len().min(lookback_limit)];

    for (index, message) in window.iter().enumerate() {
        match extract_rate(&message.text.to_lowercase(), Some(anchor)) {
            Ok(rate) => {
                debug!(index, %rate, origin = ?message.origin, "Selected rate from message");
                return Ok(ExchangeRate {
                    origin: message.origin.clone(),
                    rate,
                });
            }
            Err(e) => {
                warn!(
                    index,
                    kind = e.kind(),
                    text = %truncate_for_log(&squash_whitespace(&message.text), 200),
                    "Message has no rate; trying an older one"
                );
            }
        }
    }

    Err(ScrapeError::NoneFound {
        checked: window.len(),
    })
}

/// Extract a rate from caller-supplied text, skipping message selection.
///
/// The text is used as given (no lower-casing) and the result has no origin.
pub fn rate_from_text(text: &str, anchor: &str) -> Result<ExchangeRate, ScrapeError> {
    let rate = extract_rate(text, Some(anchor)).inspect_err(|e| {
        warn!(
            kind = e.kind(),
            text = %truncate_for_log(&squash_whitespace(text), 200),
            "Literal text has no rate"
        );
    })?;
    Ok(ExchangeRate { origin: None, rate })
}
