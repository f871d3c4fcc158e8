//! Data models for scraped messages, extracted rates and the response envelope.
//!
//! - [`RawMessage`]: one message as read from a channel page
//! - [`ExchangeRate`]: a successfully extracted rate with its provenance
//! - [`Source`]: the two upstream feeds
//! - [`Rates`] / [`Response`]: the shape returned by the handler
//!
//! The envelope keeps camelCase keys (`statusCode`) to match the JSON that
//! existing consumers of the service already read.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A message as parsed from a channel page.
///
/// Sequences of messages are ordered by recency: index 0 is the most recent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
    /// The message body with markup stripped.
    pub text: String,
    /// Link to the post the text came from, when the page exposes one.
    pub origin: Option<String>,
}

impl RawMessage {
    pub fn new(text: impl Into<String>, origin: Option<String>) -> Self {
        Self {
            text: text.into(),
            origin,
        }
    }
}

/// A rate extracted from a message.
///
/// Only ever built from a successful extraction, so `rate` is always a
/// non-negative decimal with at most two fractional digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// Provenance of the rate (post link), serialized as `source`.
    #[serde(rename = "source")]
    pub origin: Option<String>,
    pub rate: Decimal,
}

/// Upstream feed a rate is scraped from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Official rate published by the central bank (BCV).
    Bcv,
    /// Informal parallel-market rate.
    Paralelo,
}

impl Source {
    pub const ALL: [Source; 2] = [Source::Bcv, Source::Paralelo];

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Bcv => "bcv",
            Source::Paralelo => "paralelo",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-source results. `None` means no rate could be found and serializes
/// as `null`, never as `0`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rates {
    pub bcv: Option<ExchangeRate>,
    pub paralelo: Option<ExchangeRate>,
}

/// Response envelope returned by one handler invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub status_code: u16,
    #[serde(rename = "message")]
    pub body: Rates,
    pub headers: BTreeMap<String, String>,
}

impl Response {
    /// Wrap rates in a `200` JSON response.
    pub fn ok(body: Rates) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        Self {
            status_code: 200,
            body,
            headers,
        }
    }
}

/// Invocation event. Literal texts bypass retrieval for the sources they name.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Event {
    #[serde(default)]
    pub texts: BTreeMap<Source, String>,
}

/// Invocation context; only used to label the tracing span.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Context {
    #[serde(default)]
    pub request_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_absent_rate_serializes_as_null() {
        let response = Response::ok(Rates {
            bcv: Some(ExchangeRate {
                origin: Some("https://t.me/Alertas24/1".to_string()),
                rate: dec!(36.13),
            }),
            paralelo: None,
        });
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["headers"]["Content-Type"], "application/json");
        assert_eq!(json["message"]["bcv"]["source"], "https://t.me/Alertas24/1");
        assert_eq!(json["message"]["bcv"]["rate"].as_f64(), Some(36.13));
        assert!(json["message"]["paralelo"].is_null());
    }

    #[test]
    fn test_zero_rate_is_distinct_from_absent() {
        let rates = Rates {
            bcv: Some(ExchangeRate {
                origin: None,
                rate: Decimal::ZERO,
            }),
            paralelo: None,
        };
        let json = serde_json::to_value(&rates).unwrap();
        assert_eq!(json["bcv"]["rate"].as_f64(), Some(0.0));
        assert!(json["paralelo"].is_null());
    }

    #[test]
    fn test_event_texts_keyed_by_source() {
        let event: Event =
            serde_json::from_str(r#"{"texts": {"paralelo": "Bs. 38,01"}}"#).unwrap();
        assert_eq!(
            event.texts.get(&Source::Paralelo).map(String::as_str),
            Some("Bs. 38,01")
        );
        assert!(event.texts.get(&Source::Bcv).is_none());

        let empty: Event = serde_json::from_str("{}").unwrap();
        assert!(empty.texts.is_empty());
    }
}
