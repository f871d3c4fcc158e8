//! Rate extraction from free-form message text.
//!
//! Channel posts mix emoji, dates, times and percentages with the one number
//! we care about. Two patterns are tried in order:
//!
//! 1. `[ ]\d{1,2}[.,]\d{1,2}`: a space followed by a one or two digit integer
//!    part (`" 36,13"`). The leading space keeps dates like `02/02/2024` and
//!    times like `8:50` from matching.
//! 2. `\d[.,]\d{1,2}`: a single digit integer part anywhere (`"3,12"`).
//!
//! The first pattern that matches anywhere wins, and its leftmost match is the
//! rate. An optional anchor narrows the search to the text starting at the
//! anchor's first occurrence.

use crate::errors::ScrapeError;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

static RATE_PATTERNS: Lazy<[Regex; 2]> = Lazy::new(|| {
    [
        Regex::new(r"[ ][0-9]{1,2}[.,][0-9]{1,2}").expect("valid space-anchored rate pattern"),
        Regex::new(r"[0-9][.,][0-9]{1,2}").expect("valid single-digit rate pattern"),
    ]
});

/// Narrow `text` to the window starting at the first occurrence of `anchor`.
///
/// The anchor itself stays in the window: its trailing space is what lets the
/// space-anchored pattern match the number right after it (`"bs. 38,01"`).
/// An empty or missing anchor leaves the text untouched.
pub fn search_window<'a>(text: &'a str, anchor: Option<&str>) -> &'a str {
    match anchor {
        Some(anchor) if !anchor.is_empty() => match text.find(anchor) {
            Some(idx) => &text[idx..],
            None => text,
        },
        _ => text,
    }
}

/// Extract the exchange rate from `text`.
///
/// No case folding is done here; callers lower-case channel text before
/// passing it in.
///
/// # Errors
///
/// [`ScrapeError::NoMatch`] with the original text when neither pattern
/// matches in the search window.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(extract_rate("bs. 38,01", Some("bs. "))?, dec!(38.01));
/// assert!(extract_rate("Dolar en 36-12", None).is_err());
/// ```
pub fn extract_rate(text: &str, anchor: Option<&str>) -> Result<Decimal, ScrapeError> {
    let window = search_window(text, anchor);

    let found = RATE_PATTERNS
        .iter()
        .find_map(|pattern| pattern.find(window))
        .map(|m| m.as_str().trim().replace(',', "."));

    match found {
        Some(number) => Decimal::from_str(&number).map_err(|_| ScrapeError::NoMatch {
            text: text.to_string(),
        }),
        None => Err(ScrapeError::NoMatch {
            text: text.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn bcv_cases() -> Vec<(&'static str, Decimal)> {
        vec![
            (
                "\n        🚨⬆️💰 AHORA. El dólar oficial cierra la jornada en 36,13.⚠️ \n        Fecha valor: Miércoles 24 de enero.\n        ",
                dec!(36.13),
            ),
            (
                "\n        🚨⬇️💰 AHORA. El dólar oficial cierra la jornada en 36,11⚠️ \n        Fecha valor: Martes 23 de enero.\n        ...\n        ",
                dec!(36.11),
            ),
            ("🚨⬆️💰 AHORA. El dólar oficial cierra la jornada en 36,20 ", dec!(36.2)),
            ("🚨🟰💰 AHORA. El dólar oficial cierra la jornada en 36,12. ", dec!(36.12)),
        ]
    }

    fn paralelo_cases() -> Vec<(&'static str, Decimal)> {
        vec![
            (
                "\n        🗓 29/01/2024\n        🕒 12:50 PM\n        💵 Bs. 38,01\n        🟰 0,00% Bs 0,00\n        ",
                dec!(38.01),
            ),
            (
                "\n        🗓 15/02/2024\n        🕒 1:00 PM\n        💵 Bs. 37,28\n        🔻 0,04% Bs 0,02\n        ",
                dec!(37.28),
            ),
            (
                "\n        🗓 02/02/2024\n        🕒 1:08 PM\n        💵 Bs. 38,09\n        🟰 0,00% Bs 0,00\n        ",
                dec!(38.09),
            ),
            (
                "'\nEnParaleloVzla\n🗓 02/02/2024🕒 8:50 AM💵 Bs. 38,09🔺 0,35% Bs 0,14\n128.5K views12:47\n",
                dec!(38.09),
            ),
        ]
    }

    const FAIL_CASES: &[&str] = &[" Publicidad random ", " Dolar en 3612 ", " Dolar en 36-12 "];

    #[test]
    fn test_extract_bcv_messages() {
        for (text, expected) in bcv_cases() {
            assert_eq!(extract_rate(text, Some("")).unwrap(), expected, "text: {text}");
        }
    }

    #[test]
    fn test_extract_paralelo_messages() {
        for (text, expected) in paralelo_cases() {
            assert_eq!(extract_rate(text, Some("")).unwrap(), expected, "text: {text}");
            assert_eq!(
                extract_rate(&text.to_lowercase(), Some("bs. ")).unwrap(),
                expected,
                "lowered text: {text}"
            );
        }
    }

    #[test]
    fn test_extract_rejects_messages_without_a_rate() {
        for text in FAIL_CASES {
            match extract_rate(text, None) {
                Err(ScrapeError::NoMatch { text: reported }) => assert_eq!(reported, *text),
                other => panic!("expected NoMatch for {text:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_integer_only_text_fails() {
        assert!(extract_rate("el dólar cierra en 36 bolívares", None).is_err());
        assert!(extract_rate("", None).is_err());
    }

    #[test]
    fn test_dot_separator_is_accepted() {
        assert_eq!(extract_rate("cierra en 36.13", None).unwrap(), dec!(36.13));
        assert_eq!(extract_rate("3.12", None).unwrap(), dec!(3.12));
        assert_eq!(extract_rate("3,1", None).unwrap(), dec!(3.1));
    }

    #[test]
    fn test_anchor_narrows_search_window() {
        let text = "🗓 02/02/2024 🕒 8:50 am 💵 bs. 38,09 🔺 0,35%";
        assert_eq!(search_window(text, Some("bs. ")), "bs. 38,09 🔺 0,35%");
        assert_eq!(extract_rate(text, Some("bs. ")).unwrap(), dec!(38.09));

        // Without the anchor the space-anchored pattern still finds the first
        // rate-shaped number after a space.
        let noisy = "variación 1,50 hoy bs. 38,09";
        assert_eq!(extract_rate(noisy, None).unwrap(), dec!(1.50));
        assert_eq!(extract_rate(noisy, Some("bs. ")).unwrap(), dec!(38.09));
    }

    #[test]
    fn test_missing_anchor_searches_full_text() {
        let text = "Bs. 38,01";
        assert_eq!(search_window(text, Some("bs. ")), text);
        assert_eq!(extract_rate(text, Some("bs. ")).unwrap(), dec!(38.01));
    }

    #[test]
    fn test_anchor_narrowing_is_idempotent() {
        let text = "💵 bs. 38,09 🔺 0,35% bs 0,14";
        let once = search_window(text, Some("bs. "));
        let twice = search_window(once, Some("bs. "));
        assert_eq!(once, twice);
        assert_eq!(
            extract_rate(once, Some("bs. ")).unwrap(),
            extract_rate(text, Some("bs. ")).unwrap()
        );
    }

    #[test]
    fn test_space_anchored_pattern_takes_precedence() {
        // "7,5" appears first and only matches the single-digit pattern.
        let text = "promo7,5x en 36,13";
        assert_eq!(extract_rate(text, None).unwrap(), dec!(36.13));
    }

    #[test]
    fn test_single_digit_fallback() {
        assert_eq!(extract_rate("tasa:3,12", None).unwrap(), dec!(3.12));
    }

    #[test]
    fn test_end_to_end_literal_text() {
        let text = "🗓 02/02/2024 🕒 8:50 AM 💵 Bs. 38,09 🔺 0,35%...";
        assert_eq!(extract_rate(text, Some("bs. ")).unwrap(), dec!(38.09));
        assert!(extract_rate(" Dolar en 36-12 ", Some("")).is_err());
    }
}
