//! Normalizer boundary helpers
//!
//! Shared conversions applied exactly once, where wire shapes become view
//! models. Nothing downstream of a normalizer re-parses timestamps.

use chrono::{DateTime, Utc};

/// Convert a raw timestamp into a `YYYY-MM-DD` calendar date.
///
/// RFC 3339 input is normalized to the UTC calendar date. Anything else
/// falls back to the first 10 characters when they look like a date
/// prefix, else the empty string.
pub fn calendar_date(timestamp: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(timestamp) {
        return parsed.with_timezone(&Utc).format("%Y-%m-%d").to_string();
    }
    if timestamp.len() >= 10 && timestamp.is_char_boundary(10) {
        return timestamp[..10].to_string();
    }
    String::new()
}

/// Like [`calendar_date`] but tolerates a missing field.
pub fn calendar_date_opt(timestamp: Option<&str>) -> String {
    timestamp.map(calendar_date).unwrap_or_default()
}

/// First non-empty string, or the given fallback.
pub fn first_non_empty<'a>(candidates: &[Option<&'a str>], fallback: &'a str) -> &'a str {
    candidates
        .iter()
        .flatten()
        .copied()
        .find(|s| !s.is_empty())
        .unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc3339_becomes_utc_calendar_date() {
        assert_eq!(calendar_date("2024-03-05T10:30:00.000Z"), "2024-03-05");
        // offset pushes the instant past midnight UTC
        assert_eq!(calendar_date("2024-03-05T23:30:00-03:00"), "2024-03-06");
    }

    #[test]
    fn bare_date_passes_through() {
        assert_eq!(calendar_date("2024-03-05"), "2024-03-05");
    }

    #[test]
    fn garbage_becomes_empty() {
        assert_eq!(calendar_date("soon"), "");
        assert_eq!(calendar_date(""), "");
    }

    #[test]
    fn missing_field_becomes_empty() {
        assert_eq!(calendar_date_opt(None), "");
        assert_eq!(calendar_date_opt(Some("2024-01-02T00:00:00Z")), "2024-01-02");
    }

    #[test]
    fn first_non_empty_picks_in_order() {
        assert_eq!(
            first_non_empty(&[None, Some(""), Some("ada")], "-"),
            "ada"
        );
        assert_eq!(first_non_empty(&[None, Some("")], "-"), "-");
    }
}
