use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetail {
    pub imdb_id: String,
    pub title: String,
    pub year: String,
    pub poster: String,
    pub runtime: u32, // Minutes, 0 when the provider has no usable value
    pub imdb_rating: f64,
    pub plot: String,
    pub released: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub released_on: Option<NaiveDate>,
    pub actors: String,
    pub director: String,
    pub genre: String,
}

/// Parse a runtime like `"142 min"` into minutes.
///
/// Only the first whitespace-delimited token is considered. `"N/A"`, empty
/// strings and anything else that is not an unsigned integer yield `0`.
pub fn parse_runtime_minutes(raw: &str) -> u32 {
    raw.split_whitespace()
        .next()
        .and_then(|token| token.parse::<u32>().ok())
        .unwrap_or(0)
}

/// Parse an IMDb rating string such as `"8.8"`. Unusable values yield `0.0`.
pub fn parse_imdb_rating(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|rating| rating.is_finite())
        .unwrap_or(0.0)
}

/// Parse a release date in the `"16 Jul 2010"` form.
pub fn parse_released(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%d %b %Y").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_runtime_minutes() {
        assert_eq!(parse_runtime_minutes("142 min"), 142);
        assert_eq!(parse_runtime_minutes("90"), 90);
        assert_eq!(parse_runtime_minutes("  7 min "), 7);
    }

    #[test]
    fn test_parse_runtime_minutes_fallback() {
        assert_eq!(parse_runtime_minutes("N/A"), 0);
        assert_eq!(parse_runtime_minutes(""), 0);
        assert_eq!(parse_runtime_minutes("min 142"), 0);
        assert_eq!(parse_runtime_minutes("-5 min"), 0);
    }

    #[test]
    fn test_parse_imdb_rating() {
        assert_eq!(parse_imdb_rating("8.8"), 8.8);
        assert_eq!(parse_imdb_rating("N/A"), 0.0);
        assert_eq!(parse_imdb_rating(""), 0.0);
        assert_eq!(parse_imdb_rating("NaN"), 0.0);
    }

    #[test]
    fn test_parse_released() {
        assert_eq!(
            parse_released("16 Jul 2010"),
            NaiveDate::from_ymd_opt(2010, 7, 16)
        );
        assert_eq!(parse_released("N/A"), None);
    }
}
